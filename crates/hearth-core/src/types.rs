// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types for tasks, family members, and recurrence policies.
//!
//! Wire form is camelCase JSON matching the admin clients; timestamps are
//! epoch milliseconds.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::HearthError;

/// Role of a family member. Gates which actions the gateway permits;
/// the store itself is role-agnostic.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum Role {
    Owner,
    Family,
    Child,
    Minor,
}

/// A family member. Read-only from the task store's perspective; the
/// roster is seeded from configuration at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: Role,
}

/// Recurrence kind for a task.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RepeatKind {
    #[default]
    None,
    Daily,
    Weekly,
}

/// Default pre-alert offsets in minutes before due (negative values).
pub const DEFAULT_ALERT_OFFSETS_MIN: [i32; 2] = [-15, -5];

/// Recurrence policy attached to a task.
///
/// `days_of_week` uses 0=Sun..6=Sat. Invariant: `Weekly` requires at
/// least one day; enforced by [`RepeatRule::validate`] before any due
/// computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepeatRule {
    pub kind: RepeatKind,
    #[serde(default)]
    pub days_of_week: Vec<u8>,
    #[serde(rename = "timeHHMM", default, skip_serializing_if = "Option::is_none")]
    pub time_hhmm: Option<String>,
    #[serde(default = "default_alert_offsets")]
    pub alert_offsets_min: Vec<i32>,
}

fn default_alert_offsets() -> Vec<i32> {
    DEFAULT_ALERT_OFFSETS_MIN.to_vec()
}

impl Default for RepeatRule {
    fn default() -> Self {
        Self {
            kind: RepeatKind::None,
            days_of_week: Vec::new(),
            time_hhmm: None,
            alert_offsets_min: default_alert_offsets(),
        }
    }
}

impl RepeatRule {
    /// Construct a one-time (non-repeating) rule.
    pub fn one_time() -> Self {
        Self::default()
    }

    /// Validate the rule's semantic invariants.
    ///
    /// Weekly rules with an empty day set are rejected here, before any
    /// occurrence computation takes place. Day indices outside 0..=6 are
    /// rejected for both daily and weekly rules.
    pub fn validate(&self) -> Result<(), HearthError> {
        if self.kind == RepeatKind::Weekly && self.days_of_week.is_empty() {
            return Err(HearthError::Validation(
                "weekly repeat rule requires at least one day of week".into(),
            ));
        }
        if let Some(day) = self.days_of_week.iter().find(|d| **d > 6) {
            return Err(HearthError::Validation(format!(
                "day of week {day} is out of range (0=Sun..6=Sat)"
            )));
        }
        Ok(())
    }
}

/// Consequence action run when an overdue task is enforced unattended.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EnforceAction {
    ScreenLock,
    NetworkPause,
    DeviceRestart,
    DeviceShutdown,
    AppRestart,
    PlayLoudAlert,
}

/// Delivery channel an enforcement actually went through.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EnforceChannel {
    /// Alert mail sent via the configured SMTP notifier.
    Email,
    /// No notifier configured; the enforcement was only logged.
    Log,
}

/// A task record. Created once, then mutated in place by the small set of
/// by-id actions on the store; never re-parented to a different assignee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<i64>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub for_minor: bool,
    #[serde(default)]
    pub ack_required: bool,
    #[serde(default)]
    pub photo_proof: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ack_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ack_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Summary of `repeat_rule.kind`, kept for legacy clients.
    #[serde(default)]
    pub repeat: RepeatKind,
    #[serde(default)]
    pub repeat_rule: RepeatRule,
    #[serde(default)]
    pub auto_enforce: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_action: Option<EnforceAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enforced_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enforce_channel: Option<EnforceChannel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_enforce_error: Option<String>,
    #[serde(default)]
    pub paused_by_parent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hold_until: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<i64>,
    pub created_at: i64,
}
