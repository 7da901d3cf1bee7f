// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Device presence tracking.
//!
//! Kid devices beat periodically; the admin UI polls per-user presence on
//! a fixed interval. A user counts as online while their last beat is
//! within the configured window.

use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;

use hearth_core::Clock;

/// Presence snapshot returned to pollers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceSnapshot {
    pub user_id: String,
    pub online: bool,
    pub last_seen_at: Option<i64>,
    pub now: i64,
}

/// Lock-free last-seen map over all tracked user ids.
pub struct PresenceTracker {
    clock: Arc<dyn Clock>,
    ttl_ms: i64,
    last_seen: DashMap<String, i64>,
}

impl PresenceTracker {
    /// Create a tracker where a beat keeps a user online for `ttl_secs`.
    pub fn new(ttl_secs: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            ttl_ms: ttl_secs as i64 * 1000,
            last_seen: DashMap::new(),
        }
    }

    /// Record a heartbeat for a user's device.
    pub fn heartbeat(&self, user_id: &str) {
        self.last_seen
            .insert(user_id.to_string(), self.clock.now_ms());
    }

    /// Current presence of a user. Unknown users are simply offline.
    pub fn snapshot(&self, user_id: &str) -> PresenceSnapshot {
        let now = self.clock.now_ms();
        let last_seen_at = self.last_seen.get(user_id).map(|entry| *entry.value());
        let online = last_seen_at.is_some_and(|seen| now - seen <= self.ttl_ms);
        PresenceSnapshot {
            user_id: user_id.to_string(),
            online,
            last_seen_at,
            now,
        }
    }
}
