// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Derived task lifecycle state.
//!
//! The state is computed, never stored: every display or enforcement
//! decision calls [`task_state`] so there is exactly one derivation.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::types::Task;

/// Display/enforcement state of a task at a given instant.
///
/// Priority, highest first: Completed > Held > Enforced > Overdue >
/// AwaitingAck > Normal. A held task never shows as overdue even when its
/// due time has passed; the hold is an explicit operator override. An
/// acknowledgment satisfies the deadline, so an acked task never reports
/// overdue either.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TaskState {
    Completed,
    Held,
    Enforced,
    Overdue,
    AwaitingAck,
    Normal,
}

/// Whether the task is inside an active suspension window.
pub fn is_held(task: &Task, now_ms: i64) -> bool {
    task.paused_by_parent || task.hold_until.is_some_and(|until| until > now_ms)
}

/// Derive the lifecycle state of a task snapshot at `now_ms`.
pub fn task_state(task: &Task, now_ms: i64) -> TaskState {
    if task.completed {
        return TaskState::Completed;
    }
    if is_held(task, now_ms) {
        return TaskState::Held;
    }
    if task.enforced_at.is_some() {
        return TaskState::Enforced;
    }
    if task.ack_at.is_none() && task.due.is_some_and(|due| due < now_ms) {
        return TaskState::Overdue;
    }
    if task.ack_required && task.ack_at.is_none() {
        return TaskState::AwaitingAck;
    }
    TaskState::Normal
}
