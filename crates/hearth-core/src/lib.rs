// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Hearth family task service.
//!
//! This crate provides the domain types, the recurrence calculator, the
//! derived task lifecycle state, and the error type used throughout the
//! Hearth workspace. Everything here is pure and side-effect free; the
//! store and gateway crates build on it.

pub mod clock;
pub mod error;
pub mod lifecycle;
pub mod recurrence;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use clock::{Clock, SystemClock};
pub use error::HearthError;
pub use lifecycle::{task_state, TaskState};
pub use recurrence::next_occurrence;
pub use types::{EnforceAction, EnforceChannel, RepeatKind, RepeatRule, Role, Task, User};
