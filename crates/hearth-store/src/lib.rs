// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory storage for the Hearth family task service.
//!
//! Holds the authoritative Task and User collections for one process
//! lifetime (no persistence, no transactions) plus the device presence
//! map. Stores are constructed explicitly so tests run isolated
//! instances; there is no ambient singleton.

pub mod presence;
pub mod store;

pub use presence::{PresenceSnapshot, PresenceTracker};
pub use store::{NewTask, TaskPatch, TaskStore};
