// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for the Hearth workspace: a manual clock and an
//! end-to-end harness assembling the full gateway stack in-process.

pub mod harness;
pub mod manual_clock;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use manual_clock::ManualClock;
