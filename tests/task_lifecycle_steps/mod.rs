//! Step definitions for the task time ledger scenarios.

pub mod when;
pub mod world;
