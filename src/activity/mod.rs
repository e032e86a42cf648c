//! Shop-floor activity log attached to tasks.
//!
//! Operators record material consumption and report incidents while a task is
//! on the board. Records are append-only and independent of the task
//! lifecycle: the engine never reads them and they never change a task's
//! state or time ledger.
//!
//! - Domain types in [`domain`]
//! - Port contract in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Validation and time stamping in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
