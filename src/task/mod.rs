//! Task lifecycle management.
//!
//! A task belongs to an order and is executed by one operator. Its board
//! column and its time ledger change together: entering `En Curso` opens a
//! running interval, leaving it folds the interval into the accumulated
//! seconds, and `Terminado` is absorbing. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
