//! Carpenter: Kanban task lifecycle and time tracking for a furniture shop.
//!
//! Each order is split into tasks that move across a three-column board
//! (`Por Hacer`, `En Curso`, `Terminado`). Moving a card starts, pauses or
//! finishes a stopwatch whose closed intervals accumulate in a per-task time
//! ledger. The running time is always derived from stored timestamps and an
//! injected clock, never from a background timer.
//!
//! # Architecture
//!
//! Carpenter follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`task`]: Task aggregate, time ledger and lifecycle service
//! - [`order`]: Read-only order lookups
//! - [`activity`]: Consumption and incident log attached to tasks
//! - [`api`]: JSON HTTP surface
//! - [`settings`], [`telemetry`], [`db`]: Process wiring

pub mod activity;
pub mod api;
pub mod db;
pub mod order;
pub mod settings;
pub mod task;
pub mod telemetry;
