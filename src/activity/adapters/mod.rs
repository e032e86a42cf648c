//! Activity log adapters.

pub mod memory;
pub mod postgres;
