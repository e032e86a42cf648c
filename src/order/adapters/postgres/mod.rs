//! `PostgreSQL` adapter for order lookups.

mod directory;
mod models;
mod schema;

pub use directory::{OrderPgPool, PostgresOrderDirectory};
