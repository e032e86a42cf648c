//! Order directory collaborator.
//!
//! Orders are owned elsewhere in the shop system. The board only needs to
//! confirm that a `pedido_id` exists when a task is created and to decorate
//! board rows with the client, area, priority and commitment date, so this
//! context exposes a read-only port:
//!
//! - Domain types in [`domain`]
//! - Port contract in [`ports`]
//! - In-memory and `PostgreSQL` implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;
