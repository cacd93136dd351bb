//! SQLite backend for the Seatwise seating engine.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Multi-row mutations (assignment
//! writes, batch assignment, version save/restore) execute inside a single
//! IMMEDIATE transaction.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
