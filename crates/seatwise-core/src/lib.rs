//! Domain types and the [`store::SeatingStore`] trait for the Seatwise
//! seating engine.
//!
//! No HTTP or database dependencies live here; backends and the API surface
//! both build on this crate.

// Trait methods return explicit `impl Future + Send` so backends stay usable
// from multi-threaded runtimes; silence the advisory lint for impls written
// as plain `async fn`.
#![allow(async_fn_in_trait)]

mod nullable;

pub mod assignment;
pub mod changelog;
pub mod error;
pub mod graph;
pub mod guest;
pub mod plan;
pub mod store;
pub mod table;
pub mod version;

pub use error::{Error, Result};
