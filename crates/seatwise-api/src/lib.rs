//! JSON REST API for Seatwise.
//!
//! Exposes an axum [`Router`] backed by any
//! [`seatwise_core::store::SeatingStore`]. Auth, TLS, and tenant verification
//! are the caller's responsibility: the mounting layer must confirm that the
//! floor plan's owning client belongs to the authenticated company before
//! requests reach these handlers.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", seatwise_api::api_router(store.clone()))
//! ```

pub mod assignments;
pub mod changes;
pub mod error;
pub mod graph;
pub mod guests;
pub mod plans;
pub mod tables;
pub mod versions;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, patch, post},
};
use seatwise_core::store::SeatingStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: SeatingStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Floor plans
    .route("/floor-plans", get(plans::list::<S>).post(plans::create::<S>))
    .route(
      "/floor-plans/{id}",
      get(plans::get_one::<S>)
        .patch(plans::update::<S>)
        .delete(plans::delete_one::<S>),
    )
    // Guests
    .route("/guests", get(guests::list::<S>).post(guests::create::<S>))
    // Table registry
    .route(
      "/floor-plans/{id}/tables",
      get(tables::list::<S>).post(tables::create::<S>),
    )
    .route(
      "/tables/{id}",
      patch(tables::update::<S>).delete(tables::delete_one::<S>),
    )
    // Relationship graph
    .route(
      "/conflicts",
      get(graph::list_conflicts::<S>).post(graph::add_conflict::<S>),
    )
    .route("/conflicts/remove", post(graph::remove_conflict::<S>))
    .route(
      "/preferences",
      get(graph::list_preferences::<S>).post(graph::add_preference::<S>),
    )
    .route("/preferences/remove", post(graph::remove_preference::<S>))
    // Assignments
    .route("/floor-plans/{id}/evaluate", get(assignments::evaluate::<S>))
    .route(
      "/floor-plans/{id}/assignments",
      get(assignments::list::<S>).post(assignments::create::<S>),
    )
    .route(
      "/floor-plans/{id}/assignments/batch",
      post(assignments::batch::<S>),
    )
    .route(
      "/floor-plans/{id}/assignments/unassign",
      post(assignments::unassign::<S>),
    )
    // Versions
    .route(
      "/floor-plans/{id}/versions",
      get(versions::list::<S>).post(versions::save::<S>),
    )
    .route("/versions/{id}/restore", post(versions::restore::<S>))
    .route("/versions/{id}", delete(versions::delete_one::<S>))
    // Change log
    .route("/floor-plans/{id}/changes", get(changes::list::<S>))
    .with_state(store)
}
