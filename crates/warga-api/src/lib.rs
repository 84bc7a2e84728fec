//! JSON REST API for Warga.
//!
//! Exposes an axum [`Router`] backed by a [`Registry`] over any
//! [`RegistryStore`]. Authentication is the caller's responsibility: a layer
//! in front of the router must put the acting [`Actor`](warga_core::Actor)
//! into the request extensions, otherwise every handler answers 401.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", warga_api::api_router(registry.clone()))
//! ```

pub mod dashboard;
pub mod error;
pub mod export;
pub mod extract;
pub mod family_cards;
pub mod import;
pub mod letters;
pub mod mutations;
pub mod regions;
pub mod residents;
pub mod roles;


use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use warga_core::{Registry, store::RegistryStore};

pub use error::ApiError;
pub use extract::CurrentActor;

/// Build a fully-materialised API router for `registry`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(registry: Arc<Registry<S>>) -> Router<()>
where
  S: RegistryStore + 'static,
{
  Router::new()
    // Regions
    .route("/regions", get(regions::list::<S>).post(regions::create::<S>))
    .route("/regions/options", get(regions::options::<S>))
    .route(
      "/regions/{id}",
      get(regions::get_one::<S>)
        .put(regions::update::<S>)
        .delete(regions::delete::<S>),
    )
    // Family cards
    .route("/family-cards", get(family_cards::list::<S>).post(family_cards::create::<S>))
    .route("/family-cards/options", get(family_cards::options::<S>))
    .route(
      "/family-cards/{id}",
      get(family_cards::get_one::<S>)
        .put(family_cards::update::<S>)
        .delete(family_cards::delete::<S>),
    )
    .route("/family-cards/{id}/members", get(family_cards::members::<S>))
    // Residents
    .route("/residents", get(residents::list::<S>).post(residents::create::<S>))
    .route("/residents/options", get(residents::options::<S>))
    .route(
      "/residents/{id}",
      get(residents::get_one::<S>)
        .put(residents::update::<S>)
        .delete(residents::delete::<S>),
    )
    // Mutations
    .route("/mutations", get(mutations::list::<S>).post(mutations::create::<S>))
    .route("/mutations/{id}", get(mutations::get_one::<S>))
    // Letters
    .route("/letters", get(letters::list::<S>).post(letters::create::<S>))
    .route(
      "/letters/{id}",
      get(letters::get_one::<S>)
        .put(letters::update::<S>)
        .delete(letters::delete::<S>),
    )
    // Dashboard
    .route("/dashboard", get(dashboard::handler::<S>))
    // Spreadsheets and backup
    .route("/import/{entity}", post(import::handler::<S>))
    .route("/export/{file}", get(export::file::<S>))
    .route("/backup", get(export::backup::<S>))
    // Roles
    .route("/roles", get(roles::list::<S>))
    .route("/roles/me", get(roles::me::<S>))
    .route("/roles/{user_id}", put(roles::set::<S>))
    .with_state(registry)
}
