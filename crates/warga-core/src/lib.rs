//! Core types and the registry service for Warga, a village population
//! registry.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::RegistryStore`]; outer layers drive
//! the [`registry::Registry`] service.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod backup;
pub mod dashboard;
pub mod error;
pub mod family_card;
pub mod import;
pub mod letter;
pub mod mutation;
pub mod page;
pub mod permission;
pub mod region;
pub mod registry;
pub mod resident;
pub mod role;
pub mod store;
pub mod validation;

pub use error::{Error, FieldErrors, Result};
pub use registry::Registry;
pub use role::Actor;
