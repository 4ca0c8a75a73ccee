//! Core library exports for the public-body category registry.
//!
//! The `data` feature exposes the domain layer (categories, translations,
//! heading links, the tag guard) together with the Diesel models and schema.
//! The `server` feature adds forms, repositories, services and the Actix-web
//! routes of the admin back office.

#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "data")]
pub mod schema;

#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
mod error_conversions;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

/// Role required to use the category administration screens.
pub const SERVICE_ACCESS_ROLE: &str = "admin";
