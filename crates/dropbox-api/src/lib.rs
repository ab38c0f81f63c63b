//! Dropbox API Library
//!
//! This crate provides the HTTP handlers, the password middleware and application setup.

mod api_doc;
mod handlers;
pub mod setup;
mod telemetry;
mod utils;

pub mod auth;
pub mod error;
pub mod state;

pub use error::ErrorResponse;
pub use state::AppState;
