//! Dropbox Core Library
//!
//! This crate provides the library data model, error types, configuration, and the
//! pure search and mutation logic shared by the storage, processing, and API crates.

pub mod config;
pub mod error;
pub mod models;
pub mod mutation;
pub mod search;
pub mod validation;

// Re-export commonly used types
pub use config::{BaseConfig, Config, DropboxConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{MediaEntry, MediaId, MediaResponse};
pub use mutation::apply_patch;
pub use search::search;
