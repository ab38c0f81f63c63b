//! Dropbox Storage Library
//!
//! This crate owns everything that touches durable state:
//!
//! - [`LibraryStore`]: the in-memory library, mirrored to a [`LibraryPersistence`]
//!   backend after every mutation.
//! - [`JsonFilePersistence`]: the library document on disk, a JSON array of
//!   `[mediaId, entry]` pairs rewritten wholesale on each save.
//! - [`MediaRoot`]: the directory that holds ingested media and subtitle files.
//!
//! File names inside the media root must not contain `..` or a leading `/`.

pub mod json_file;
pub mod media_root;
pub mod memory;
pub mod store;
pub mod traits;

// Re-export commonly used types
pub use json_file::JsonFilePersistence;
pub use media_root::MediaRoot;
pub use memory::MemoryPersistence;
pub use store::LibraryStore;
pub use traits::{LibraryPersistence, StorageError, StorageResult};
