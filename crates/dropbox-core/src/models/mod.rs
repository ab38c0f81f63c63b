//! Library entries and request bodies.

mod media;
mod requests;

pub use media::*;
pub use requests::*;
