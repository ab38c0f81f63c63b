//! Dropbox media intake.
//!
//! Turns uploaded files and external URLs into library entries: files are
//! relocated into the media root and probed for duration, subtitle tracks are
//! converted to WebVTT and attached to their entry.

pub mod error;
pub mod pipeline;
pub mod probe;
pub mod subtitle;

pub use error::{PipelineError, PipelineResult};
pub use pipeline::IntakePipeline;
pub use probe::{DurationProbe, FfprobeDurationProbe, FixedDurationProbe};
pub use subtitle::{convert_srt_to_vtt, SubtitleError};
