//! Media duration probing.

mod ffprobe;

pub use ffprobe::FfprobeDurationProbe;

use crate::error::PipelineResult;
use async_trait::async_trait;
use std::path::Path;

/// Reports the playback length of a media file.
#[async_trait]
pub trait DurationProbe: Send + Sync {
    /// Duration in seconds, or `None` when the container carries none.
    async fn duration_seconds(&self, path: &Path) -> PipelineResult<Option<f64>>;
}

/// Probe returning a preset answer without touching the file.
#[derive(Clone, Debug, Default)]
pub struct FixedDurationProbe {
    seconds: Option<f64>,
    fail: bool,
}

impl FixedDurationProbe {
    pub fn new(seconds: Option<f64>) -> Self {
        FixedDurationProbe {
            seconds,
            fail: false,
        }
    }

    /// A probe whose every call fails.
    pub fn failing() -> Self {
        FixedDurationProbe {
            seconds: None,
            fail: true,
        }
    }
}

#[async_trait]
impl DurationProbe for FixedDurationProbe {
    async fn duration_seconds(&self, path: &Path) -> PipelineResult<Option<f64>> {
        if self.fail {
            return Err(crate::error::PipelineError::Probe(format!(
                "cannot probe {}",
                path.display()
            )));
        }
        Ok(self.seconds)
    }
}

/// Convert probed seconds to whole milliseconds; absent or invalid values are 0.
pub fn seconds_to_millis(seconds: Option<f64>) -> u64 {
    match seconds {
        Some(s) if s.is_finite() && s > 0.0 => (s * 1000.0).round() as u64,
        _ => 0,
    }
}
