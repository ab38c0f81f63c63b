use super::DurationProbe;
use crate::error::{PipelineError, PipelineResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use tokio::process::Command;

#[derive(Debug, Deserialize)]
struct FFprobeOutput {
    #[serde(default)]
    format: Option<FFprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FFprobeFormat {
    /// ffprobe prints numbers as strings, e.g. "12.345000"
    duration: Option<String>,
}

/// Duration probe backed by the `ffprobe` executable.
#[derive(Clone, Debug)]
pub struct FfprobeDurationProbe {
    ffprobe_path: String,
}

impl FfprobeDurationProbe {
    pub fn new(ffprobe_path: impl Into<String>) -> Self {
        FfprobeDurationProbe {
            ffprobe_path: ffprobe_path.into(),
        }
    }

    fn parse_output(stdout: &[u8]) -> PipelineResult<Option<f64>> {
        let probe: FFprobeOutput = serde_json::from_slice(stdout)
            .map_err(|e| PipelineError::Probe(format!("Failed to parse ffprobe output: {}", e)))?;

        Ok(probe
            .format
            .and_then(|f| f.duration)
            .and_then(|d| d.trim().parse::<f64>().ok()))
    }
}

#[async_trait]
impl DurationProbe for FfprobeDurationProbe {
    #[tracing::instrument(skip(self), fields(
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    async fn duration_seconds(&self, path: &Path) -> PipelineResult<Option<f64>> {
        let start = std::time::Instant::now();

        let output = Command::new(&self.ffprobe_path)
            .args(["-v", "error", "-show_format", "-of", "json"])
            .arg(path)
            .output()
            .await
            .map_err(|e| PipelineError::Probe(format!("Failed to run ffprobe: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::error!(stderr = %stderr.trim(), "ffprobe failed");
            return Err(PipelineError::Probe(format!("ffprobe failed: {}", stderr.trim())));
        }

        let duration = Self::parse_output(&output.stdout)?;

        tracing::debug!(
            duration_seconds = ?duration,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "ffprobe finished"
        );

        Ok(duration)
    }
}
