//! SubRip (SRT) to WebVTT conversion.
//!
//! The converter streams line by line, so large subtitle files never sit in memory.

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

const BOM: char = '\u{feff}';

#[derive(Debug, Error)]
pub enum SubtitleError {
    #[error("input contains no subtitle timing lines")]
    NoCues,

    #[error("subtitle file is not valid UTF-8")]
    InvalidEncoding,

    #[error("IO error: {0}")]
    Io(std::io::Error),
}

impl From<std::io::Error> for SubtitleError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::InvalidData {
            SubtitleError::InvalidEncoding
        } else {
            SubtitleError::Io(e)
        }
    }
}

/// Convert SRT read from `reader` into WebVTT written to `writer`.
///
/// Returns the number of cues converted. Cue numbers are kept as VTT cue
/// identifiers; text and blank lines pass through unchanged.
pub async fn convert_srt_to_vtt<R, W>(reader: R, writer: &mut W) -> Result<usize, SubtitleError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut cues = 0usize;
    let mut first = true;

    writer.write_all(b"WEBVTT\n\n").await?;

    while let Some(line) = lines.next_line().await? {
        let mut line = line.trim_end_matches('\r');
        if first {
            line = line.trim_start_matches(BOM);
            first = false;
        }

        match convert_timing_line(line) {
            Some(timing) => {
                cues += 1;
                writer.write_all(timing.as_bytes()).await?;
            }
            None => writer.write_all(line.as_bytes()).await?,
        }
        writer.write_all(b"\n").await?;
    }

    if cues == 0 {
        return Err(SubtitleError::NoCues);
    }

    writer.flush().await?;
    Ok(cues)
}

/// Rewrite `00:00:01,000 --> 00:00:04,000 [settings]` with dot separators.
///
/// Returns `None` for anything that is not a timing line.
fn convert_timing_line(line: &str) -> Option<String> {
    let (start, rest) = line.split_once("-->")?;
    let start = start.trim();
    let rest = rest.trim_start();
    let (end, settings) = match rest.find(char::is_whitespace) {
        Some(idx) => (&rest[..idx], rest[idx..].trim()),
        None => (rest, ""),
    };

    if !is_timestamp(start) || !is_timestamp(end) {
        return None;
    }

    let mut out = format!("{} --> {}", start.replace(',', "."), end.replace(',', "."));
    if !settings.is_empty() {
        out.push(' ');
        out.push_str(settings);
    }
    Some(out)
}

/// `[HH:]MM:SS,mmm` (either `,` or `.` before the milliseconds).
fn is_timestamp(s: &str) -> bool {
    let Some((clock, millis)) = s.rsplit_once([',', '.']) else {
        return false;
    };
    if millis.len() != 3 || !millis.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let parts: Vec<&str> = clock.split(':').collect();
    (2..=3).contains(&parts.len())
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
}
