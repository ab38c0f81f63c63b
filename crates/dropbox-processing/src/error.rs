use crate::subtitle::SubtitleError;
use dropbox_core::MediaId;
use dropbox_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Media {0} not found")]
    NotFound(MediaId),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Duration probe failed: {0}")]
    Probe(String),

    #[error("Subtitle conversion failed: {0}")]
    Subtitle(#[from] SubtitleError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
