//! Common utilities for file upload handlers

use crate::error::HttpAppError;
use axum::extract::multipart::Field;
use axum::extract::Multipart;
use dropbox_core::AppError;
use dropbox_storage::MediaRoot;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;

/// A file part written to the media root's staging area.
#[derive(Debug)]
pub struct StagedUpload {
    pub path: PathBuf,
    pub filename: String,
    pub size_bytes: u64,
}

/// Parsed multipart upload: at most one staged file plus the text fields.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<StagedUpload>,
    pub fields: HashMap<String, String>,
}

impl UploadForm {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// Remove the staged file, if any.
    pub async fn discard(self) {
        if let Some(file) = self.file {
            MediaRoot::discard(&file.path).await;
        }
    }
}

async fn stage_field(field: &mut Field<'_>, media: &MediaRoot) -> Result<StagedUpload, HttpAppError> {
    let filename = field
        .file_name()
        .map(str::to_string)
        .unwrap_or_else(|| "upload".to_string());
    let path = media.staging_path();
    let start = std::time::Instant::now();

    let mut file = tokio::fs::File::create(&path)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to create staging file: {}", e)))?;

    let mut size_bytes = 0u64;
    let result: Result<(), HttpAppError> = async {
        while let Some(chunk) = field.chunk().await? {
            size_bytes += chunk.len() as u64;
            file.write_all(&chunk)
                .await
                .map_err(|e| AppError::Internal(format!("Failed to write upload: {}", e)))?;
        }
        file.sync_all()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to sync upload: {}", e)))?;
        Ok(())
    }
    .await;

    drop(file);
    if let Err(e) = result {
        MediaRoot::discard(&path).await;
        return Err(e);
    }

    tracing::debug!(
        filename = %filename,
        size_bytes,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Upload staged"
    );

    Ok(StagedUpload {
        path,
        filename,
        size_bytes,
    })
}

/// Read a multipart form, streaming the first field named in `file_fields` to disk.
///
/// A second file field is rejected. Other fields are read as text.
pub async fn read_upload_form(
    mut multipart: Multipart,
    media: &MediaRoot,
    file_fields: &[&str],
) -> Result<UploadForm, HttpAppError> {
    let mut form = UploadForm::default();

    loop {
        let mut field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                form.discard().await;
                return Err(e.into());
            }
        };

        let name = field.name().map(str::to_string).unwrap_or_default();

        if file_fields.contains(&name.as_str()) {
            if form.file.is_some() {
                form.discard().await;
                return Err(AppError::InvalidInput(format!(
                    "Multiple file fields are not allowed; send exactly one of: {}",
                    file_fields.join(", ")
                ))
                .into());
            }
            match stage_field(&mut field, media).await {
                Ok(staged) => form.file = Some(staged),
                Err(e) => {
                    form.discard().await;
                    return Err(e);
                }
            }
        } else {
            match field.text().await {
                Ok(value) => {
                    form.fields.insert(name, value);
                }
                Err(e) => {
                    form.discard().await;
                    return Err(e.into());
                }
            }
        }
    }

    Ok(form)
}
