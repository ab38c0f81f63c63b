//! Error types module
//!
//! All failures the dropbox can report to a client are unified under `AppError`.
//! Crate-local error types (storage, pipeline) convert into it at the API boundary.

use std::error::Error as _;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected client mistakes
    Debug,
    Warn,
    /// Server-side failures
    Error,
}

/// How an error is presented to clients and logs.
pub trait ErrorMetadata {
    fn http_status_code(&self) -> u16;

    /// Stable machine-readable code, e.g. `NOT_FOUND`
    fn error_code(&self) -> &'static str;

    /// Whether retrying the same request may succeed
    fn is_recoverable(&self) -> bool;

    fn suggested_action(&self) -> Option<&'static str>;

    /// Message safe to show to any client
    fn client_message(&self) -> String;

    /// Sensitive errors never expose their details
    fn is_sensitive(&self) -> bool;

    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Media pipeline error: {0}")]
    Pipeline(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error: {message}")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

struct Presentation {
    status: u16,
    code: &'static str,
    recoverable: bool,
    action: &'static str,
    sensitive: bool,
    level: LogLevel,
}

const fn client_fault(status: u16, code: &'static str, action: &'static str) -> Presentation {
    Presentation {
        status,
        code,
        recoverable: false,
        action,
        sensitive: false,
        level: LogLevel::Debug,
    }
}

impl AppError {
    fn presentation(&self) -> Presentation {
        match self {
            AppError::Unauthorized(_) => {
                client_fault(401, "UNAUTHORIZED", "Check the dropbox password")
            }
            AppError::NotFound(_) => client_fault(404, "NOT_FOUND", "Verify the media ID exists"),
            AppError::Validation(_) => client_fault(
                400,
                "VALIDATION_FAILED",
                "Fix the listed violations and try again",
            ),
            AppError::InvalidInput(_) => {
                client_fault(400, "INVALID_INPUT", "Check request parameters and try again")
            }
            AppError::PayloadTooLarge(_) => Presentation {
                level: LogLevel::Warn,
                ..client_fault(
                    413,
                    "PAYLOAD_TOO_LARGE",
                    "Reduce file size to the advertised dropbox limit",
                )
            },
            AppError::Pipeline(_) => Presentation {
                level: LogLevel::Error,
                ..client_fault(
                    500,
                    "MEDIA_PIPELINE_ERROR",
                    "Check that the uploaded file is a valid media or subtitle file",
                )
            },
            AppError::Storage(_) => Presentation {
                status: 500,
                code: "STORAGE_ERROR",
                recoverable: true,
                action: "Retry after a short delay",
                sensitive: true,
                level: LogLevel::Error,
            },
            AppError::Internal(_) | AppError::InternalWithSource { .. } => Presentation {
                status: 500,
                code: "INTERNAL_ERROR",
                recoverable: true,
                action: "Retry after a short delay",
                sensitive: true,
                level: LogLevel::Error,
            },
        }
    }

    /// Failure category reported as `error_type` outside production
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => "AuthenticationFailure",
            AppError::NotFound(_) => "NotFound",
            AppError::Validation(_) => "ValidationFailure",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::PayloadTooLarge(_) => "UploadTooLarge",
            AppError::Pipeline(_) => "PipelineFailure",
            AppError::Storage(_) => "Storage",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "Internal",
        }
    }

    pub fn violations(&self) -> Option<&[String]> {
        match self {
            AppError::Validation(violations) => Some(violations),
            _ => None,
        }
    }

    /// The error message followed by up to five causes, one per line.
    pub fn detailed_message(&self) -> String {
        const MAX_CAUSES: usize = 5;

        let mut details = self.to_string();
        let causes = std::iter::successors(self.source(), |&err| err.source());
        for (depth, cause) in causes.enumerate() {
            if depth == MAX_CAUSES {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str("\n  Caused by: ");
            details.push_str(&cause.to_string());
        }
        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        self.presentation().status
    }

    fn error_code(&self) -> &'static str {
        self.presentation().code
    }

    fn is_recoverable(&self) -> bool {
        self.presentation().recoverable
    }

    fn suggested_action(&self) -> Option<&'static str> {
        Some(self.presentation().action)
    }

    fn is_sensitive(&self) -> bool {
        self.presentation().sensitive
    }

    fn log_level(&self) -> LogLevel {
        self.presentation().level
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Unauthorized(msg)
            | AppError::NotFound(msg)
            | AppError::InvalidInput(msg)
            | AppError::PayloadTooLarge(msg) => msg.clone(),
            AppError::Validation(_) => "Invalid request.".to_string(),
            AppError::Pipeline(_) => "Failed to process uploaded file".to_string(),
            AppError::Storage(_) => "Failed to persist library".to_string(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_presentation() {
        let err = AppError::Unauthorized("Invalid password.".to_string());
        assert_eq!(err.http_status_code(), 401);
        assert_eq!(err.error_code(), "UNAUTHORIZED");
        assert_eq!(err.client_message(), "Invalid password.");
        assert!(!err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_not_found_presentation() {
        let err = AppError::NotFound("Media not found".to_string());
        assert_eq!(err.http_status_code(), 404);
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert!(!err.is_recoverable());
        assert_eq!(err.client_message(), "Media not found");
    }

    #[test]
    fn test_validation_lists_every_violation() {
        let err = AppError::Validation(vec![
            "setTitle must be 1-128 characters".to_string(),
            "tag 'Rock' must be lowercase".to_string(),
        ]);
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.violations().map(|v| v.len()), Some(2));
        assert!(err.to_string().contains("setTitle"));
        assert!(err.to_string().contains("'Rock'"));
    }

    #[test]
    fn test_pipeline_failure_keeps_detail() {
        let err = AppError::Pipeline("ffprobe exited with status 1".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.log_level(), LogLevel::Error);
        assert!(!err.is_sensitive());
        assert!(err.detailed_message().contains("ffprobe"));
    }

    #[test]
    fn test_storage_error_is_sensitive() {
        let err = AppError::Storage("disk full".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert!(err.is_sensitive());
        assert!(err.is_recoverable());
        assert_eq!(err.client_message(), "Failed to persist library");
    }

    #[test]
    fn test_detailed_message_walks_causes() {
        let root = std::io::Error::new(std::io::ErrorKind::Other, "disk gone");
        let err = AppError::from(anyhow::Error::new(root).context("saving library"));
        let details = err.detailed_message();
        assert!(details.starts_with("Internal error: saving library"));
        assert!(details.contains("Caused by: disk gone"));
    }
}
