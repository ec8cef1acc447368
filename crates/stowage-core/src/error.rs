//! Error types module
//!
//! All failures surfaced by the upload pipeline and the file access facade are
//! unified under [`FileError`]. Each variant self-describes how it should be
//! reported through [`ErrorMetadata`].

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like a missing file
    Debug,
    /// Warning level - for rejected input
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// Numeric code (HTTP-style) for the failure
    fn status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "INVALID_FILE")
    fn error_code(&self) -> &'static str;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FileError {
    /// The transport marked the upload invalid, or its size is unknown.
    #[error("{0}")]
    InvalidFile(String),

    /// The upload stream could not be read, or the backend refused the write.
    #[error("{0}")]
    InvalidUpload(String),

    /// Outermost upload failure, wrapping the message and code of the cause.
    #[error("{message}")]
    UploadFailed { message: String, code: u16 },

    /// The backend reports the path absent.
    #[error("{0}")]
    MissingFile(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl FileError {
    /// Re-signal any failure as [`FileError::UploadFailed`], keeping its message and code.
    pub fn into_upload_failed(self) -> Self {
        match self {
            FileError::UploadFailed { .. } => self,
            other => FileError::UploadFailed {
                message: other.to_string(),
                code: other.status_code(),
            },
        }
    }
}

impl ErrorMetadata for FileError {
    fn status_code(&self) -> u16 {
        match self {
            FileError::InvalidFile(_) => 422,
            FileError::InvalidUpload(_) => 500,
            FileError::UploadFailed { code, .. } => *code,
            FileError::MissingFile(_) => 404,
            FileError::Storage(_) => 502,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            FileError::InvalidFile(_) => "INVALID_FILE",
            FileError::InvalidUpload(_) => "INVALID_UPLOAD",
            FileError::UploadFailed { .. } => "UPLOAD_FAILED",
            FileError::MissingFile(_) => "MISSING_FILE",
            FileError::Storage(_) => "STORAGE_ERROR",
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            FileError::MissingFile(_) => LogLevel::Debug,
            FileError::InvalidFile(_) => LogLevel::Warn,
            FileError::InvalidUpload(_) | FileError::UploadFailed { .. } | FileError::Storage(_) => {
                LogLevel::Error
            }
        }
    }
}

/// Result type for file operations
pub type FileResult<T> = Result<T, FileError>;
