use thiserror::Error;

/// Errors surfaced by the client.
///
/// Low-level transport failures are never retried automatically; only the
/// job-status poll loop repeats. Composed operations map remote rejections
/// and exhausted poll budgets into distinct variants so callers can tell
/// "server said no" from "job never finished" from "archive was unusable".
#[derive(Debug, Error)]
pub enum AppError {
    /// Caller-supplied input was unusable (unparseable date, bad config value)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The remote service rejected a request with a non-success status
    #[error("Remote service rejected the request (status {status}): {message}")]
    RemoteRejected { status: u16, message: String },
    /// The poll budget was exhausted before the export job finished
    #[error("Export did not complete within {attempts} status checks")]
    PollTimeout { attempts: u32 },
    /// The downloaded archive was missing a CSV member or failed to parse
    #[error("Archive error: {0}")]
    ArchiveError(String),
    /// Network request failed
    #[error("Network error: {0}")]
    NetworkError(String),
    /// Failed to decode a response body
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Invalid URL format
    #[error("Invalid URL: {0}")]
    UrlError(String),
    /// IO operation failed
    #[error("IO error: {0}")]
    IoError(String),
}

// Conversion implementations for common errors
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::NetworkError(err.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::UrlError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<zip::result::ZipError> for AppError {
    fn from(err: zip::result::ZipError) -> Self {
        AppError::ArchiveError(err.to_string())
    }
}

impl From<polars::error::PolarsError> for AppError {
    fn from(err: polars::error::PolarsError) -> Self {
        AppError::ArchiveError(err.to_string())
    }
}

// Custom type alias for Results in this crate
pub type AppResult<T> = Result<T, AppError>;
