//! Domain error types for the test case console.
//!
//! Uses thiserror for ergonomic error handling with automatic Display implementations.

use std::fmt;

/// Application-level errors.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Invalid input data, rejected before any network call
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP or transport failure talking to the backend
    #[error("Request failed{}: {message}", status_suffix(.status))]
    Request {
        /// HTTP status code, `None` for transport failures
        status: Option<u16>,
        message: String,
    },

    /// Resource not found
    #[error("{0} not found")]
    NotFound(String),

    /// Spreadsheet could not be read or written
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// Local file system operation failed
    #[error("File system error: {0}")]
    Io(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" ({})", code),
        None => String::new(),
    }
}

impl AppError {
    /// Build a request error from an HTTP status and message.
    pub fn request(status: Option<u16>, message: impl Into<String>) -> Self {
        AppError::Request {
            status,
            message: message.into(),
        }
    }

    /// HTTP status carried by a request error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Request { status, .. } => *status,
            _ => None,
        }
    }

    /// Short message suitable for a transient user-facing notice.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Request { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Error body returned by the backend on failed requests.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl ErrorResponse {
    /// Most specific human-readable text in the body.
    pub fn best_message(&self) -> Option<&str> {
        [&self.message, &self.title, &self.error]
            .into_iter()
            .filter_map(|m| m.as_deref())
            .find(|m| !m.trim().is_empty())
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.best_message().unwrap_or("unknown error"))
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

// Conversion implementations for common error types

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Request {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<rust_xlsxwriter::XlsxError> for AppError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        AppError::Spreadsheet(err.to_string())
    }
}

impl From<calamine::XlsxError> for AppError {
    fn from(err: calamine::XlsxError) -> Self {
        AppError::Spreadsheet(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}
