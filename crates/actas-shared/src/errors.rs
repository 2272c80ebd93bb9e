use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Empty not allowed")]
    Empty,
    #[error("Maximum length exceeded. {max} allowed but found {actual}")]
    MaxExceeded { max: usize, actual: usize },
}

/// Errors produced when the backend answers with a non success status
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Any request that failed, including a 401 that could not be recovered
    #[error("{}", status_message(.status, .body))]
    Status { status: StatusCode, body: String },

    /// The refresh endpoint rejected the refresh token. The session has been
    /// terminated by the time this is seen
    #[error("session refresh failed: {}", status_message(.status, .body))]
    RefreshFailed { status: StatusCode, body: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Status { status, .. } | ApiError::RefreshFailed { status, .. } => *status,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == StatusCode::UNAUTHORIZED
    }
}

fn status_message(status: &StatusCode, body: &str) -> String {
    if body.is_empty() {
        format!("request failed with status code: {status} and no body")
    } else {
        body.to_string()
    }
}
