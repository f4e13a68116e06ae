use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid api base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("malformed response payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// User-facing operation a failure is reported against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FetchIssues,
    SaveIssue,
    DeleteIssue,
}

impl Operation {
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::FetchIssues => "Failed to fetch issues",
            Self::SaveIssue => "Failed to save issue",
            Self::DeleteIssue => "Failed to delete issue",
        }
    }
}

/// A failed API call tagged with the operation that issued it. Every kind of
/// `ClientError` is surfaced the same way.
#[derive(Debug, Error)]
#[error("{}: {source}", .operation.failure_message())]
pub struct OperationError {
    pub operation: Operation,
    #[source]
    pub source: ClientError,
}

impl OperationError {
    pub fn new(operation: Operation, source: ClientError) -> Self {
        Self { operation, source }
    }
}
