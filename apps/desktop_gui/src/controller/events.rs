//! UI/backend events and error modeling for desktop GUI controller.

use client_core::{ListView, Operation, OperationError};
use shared::{domain::IssueId, protocol::Issue};

#[derive(Debug, Clone)]
pub enum UiEvent {
    ListUpdated(ListView),
    IssueSaved(Issue),
    IssueDeleted(IssueId),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    FetchIssues,
    SaveIssue,
    DeleteIssue,
}

impl From<Operation> for UiErrorContext {
    fn from(operation: Operation) -> Self {
        match operation {
            Operation::FetchIssues => Self::FetchIssues,
            Operation::SaveIssue => Self::SaveIssue,
            Operation::DeleteIssue => Self::DeleteIssue,
        }
    }
}

/// A failure shown to the user. Only the context picks the headline; the
/// message is carried along for the log and the alert body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiError {
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        Self {
            context,
            message: message.into(),
        }
    }

    pub fn headline(&self) -> &'static str {
        match self.context {
            UiErrorContext::BackendStartup => "Failed to start backend worker",
            UiErrorContext::FetchIssues => Operation::FetchIssues.failure_message(),
            UiErrorContext::SaveIssue => Operation::SaveIssue.failure_message(),
            UiErrorContext::DeleteIssue => Operation::DeleteIssue.failure_message(),
        }
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<OperationError> for UiError {
    fn from(err: OperationError) -> Self {
        Self::from_message(err.operation.into(), err.source.to_string())
    }
}
