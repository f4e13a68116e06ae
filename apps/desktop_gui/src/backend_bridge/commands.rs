//! Backend commands queued from UI to backend worker.

use client_core::{IssueDraft, QueryAction};
use shared::domain::IssueId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    Refresh,
    Query(QueryAction),
    SaveIssue { draft: IssueDraft },
    DeleteIssue { issue_id: IssueId },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Refresh => "refresh",
            Self::Query(_) => "query",
            Self::SaveIssue { .. } => "save_issue",
            Self::DeleteIssue { .. } => "delete_issue",
        }
    }
}
