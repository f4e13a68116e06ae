use shared::{
    domain::{IssueId, IssuePriority, IssueStatus},
    protocol::{Issue, IssueFields},
};
use tracing::{error, info};

use crate::{
    error::{Operation, OperationError},
    IssueApi,
};

/// Editable copy of an issue's fields. `id` is set only when editing an
/// existing issue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueDraft {
    pub id: Option<IssueId>,
    pub title: String,
    pub description: String,
    pub status: IssueStatus,
    pub priority: IssuePriority,
    pub assignee: String,
}

impl IssueDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_issue(issue: &Issue) -> Self {
        Self {
            id: Some(issue.id),
            title: issue.title.clone(),
            description: issue.description.clone().unwrap_or_default(),
            status: issue.status,
            priority: issue.priority,
            assignee: issue.assignee.clone().unwrap_or_default(),
        }
    }

    pub fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    pub fn heading(&self) -> &'static str {
        if self.is_edit() {
            "Edit Issue"
        } else {
            "Create Issue"
        }
    }

    /// Payload for create or update. Updates replace every editable field,
    /// so cleared texts are sent as empty strings; a new issue leaves them out.
    pub fn to_fields(&self) -> IssueFields {
        let text = |value: &str| {
            if self.is_edit() || !value.trim().is_empty() {
                Some(value.to_string())
            } else {
                None
            }
        };
        IssueFields {
            title: self.title.clone(),
            description: text(&self.description),
            status: self.status,
            priority: self.priority,
            assignee: text(self.assignee.trim()),
        }
    }
}

/// Open create/edit form: the draft plus whether a save is in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueForm {
    pub draft: IssueDraft,
    saving: bool,
}

impl IssueForm {
    pub fn create() -> Self {
        Self::default()
    }

    pub fn edit(issue: &Issue) -> Self {
        Self {
            draft: IssueDraft::from_issue(issue),
            saving: false,
        }
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Marks the form as saving and hands out the draft to submit. Returns
    /// `None` while a previous save is still pending.
    pub fn begin_save(&mut self) -> Option<IssueDraft> {
        if self.saving {
            return None;
        }
        self.saving = true;
        Some(self.draft.clone())
    }

    pub fn save_failed(&mut self) {
        self.saving = false;
    }
}

/// Creates or updates depending on whether the draft has an id.
pub async fn save_draft<A>(api: &A, draft: &IssueDraft) -> Result<Issue, OperationError>
where
    A: IssueApi + ?Sized,
{
    let fields = draft.to_fields();
    let result = match draft.id {
        Some(issue_id) => api.update_issue(issue_id, &fields).await,
        None => api.create_issue(&fields).await,
    };

    match result {
        Ok(issue) => {
            info!(issue_id = issue.id.0, edit = draft.is_edit(), "issue saved");
            Ok(issue)
        }
        Err(err) => {
            error!(error = %err, issue_id = ?draft.id, "issue save failed");
            Err(OperationError::new(Operation::SaveIssue, err))
        }
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
