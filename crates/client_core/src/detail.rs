use chrono::{DateTime, Utc};
use shared::protocol::Issue;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Read-only projection of one issue for the detail panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueDetailView {
    pub heading: String,
    pub rows: Vec<(&'static str, String)>,
    pub description: String,
    pub raw_json: String,
}

impl IssueDetailView {
    pub fn from_issue(issue: &Issue) -> Self {
        let rows = vec![
            ("Title", issue.title.clone()),
            ("Status", issue.status.to_string()),
            ("Priority", issue.priority.to_string()),
            ("Assignee", issue.assignee.clone().unwrap_or_default()),
            ("Created At", format_timestamp(&issue.created_at)),
            ("Updated At", format_timestamp(&issue.updated_at)),
        ];
        Self {
            heading: format!("Issue #{}", issue.id),
            rows,
            description: issue.description.clone().unwrap_or_default(),
            raw_json: serde_json::to_string_pretty(issue).unwrap_or_default(),
        }
    }
}

pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}
