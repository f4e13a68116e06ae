use std::cmp::Ordering;

use shared::{
    domain::{IssueId, SortDirection, SortField},
    error::{ApiError, ErrorCode},
    protocol::{
        DeleteIssueResponse, Issue, IssueFields, IssuePage, IssuePatch, ListIssuesQuery,
        DEFAULT_PAGE_SIZE,
    },
};
use storage::Storage;
use tracing::info;

const NOT_FOUND: &str = "Issue not found";

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

pub async fn list_issues(ctx: &ApiContext, query: &ListIssuesQuery) -> Result<IssuePage, ApiError> {
    let mut issues: Vec<Issue> = ctx
        .storage
        .list_issues()
        .await
        .into_iter()
        .filter(|issue| matches_query(issue, query))
        .collect();
    sort_issues(&mut issues, query.sort_by, query.sort_dir);

    let page_size = if query.page_size == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        query.page_size
    };
    let page = query.page.max(1);
    let total = issues.len() as u64;
    let start = (page as usize - 1).saturating_mul(page_size as usize);
    let items = issues
        .into_iter()
        .skip(start)
        .take(page_size as usize)
        .collect();

    Ok(IssuePage {
        items,
        total,
        page,
        page_size,
    })
}

pub async fn get_issue(ctx: &ApiContext, issue_id: IssueId) -> Result<Issue, ApiError> {
    ctx.storage
        .get_issue(issue_id)
        .await
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

pub async fn create_issue(ctx: &ApiContext, fields: IssueFields) -> Result<Issue, ApiError> {
    ensure_title(&fields.title)?;
    let issue = ctx.storage.insert_issue(fields).await.map_err(internal)?;
    info!(issue_id = issue.id.0, "issue created");
    Ok(issue)
}

pub async fn update_issue(
    ctx: &ApiContext,
    issue_id: IssueId,
    patch: IssuePatch,
) -> Result<Issue, ApiError> {
    if let Some(title) = &patch.title {
        ensure_title(title)?;
    }
    let updated = ctx
        .storage
        .update_issue(issue_id, patch)
        .await
        .map_err(internal)?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;
    info!(issue_id = issue_id.0, "issue updated");
    Ok(updated)
}

pub async fn delete_issue(
    ctx: &ApiContext,
    issue_id: IssueId,
) -> Result<DeleteIssueResponse, ApiError> {
    let removed = ctx
        .storage
        .delete_issue(issue_id)
        .await
        .map_err(internal)?;
    if !removed {
        return Err(ApiError::not_found(NOT_FOUND));
    }
    info!(issue_id = issue_id.0, "issue deleted");
    Ok(DeleteIssueResponse::deleted(issue_id))
}

/// Title search and assignee search are case-insensitive substring matches;
/// status and priority must match exactly. Issues without an assignee never
/// match an assignee search.
fn matches_query(issue: &Issue, query: &ListIssuesQuery) -> bool {
    if let Some(search) = non_blank(query.search.as_deref()) {
        if !contains_ignore_case(&issue.title, search) {
            return false;
        }
    }
    if let Some(status) = query.status {
        if issue.status != status {
            return false;
        }
    }
    if let Some(priority) = query.priority {
        if issue.priority != priority {
            return false;
        }
    }
    if let Some(assignee) = non_blank(query.assignee.as_deref()) {
        match issue.assignee.as_deref() {
            Some(value) if contains_ignore_case(value, assignee) => {}
            _ => return false,
        }
    }
    true
}

fn sort_issues(issues: &mut [Issue], sort_by: SortField, sort_dir: SortDirection) {
    issues.sort_by(|a, b| {
        let ordering = compare_by(a, b, sort_by);
        match sort_dir {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

fn compare_by(a: &Issue, b: &Issue, sort_by: SortField) -> Ordering {
    match sort_by {
        SortField::Id => a.id.cmp(&b.id),
        SortField::Title => a.title.cmp(&b.title),
        // Declared order (open, in_progress, closed / low, medium, high).
        SortField::Status => a.status.cmp(&b.status),
        SortField::Priority => a.priority.cmp(&b.priority),
        SortField::Assignee => a
            .assignee
            .as_deref()
            .unwrap_or_default()
            .cmp(b.assignee.as_deref().unwrap_or_default()),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn ensure_title(title: &str) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        return Err(ApiError::new(ErrorCode::Validation, "title must not be empty"));
    }
    Ok(())
}

fn internal(err: anyhow::Error) -> ApiError {
    ApiError::new(ErrorCode::Internal, err.to_string())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
