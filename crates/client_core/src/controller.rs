use shared::{domain::IssueId, protocol::Issue};
use tracing::{error, info};

use crate::{
    error::{Operation, OperationError},
    query::{page_count, QueryAction, QueryState},
    IssueApi,
};

/// Everything the list screen renders: the query that produced the page and
/// the page itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListView {
    pub query: QueryState,
    pub items: Vec<Issue>,
    pub total: u64,
}

impl ListView {
    pub fn pages(&self) -> u32 {
        page_count(self.total, self.query.page_size())
    }

    pub fn can_go_previous(&self) -> bool {
        self.query.page() > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.query.page() < self.pages()
    }
}

/// Owns the list query and the last page fetched for it. Each state change
/// that needs new data costs one list request; nothing is cached beyond the
/// current page.
pub struct IssueListController<A> {
    api: A,
    query: QueryState,
    items: Vec<Issue>,
    total: u64,
}

impl<A: IssueApi> IssueListController<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            query: QueryState::default(),
            items: Vec::new(),
            total: 0,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn items(&self) -> &[Issue] {
        &self.items
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn view(&self) -> ListView {
        ListView {
            query: self.query.clone(),
            items: self.items.clone(),
            total: self.total,
        }
    }

    /// Fetches the page for the current query. On failure the previously
    /// loaded page stays in place.
    pub async fn refresh(&mut self) -> Result<(), OperationError> {
        let request = self.query.to_list_query();
        match self.api.list_issues(&request).await {
            Ok(page) => {
                self.items = page.items;
                self.total = page.total;
                Ok(())
            }
            Err(err) => {
                error!(error = %err, ?request, "issue list request failed");
                Err(OperationError::new(Operation::FetchIssues, err))
            }
        }
    }

    /// Applies a query change and refetches when it requires one. Returns
    /// whether a fetch happened.
    pub async fn apply(&mut self, action: QueryAction) -> Result<bool, OperationError> {
        if !self.query.apply(action, self.total) {
            return Ok(false);
        }
        self.refresh().await?;
        Ok(true)
    }

    /// Deletes an issue, then reloads the current page.
    pub async fn delete_issue(&mut self, issue_id: IssueId) -> Result<(), OperationError> {
        if let Err(err) = self.api.delete_issue(issue_id).await {
            error!(error = %err, issue_id = issue_id.0, "issue delete failed");
            return Err(OperationError::new(Operation::DeleteIssue, err));
        }
        info!(issue_id = issue_id.0, "issue deleted");
        self.refresh().await
    }

    /// Called once the form has saved successfully.
    pub async fn issue_saved(&mut self) -> Result<(), OperationError> {
        self.refresh().await
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
