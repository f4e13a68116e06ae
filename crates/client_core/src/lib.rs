use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::IssueId,
    error::ApiError,
    protocol::{Issue, IssueFields, IssuePage, ListIssuesQuery},
};
use tracing::debug;
use url::Url;

pub mod controller;
pub mod detail;
pub mod error;
pub mod form;
pub mod query;

pub use controller::{IssueListController, ListView};
pub use detail::IssueDetailView;
pub use error::{ClientError, Operation, OperationError};
pub use form::{save_draft, IssueDraft, IssueForm};
pub use query::{page_count, QueryAction, QueryState, PAGE_SIZE_OPTIONS};

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// The issue service's CRUD surface. Every call is a single round trip; there
/// are no retries and failures are returned as-is.
#[async_trait]
pub trait IssueApi: Send + Sync {
    async fn list_issues(&self, query: &ListIssuesQuery) -> Result<IssuePage, ClientError>;
    async fn get_issue(&self, issue_id: IssueId) -> Result<Issue, ClientError>;
    async fn create_issue(&self, fields: &IssueFields) -> Result<Issue, ClientError>;
    async fn update_issue(
        &self,
        issue_id: IssueId,
        fields: &IssueFields,
    ) -> Result<Issue, ClientError>;
    /// Returns the parsed response body, if the service sent one. Its shape
    /// is up to the service.
    async fn delete_issue(
        &self,
        issue_id: IssueId,
    ) -> Result<Option<serde_json::Value>, ClientError>;
}

#[derive(Clone)]
pub struct IssueClient {
    http: Client,
    base_url: String,
}

impl IssueClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_http_client(Client::new(), base_url)
    }

    pub fn with_http_client(http: Client, base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn issues_url(&self) -> String {
        format!("{}/issues", self.base_url)
    }

    fn issue_url(&self, issue_id: IssueId) -> String {
        format!("{}/issues/{}", self.base_url, issue_id.0)
    }
}

#[async_trait]
impl IssueApi for IssueClient {
    async fn list_issues(&self, query: &ListIssuesQuery) -> Result<IssuePage, ClientError> {
        debug!(?query, "listing issues");
        let response = self.http.get(self.issues_url()).query(query).send().await?;
        read_json(response).await
    }

    async fn get_issue(&self, issue_id: IssueId) -> Result<Issue, ClientError> {
        let response = self.http.get(self.issue_url(issue_id)).send().await?;
        read_json(response).await
    }

    async fn create_issue(&self, fields: &IssueFields) -> Result<Issue, ClientError> {
        let response = self
            .http
            .post(self.issues_url())
            .json(fields)
            .send()
            .await?;
        read_json(response).await
    }

    async fn update_issue(
        &self,
        issue_id: IssueId,
        fields: &IssueFields,
    ) -> Result<Issue, ClientError> {
        let response = self
            .http
            .put(self.issue_url(issue_id))
            .json(fields)
            .send()
            .await?;
        read_json(response).await
    }

    async fn delete_issue(
        &self,
        issue_id: IssueId,
    ) -> Result<Option<serde_json::Value>, ClientError> {
        let response = self.http.delete(self.issue_url(issue_id)).send().await?;
        let bytes = ensure_success(response).await?.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ClientError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let invalid = |reason: String| ClientError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };
    let parsed = Url::parse(trimmed).map_err(|err| invalid(err.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid("base url must start with http:// or https://".to_string()));
    }
    Ok(trimmed.to_string())
}

async fn ensure_success(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = match response.text().await {
        Ok(body) => body,
        Err(err) => {
            debug!(%status, error = %err, "failed to read error response body");
            String::new()
        }
    };
    let message = match serde_json::from_str::<ApiError>(&body) {
        Ok(api_error) => api_error.message,
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_string(),
    };
    Err(ClientError::Status { status, message })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let bytes = ensure_success(response).await?.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
#[path = "tests/fake_api.rs"]
pub(crate) mod fake_api;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
