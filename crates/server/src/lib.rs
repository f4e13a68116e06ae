use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use server_api::{create_issue, delete_issue, get_issue, list_issues, update_issue, ApiContext};
use shared::{
    domain::IssueId,
    error::{ApiError, ErrorCode},
    protocol::{
        DeleteIssueResponse, HealthResponse, Issue, IssueFields, IssuePage, IssuePatch,
        ListIssuesQuery,
    },
};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::warn;

pub mod config;

const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub api: ApiContext,
}

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(healthz))
        .route("/issues", get(http_list_issues).post(http_create_issue))
        .route(
            "/issues/:issue_id",
            get(http_get_issue)
                .put(http_update_issue)
                .delete(http_delete_issue),
        )
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn http_list_issues(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListIssuesQuery>,
) -> ApiResult<Json<IssuePage>> {
    list_issues(&state.api, &query)
        .await
        .map(Json)
        .map_err(into_response)
}

async fn http_get_issue(
    State(state): State<Arc<AppState>>,
    Path(issue_id): Path<i64>,
) -> ApiResult<Json<Issue>> {
    get_issue(&state.api, IssueId(issue_id))
        .await
        .map(Json)
        .map_err(into_response)
}

async fn http_create_issue(
    State(state): State<Arc<AppState>>,
    Json(fields): Json<IssueFields>,
) -> ApiResult<(StatusCode, Json<Issue>)> {
    let issue = create_issue(&state.api, fields)
        .await
        .map_err(into_response)?;
    Ok((StatusCode::CREATED, Json(issue)))
}

async fn http_update_issue(
    State(state): State<Arc<AppState>>,
    Path(issue_id): Path<i64>,
    Json(patch): Json<IssuePatch>,
) -> ApiResult<Json<Issue>> {
    update_issue(&state.api, IssueId(issue_id), patch)
        .await
        .map(Json)
        .map_err(into_response)
}

async fn http_delete_issue(
    State(state): State<Arc<AppState>>,
    Path(issue_id): Path<i64>,
) -> ApiResult<Json<DeleteIssueResponse>> {
    delete_issue(&state.api, IssueId(issue_id))
        .await
        .map(Json)
        .map_err(into_response)
}

fn into_response(err: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match err.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCode::Internal => {
            warn!(error = %err.message, "issue request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(err))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
