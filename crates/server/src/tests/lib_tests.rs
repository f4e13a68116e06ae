use super::*;
use axum::{body, body::Body, http::Request};
use storage::Storage;
use tower::ServiceExt;

fn test_app() -> Router {
    let api = ApiContext {
        storage: Storage::in_memory(),
    };
    build_router(Arc::new(AppState { api }))
}

async fn read_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

fn json_request(method: &str, uri: &str, value: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(value.to_string()))
        .expect("request")
}

#[tokio::test]
async fn health_reports_ok() {
    let app = test_app();
    let request = Request::get("/health").body(Body::empty()).expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body: HealthResponse = read_json(response).await;
    assert_eq!(body.status, "ok");
}

#[tokio::test]
async fn create_then_list_returns_server_assigned_fields() {
    let app = test_app();
    let create = json_request(
        "POST",
        "/issues",
        serde_json::json!({ "title": "Bug A", "status": "open", "priority": "high" }),
    );
    let response = app.clone().oneshot(create).await.expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Issue = read_json(response).await;
    assert_eq!(created.id, IssueId(1));

    let list = Request::get("/issues?search=bug&priority=high&sortBy=id&sortDir=asc&page=1&pageSize=5")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(list).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let page: IssuePage = read_json(response).await;
    assert_eq!(page.total, 1);
    assert_eq!(page.page_size, 5);
    assert_eq!(page.items, vec![created]);
}

#[tokio::test]
async fn empty_query_values_are_ignored() {
    let app = test_app();
    let create = json_request("POST", "/issues", serde_json::json!({ "title": "Bug A" }));
    app.clone().oneshot(create).await.expect("response");

    let list = Request::get("/issues?search=&status=&priority=&assignee=")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(list).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let page: IssuePage = read_json(response).await;
    assert_eq!(page.total, 1);
}

#[tokio::test]
async fn update_keeps_id_and_changes_status() {
    let app = test_app();
    let create = json_request("POST", "/issues", serde_json::json!({ "title": "Bug A" }));
    let created: Issue = read_json(app.clone().oneshot(create).await.expect("response")).await;

    let update = json_request(
        "PUT",
        &format!("/issues/{}", created.id),
        serde_json::json!({
            "title": "Bug A",
            "description": null,
            "status": "closed",
            "priority": "medium",
            "assignee": null,
        }),
    );
    let response = app.clone().oneshot(update).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Issue = read_json(response).await;
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.status, shared::domain::IssueStatus::Closed);

    let get = Request::get(format!("/issues/{}", created.id))
        .body(Body::empty())
        .expect("request");
    let fetched: Issue = read_json(app.oneshot(get).await.expect("response")).await;
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let app = test_app();
    let create = json_request("POST", "/issues", serde_json::json!({ "title": "Bug A" }));
    let created: Issue = read_json(app.clone().oneshot(create).await.expect("response")).await;

    let delete = Request::delete(format!("/issues/{}", created.id))
        .body(Body::empty())
        .expect("request");
    let response = app.clone().oneshot(delete).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body: DeleteIssueResponse = read_json(response).await;
    assert_eq!(body, DeleteIssueResponse::deleted(created.id));

    let get = Request::get(format!("/issues/{}", created.id))
        .body(Body::empty())
        .expect("request");
    let response = app.clone().oneshot(get).await.expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let err: ApiError = read_json(response).await;
    assert_eq!(err.message, "Issue not found");

    let delete_again = Request::delete(format!("/issues/{}", created.id))
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(delete_again).await.expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blank_title_is_unprocessable() {
    let app = test_app();
    let create = json_request("POST", "/issues", serde_json::json!({ "title": " " }));
    let response = app.oneshot(create).await.expect("response");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
