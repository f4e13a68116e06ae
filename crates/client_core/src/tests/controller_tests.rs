use super::*;
use crate::fake_api::{Call, FakeApi};
use shared::domain::{IssueStatus, SortDirection, SortField};

#[tokio::test]
async fn refresh_loads_the_first_page() {
    let mut controller = IssueListController::new(FakeApi::with_issues(23));
    controller.refresh().await.expect("refresh");

    let view = controller.view();
    assert_eq!(view.items.len(), 10);
    assert_eq!(view.total, 23);
    assert_eq!(view.pages(), 3);
    assert!(!view.can_go_previous());
    assert!(view.can_go_next());

    let calls = controller.api().list_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].sort_by, SortField::UpdatedAt);
    assert_eq!(calls[0].sort_dir, SortDirection::Desc);
}

#[tokio::test]
async fn each_effective_change_issues_exactly_one_request() {
    let mut controller = IssueListController::new(FakeApi::with_issues(23));
    controller.refresh().await.expect("refresh");

    assert!(controller.apply(QueryAction::NextPage).await.expect("next"));
    assert!(controller.apply(QueryAction::NextPage).await.expect("next"));
    assert!(!controller.apply(QueryAction::NextPage).await.expect("clamped"));
    assert_eq!(controller.query().page(), 3);
    assert_eq!(controller.items().len(), 3);

    assert!(!controller
        .apply(QueryAction::SetPageSize(10))
        .await
        .expect("same size"));
    assert!(controller
        .apply(QueryAction::SetStatus(Some(IssueStatus::Open)))
        .await
        .expect("status"));

    let calls = controller.api().list_calls();
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[3].status, Some(IssueStatus::Open));
    assert_eq!(calls[3].page, 3);
}

#[tokio::test]
async fn failed_refresh_keeps_previous_page() {
    let mut controller = IssueListController::new(FakeApi::with_issues(4));
    controller.refresh().await.expect("refresh");
    let before = controller.view();

    controller.api().set_failing(true);
    let err = controller
        .apply(QueryAction::ToggleSort(SortField::Title))
        .await
        .expect_err("list fails");
    assert_eq!(err.operation, Operation::FetchIssues);
    assert_eq!(
        err.to_string(),
        "Failed to fetch issues: server returned 500 Internal Server Error: boom"
    );

    let after = controller.view();
    assert_eq!(after.items, before.items);
    assert_eq!(after.total, before.total);
    assert_eq!(after.query.sort_by(), SortField::Title);
}

#[tokio::test]
async fn delete_refetches_current_page() {
    let mut controller = IssueListController::new(FakeApi::with_issues(3));
    controller.refresh().await.expect("refresh");

    controller.delete_issue(IssueId(2)).await.expect("delete");
    assert_eq!(controller.total(), 2);
    assert!(controller.items().iter().all(|issue| issue.id != IssueId(2)));

    let calls = controller.api().calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[1], Call::Delete(IssueId(2)));
    assert!(matches!(calls[2], Call::List(_)));
}

#[tokio::test]
async fn failed_delete_is_reported_without_refetch() {
    let mut controller = IssueListController::new(FakeApi::with_issues(3));
    controller.refresh().await.expect("refresh");

    let err = controller
        .delete_issue(IssueId(99))
        .await
        .expect_err("missing issue");
    assert_eq!(err.operation, Operation::DeleteIssue);
    assert_eq!(controller.api().list_calls().len(), 1);
    assert_eq!(controller.total(), 3);
}

#[tokio::test]
async fn saved_issue_triggers_refresh() {
    let mut controller = IssueListController::new(FakeApi::with_issues(1));
    controller.refresh().await.expect("refresh");
    controller.issue_saved().await.expect("refresh after save");
    assert_eq!(controller.api().list_calls().len(), 2);
}

#[test]
fn empty_view_has_a_single_page() {
    let view = ListView::default();
    assert_eq!(view.pages(), 1);
    assert!(!view.can_go_next());
    assert!(!view.can_go_previous());
}
