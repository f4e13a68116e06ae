use super::*;
use crate::fake_api::{issue, Call, FakeApi};

#[test]
fn new_draft_uses_create_defaults() {
    let draft = IssueDraft::new();
    assert!(!draft.is_edit());
    assert_eq!(draft.heading(), "Create Issue");
    assert_eq!(draft.status, IssueStatus::Open);
    assert_eq!(draft.priority, IssuePriority::Medium);
}

#[test]
fn create_payload_leaves_out_blank_texts() {
    let draft = IssueDraft {
        title: "Bug A".to_string(),
        description: "  ".to_string(),
        assignee: " sam ".to_string(),
        priority: IssuePriority::High,
        ..IssueDraft::new()
    };
    let fields = draft.to_fields();
    assert_eq!(fields.title, "Bug A");
    assert_eq!(fields.description, None);
    assert_eq!(fields.assignee.as_deref(), Some("sam"));
    assert_eq!(fields.priority, IssuePriority::High);
}

#[test]
fn edit_payload_sends_cleared_texts() {
    let mut stored = issue(4, "Crash on save");
    stored.assignee = Some("kim".to_string());
    stored.description = Some("steps".to_string());

    let mut draft = IssueDraft::from_issue(&stored);
    assert!(draft.is_edit());
    assert_eq!(draft.heading(), "Edit Issue");
    assert_eq!(draft.assignee, "kim");

    draft.assignee.clear();
    draft.description.clear();
    let fields = draft.to_fields();
    assert_eq!(fields.assignee.as_deref(), Some(""));
    assert_eq!(fields.description.as_deref(), Some(""));
}

#[test]
fn form_hands_out_one_save_at_a_time() {
    let mut form = IssueForm::create();
    form.draft.title = "Bug A".to_string();

    let draft = form.begin_save().expect("first save");
    assert_eq!(draft.title, "Bug A");
    assert!(form.is_saving());
    assert!(form.begin_save().is_none());

    form.save_failed();
    assert!(!form.is_saving());
    assert!(form.begin_save().is_some());
}

#[tokio::test]
async fn save_without_id_creates() {
    let api = FakeApi::with_issues(2);
    let draft = IssueDraft {
        title: "Bug A".to_string(),
        ..IssueDraft::new()
    };
    let created = save_draft(&api, &draft).await.expect("create");
    assert_eq!(created.id, IssueId(3));
    assert!(matches!(api.calls().as_slice(), [Call::Create(_)]));
}

#[tokio::test]
async fn save_with_id_updates_same_issue() {
    let api = FakeApi::with_issues(2);
    let mut draft = IssueDraft::from_issue(&issue(2, "Issue 2"));
    draft.status = IssueStatus::Closed;

    let updated = save_draft(&api, &draft).await.expect("update");
    assert_eq!(updated.id, IssueId(2));
    assert_eq!(updated.status, IssueStatus::Closed);
    assert!(matches!(
        api.calls().as_slice(),
        [Call::Update(IssueId(2), _)]
    ));
}

#[tokio::test]
async fn failed_save_is_labelled() {
    let api = FakeApi::default();
    api.set_failing(true);
    let err = save_draft(&api, &IssueDraft::new())
        .await
        .expect_err("save fails");
    assert_eq!(err.operation, Operation::SaveIssue);
    assert_eq!(err.operation.failure_message(), "Failed to save issue");
}
