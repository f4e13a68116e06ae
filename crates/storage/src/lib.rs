use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use shared::{
    domain::IssueId,
    protocol::{Issue, IssueFields, IssuePatch},
};
use tokio::sync::RwLock;
use tracing::debug;

/// Issue store backing the reference API. Everything lives in memory; when a
/// data file is configured the whole store is rewritten to it after each
/// mutation and reloaded on open.
#[derive(Clone)]
pub struct Storage {
    inner: Arc<RwLock<StoreData>>,
    data_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreData {
    #[serde(default)]
    issues: Vec<Issue>,
    #[serde(default = "first_id")]
    next_id: i64,
}

impl Default for StoreData {
    fn default() -> Self {
        Self {
            issues: Vec::new(),
            next_id: first_id(),
        }
    }
}

fn first_id() -> i64 {
    1
}

impl Storage {
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreData::default())),
            data_file: None,
        }
    }

    pub async fn open(data_file: impl AsRef<Path>) -> Result<Self> {
        let data_file = data_file.as_ref().to_path_buf();
        let data = match tokio::fs::read_to_string(&data_file).await {
            Ok(raw) => serde_json::from_str::<StoreData>(&raw).with_context(|| {
                format!("failed to parse issue data file '{}'", data_file.display())
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => StoreData::default(),
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("failed to read issue data file '{}'", data_file.display())
                })
            }
        };
        ensure_parent_dir_exists(&data_file).await?;
        debug!(
            path = %data_file.display(),
            issues = data.issues.len(),
            "opened issue data file"
        );

        Ok(Self {
            inner: Arc::new(RwLock::new(data)),
            data_file: Some(data_file),
        })
    }

    /// All issues in insertion order.
    pub async fn list_issues(&self) -> Vec<Issue> {
        self.inner.read().await.issues.clone()
    }

    pub async fn get_issue(&self, issue_id: IssueId) -> Option<Issue> {
        self.inner
            .read()
            .await
            .issues
            .iter()
            .find(|issue| issue.id == issue_id)
            .cloned()
    }

    pub async fn insert_issue(&self, fields: IssueFields) -> Result<Issue> {
        let mut guard = self.inner.write().await;
        let mut next = guard.clone();
        let now = Utc::now();
        let issue = Issue {
            id: IssueId(next.next_id),
            title: fields.title,
            description: fields.description,
            status: fields.status,
            priority: fields.priority,
            assignee: fields.assignee,
            created_at: now,
            updated_at: now,
        };
        next.next_id += 1;
        next.issues.push(issue.clone());

        self.persist(&next).await?;
        *guard = next;
        Ok(issue)
    }

    /// Applies the present fields of `patch`. Returns `None` when no issue
    /// has that id.
    pub async fn update_issue(&self, issue_id: IssueId, patch: IssuePatch) -> Result<Option<Issue>> {
        let mut guard = self.inner.write().await;
        let mut next = guard.clone();
        let Some(issue) = next.issues.iter_mut().find(|issue| issue.id == issue_id) else {
            return Ok(None);
        };

        if let Some(title) = patch.title {
            issue.title = title;
        }
        if let Some(description) = patch.description {
            issue.description = Some(description);
        }
        if let Some(status) = patch.status {
            issue.status = status;
        }
        if let Some(priority) = patch.priority {
            issue.priority = priority;
        }
        if let Some(assignee) = patch.assignee {
            issue.assignee = Some(assignee);
        }
        issue.updated_at = Utc::now();
        let updated = issue.clone();

        self.persist(&next).await?;
        *guard = next;
        Ok(Some(updated))
    }

    pub async fn delete_issue(&self, issue_id: IssueId) -> Result<bool> {
        let mut guard = self.inner.write().await;
        let Some(index) = guard.issues.iter().position(|issue| issue.id == issue_id) else {
            return Ok(false);
        };
        let mut next = guard.clone();
        next.issues.remove(index);

        self.persist(&next).await?;
        *guard = next;
        Ok(true)
    }

    /// Writes `data` to the data file, if any. The in-memory store is only
    /// replaced once this succeeds.
    async fn persist(&self, data: &StoreData) -> Result<()> {
        let Some(path) = &self.data_file else {
            return Ok(());
        };
        let raw = serde_json::to_string_pretty(data).context("failed to encode issue data")?;
        tokio::fs::write(path, raw)
            .await
            .with_context(|| format!("failed to write issue data file '{}'", path.display()))
    }
}

async fn ensure_parent_dir_exists(path: &Path) -> Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }

    tokio::fs::create_dir_all(parent).await.with_context(|| {
        format!(
            "failed to create parent directory '{}' for issue data file '{}'",
            parent.display(),
            path.display()
        )
    })
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
