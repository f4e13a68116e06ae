//! Query state behind the issue list: search texts, filters, sort and
//! pagination, and the rules for which changes require a refetch.

use shared::{
    domain::{IssuePriority, IssueStatus, SortDirection, SortField},
    protocol::{ListIssuesQuery, DEFAULT_PAGE_SIZE},
};

pub const PAGE_SIZE_OPTIONS: [u32; 3] = [5, 10, 20];

/// Number of pages needed to show `total` items, never less than one.
pub fn page_count(total: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 1;
    }
    let pages = total.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX).max(1)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryAction {
    SetStatus(Option<IssueStatus>),
    SetPriority(Option<IssuePriority>),
    /// Explicit submit of the free-text boxes (Search button or Enter).
    SubmitSearch { search: String, assignee: String },
    ToggleSort(SortField),
    NextPage,
    PreviousPage,
    SetPageSize(u32),
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    search: String,
    status: Option<IssueStatus>,
    priority: Option<IssuePriority>,
    assignee: String,
    sort_by: SortField,
    sort_dir: SortDirection,
    page: u32,
    page_size: u32,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: None,
            priority: None,
            assignee: String::new(),
            sort_by: SortField::UpdatedAt,
            sort_dir: SortDirection::Desc,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl QueryState {
    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn assignee(&self) -> &str {
        &self.assignee
    }

    pub fn status(&self) -> Option<IssueStatus> {
        self.status
    }

    pub fn priority(&self) -> Option<IssuePriority> {
        self.priority
    }

    pub fn sort_by(&self) -> SortField {
        self.sort_by
    }

    pub fn sort_dir(&self) -> SortDirection {
        self.sort_dir
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Applies `action` given the `total` reported by the last successful
    /// fetch. Returns `true` when the list must be fetched again.
    pub fn apply(&mut self, action: QueryAction, total: u64) -> bool {
        match action {
            QueryAction::SetStatus(status) => replace_if_changed(&mut self.status, status),
            QueryAction::SetPriority(priority) => {
                replace_if_changed(&mut self.priority, priority)
            }
            QueryAction::SubmitSearch { search, assignee } => {
                self.search = search;
                self.assignee = assignee;
                self.page = 1;
                true
            }
            QueryAction::ToggleSort(field) => {
                if self.sort_by == field {
                    self.sort_dir = self.sort_dir.flipped();
                } else {
                    self.sort_by = field;
                    self.sort_dir = SortDirection::Asc;
                }
                true
            }
            QueryAction::NextPage => {
                if self.page < page_count(total, self.page_size) {
                    self.page += 1;
                    true
                } else {
                    false
                }
            }
            QueryAction::PreviousPage => {
                if self.page > 1 {
                    self.page -= 1;
                    true
                } else {
                    false
                }
            }
            QueryAction::SetPageSize(page_size) => {
                if page_size == 0 || page_size == self.page_size {
                    return false;
                }
                self.page_size = page_size;
                self.page = 1;
                true
            }
            QueryAction::Reset => {
                let before = self.clone();
                self.search.clear();
                self.assignee.clear();
                self.status = None;
                self.priority = None;
                self.page = 1;
                *self != before
            }
        }
    }

    /// Request for the current state. Blank search texts are left out.
    pub fn to_list_query(&self) -> ListIssuesQuery {
        ListIssuesQuery {
            search: non_blank(&self.search),
            status: self.status,
            priority: self.priority,
            assignee: non_blank(&self.assignee),
            sort_by: self.sort_by,
            sort_dir: self.sort_dir,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

fn replace_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
#[path = "tests/query_tests.rs"]
mod tests;
