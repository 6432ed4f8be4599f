//! Success envelope returned by every access-layer operation.

use crate::model::issue::GrammarIssue;
use crate::model::session::GrammarSession;
use serde::Serialize;

/// `{"success": true, "data": ...}`. Failures travel as `AccessError`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Success<T> {
    success: bool,
    pub data: T,
}

impl<T> Success<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }

    pub fn into_data(self) -> T {
        self.data
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionData {
    pub session: GrammarSession,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueData {
    pub issue: GrammarIssue,
}

/// List payload. `total` always equals `items.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListData<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> From<Vec<T>> for ListData<T> {
    fn from(items: Vec<T>) -> Self {
        let total = items.len();
        Self { items, total }
    }
}
