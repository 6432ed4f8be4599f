//! Grammar issue record: one localized annotation under a session.
//!
//! Issues are created and listed, never updated. They carry no owner of
//! their own; visibility always goes through the parent session.

use crate::model::session::SessionId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a grammar issue.
pub type IssueId = Uuid;

/// Informal issue categories. Stored as free text and not enforced.
pub const KNOWN_ISSUE_TYPES: &[&str] = &["spelling", "grammar", "style", "punctuation"];

/// Informal severity tags. Stored as free text and not enforced.
pub const KNOWN_SEVERITIES: &[&str] = &["minor", "moderate", "major"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueValidationError {
    NilId,
    NilSessionId,
}

impl Display for IssueValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "issue id must not be nil"),
            Self::NilSessionId => write!(f, "issue session_id must not be nil"),
        }
    }
}

impl Error for IssueValidationError {}

/// One fragment-level correction attached to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarIssue {
    pub id: IssueId,
    pub session_id: SessionId,
    /// e.g. `grammar`; see [`KNOWN_ISSUE_TYPES`].
    pub issue_type: Option<String>,
    pub original_fragment: Option<String>,
    pub corrected_fragment: Option<String>,
    /// Human-friendly rationale shown to the learner.
    pub explanation: Option<String>,
    /// e.g. `minor`; see [`KNOWN_SEVERITIES`].
    pub severity: Option<String>,
    /// Epoch milliseconds.
    pub created_at: i64,
}

impl GrammarIssue {
    /// Creates an issue with a fresh id and every annotation field empty.
    pub fn new(session_id: SessionId, now_ms: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            issue_type: None,
            original_fragment: None,
            corrected_fragment: None,
            explanation: None,
            severity: None,
            created_at: now_ms,
        }
    }

    pub fn validate(&self) -> Result<(), IssueValidationError> {
        if self.id.is_nil() {
            return Err(IssueValidationError::NilId);
        }
        if self.session_id.is_nil() {
            return Err(IssueValidationError::NilSessionId);
        }
        Ok(())
    }
}
