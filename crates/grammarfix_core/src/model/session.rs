//! Grammar-fix session record.
//!
//! # Invariants
//! - `id` and `owner_id` never change after creation.
//! - `original_text` and `corrected_text` are never empty.
//! - `updated_at` is never earlier than `created_at`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a grammar-fix session.
pub type SessionId = Uuid;

/// Opaque identity of an authenticated user, as resolved upstream.
pub type UserId = String;

/// Structural validation failure for [`GrammarSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionValidationError {
    NilId,
    BlankOwner,
    EmptyOriginalText,
    EmptyCorrectedText,
    UpdatedBeforeCreated,
}

impl Display for SessionValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "session id must not be nil"),
            Self::BlankOwner => write!(f, "session owner must not be blank"),
            Self::EmptyOriginalText => write!(f, "session original_text must not be empty"),
            Self::EmptyCorrectedText => write!(f, "session corrected_text must not be empty"),
            Self::UpdatedBeforeCreated => {
                write!(f, "session updated_at must not be earlier than created_at")
            }
        }
    }
}

impl Error for SessionValidationError {}

/// One stored text-correction exchange.
///
/// `corrected_text` is the only representation of the correction; there is
/// no history of earlier versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrammarSession {
    pub id: SessionId,
    /// Creator identity. Only this user may see or change the session.
    pub owner_id: UserId,
    /// Free-text language tag such as `en`.
    pub language: Option<String>,
    pub original_text: String,
    pub corrected_text: String,
    /// Summary feedback for the whole text.
    pub overall_comment: Option<String>,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds, refreshed on every successful update.
    pub updated_at: i64,
}

impl GrammarSession {
    /// Creates a session with a fresh id and `created_at == updated_at == now_ms`.
    pub fn new(
        owner_id: impl Into<UserId>,
        original_text: impl Into<String>,
        corrected_text: impl Into<String>,
        now_ms: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            language: None,
            original_text: original_text.into(),
            corrected_text: corrected_text.into(),
            overall_comment: None,
            created_at: now_ms,
            updated_at: now_ms,
        }
    }

    /// Checks structural invariants before persistence or after read-back.
    pub fn validate(&self) -> Result<(), SessionValidationError> {
        if self.id.is_nil() {
            return Err(SessionValidationError::NilId);
        }
        if self.owner_id.trim().is_empty() {
            return Err(SessionValidationError::BlankOwner);
        }
        if self.original_text.is_empty() {
            return Err(SessionValidationError::EmptyOriginalText);
        }
        if self.corrected_text.is_empty() {
            return Err(SessionValidationError::EmptyCorrectedText);
        }
        if self.updated_at < self.created_at {
            return Err(SessionValidationError::UpdatedBeforeCreated);
        }
        Ok(())
    }

    /// Returns whether `user_id` owns this session.
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }
}

/// Partial update for a session. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionPatch {
    pub language: Option<String>,
    pub original_text: Option<String>,
    pub corrected_text: Option<String>,
    pub overall_comment: Option<String>,
}

impl SessionPatch {
    /// Returns `true` when no field would be written.
    pub fn is_empty(&self) -> bool {
        self.language.is_none()
            && self.original_text.is_none()
            && self.corrected_text.is_none()
            && self.overall_comment.is_none()
    }

    /// Applies supplied fields onto `session` in place.
    pub fn apply_to(&self, session: &mut GrammarSession) {
        if let Some(language) = &self.language {
            session.language = Some(language.clone());
        }
        if let Some(original_text) = &self.original_text {
            session.original_text = original_text.clone();
        }
        if let Some(corrected_text) = &self.corrected_text {
            session.corrected_text = corrected_text.clone();
        }
        if let Some(overall_comment) = &self.overall_comment {
            session.overall_comment = Some(overall_comment.clone());
        }
    }
}
