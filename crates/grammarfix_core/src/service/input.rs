//! Request shapes accepted by the access layer and their structural checks.
//!
//! Field names deserialize from camelCase. Unknown fields are ignored.

use crate::model::issue::GrammarIssue;
use crate::model::session::{GrammarSession, SessionId, SessionPatch, UserId};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Structural validation failure for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    /// A required field was supplied as an empty string.
    EmptyField(&'static str),
    /// An update request carried no field to change.
    NoUpdateFields,
}

impl Display for InputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "`{field}` must not be empty."),
            Self::NoUpdateFields => write!(f, "At least one field must be provided to update."),
        }
    }
}

impl Error for InputError {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionInput {
    #[serde(default)]
    pub language: Option<String>,
    pub original_text: String,
    pub corrected_text: String,
    #[serde(default)]
    pub overall_comment: Option<String>,
}

impl CreateSessionInput {
    pub fn new(original_text: impl Into<String>, corrected_text: impl Into<String>) -> Self {
        Self {
            original_text: original_text.into(),
            corrected_text: corrected_text.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), InputError> {
        require_non_empty("originalText", &self.original_text)?;
        require_non_empty("correctedText", &self.corrected_text)?;
        Ok(())
    }

    pub(crate) fn into_session(self, owner_id: UserId, now_ms: i64) -> GrammarSession {
        let mut session =
            GrammarSession::new(owner_id, self.original_text, self.corrected_text, now_ms);
        session.language = self.language;
        session.overall_comment = self.overall_comment;
        session
    }
}

/// Partial update. At least one of the optional fields must be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSessionInput {
    pub id: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub original_text: Option<String>,
    #[serde(default)]
    pub corrected_text: Option<String>,
    #[serde(default)]
    pub overall_comment: Option<String>,
}

impl UpdateSessionInput {
    pub fn for_session(id: SessionId) -> Self {
        Self {
            id: id.to_string(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), InputError> {
        require_non_empty("id", &self.id)?;
        if self.to_patch().is_empty() {
            return Err(InputError::NoUpdateFields);
        }
        if let Some(text) = &self.original_text {
            require_non_empty("originalText", text)?;
        }
        if let Some(text) = &self.corrected_text {
            require_non_empty("correctedText", text)?;
        }
        Ok(())
    }

    pub(crate) fn to_patch(&self) -> SessionPatch {
        SessionPatch {
            language: self.language.clone(),
            original_text: self.original_text.clone(),
            corrected_text: self.corrected_text.clone(),
            overall_comment: self.overall_comment.clone(),
        }
    }
}

/// New annotation. Every field but `session_id` is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIssueInput {
    pub session_id: String,
    #[serde(default)]
    pub issue_type: Option<String>,
    #[serde(default)]
    pub original_fragment: Option<String>,
    #[serde(default)]
    pub corrected_fragment: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
}

impl CreateIssueInput {
    pub fn for_session(session_id: SessionId) -> Self {
        Self {
            session_id: session_id.to_string(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), InputError> {
        require_non_empty("sessionId", &self.session_id)
    }

    pub(crate) fn into_issue(self, session_id: SessionId, now_ms: i64) -> GrammarIssue {
        let mut issue = GrammarIssue::new(session_id, now_ms);
        issue.issue_type = self.issue_type;
        issue.original_fragment = self.original_fragment;
        issue.corrected_fragment = self.corrected_fragment;
        issue.explanation = self.explanation;
        issue.severity = self.severity;
        issue
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListIssuesInput {
    pub session_id: String,
}

impl ListIssuesInput {
    pub fn for_session(session_id: SessionId) -> Self {
        Self {
            session_id: session_id.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), InputError> {
        require_non_empty("sessionId", &self.session_id)
    }
}

fn require_non_empty(field: &'static str, value: &str) -> Result<(), InputError> {
    if value.is_empty() {
        return Err(InputError::EmptyField(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{CreateSessionInput, InputError, UpdateSessionInput};

    #[test]
    fn create_rejects_empty_texts() {
        let missing_original = CreateSessionInput::new("", "fixed");
        assert_eq!(
            missing_original.validate(),
            Err(InputError::EmptyField("originalText"))
        );

        let missing_corrected = CreateSessionInput::new("draft", "");
        assert_eq!(
            missing_corrected.validate(),
            Err(InputError::EmptyField("correctedText"))
        );
    }

    #[test]
    fn update_requires_at_least_one_field() {
        let input = UpdateSessionInput {
            id: "some-id".to_string(),
            ..UpdateSessionInput::default()
        };
        assert_eq!(input.validate(), Err(InputError::NoUpdateFields));
        assert!(input.to_patch().is_empty());

        let language_only = UpdateSessionInput {
            language: Some("en".to_string()),
            ..input
        };
        assert_eq!(language_only.validate(), Ok(()));
        assert!(!language_only.to_patch().is_empty());
    }

    #[test]
    fn update_accepts_empty_optional_comment_but_not_empty_texts() {
        let comment_only = UpdateSessionInput {
            id: "some-id".to_string(),
            overall_comment: Some(String::new()),
            ..UpdateSessionInput::default()
        };
        assert_eq!(comment_only.validate(), Ok(()));

        let empty_text = UpdateSessionInput {
            id: "some-id".to_string(),
            corrected_text: Some(String::new()),
            ..UpdateSessionInput::default()
        };
        assert_eq!(
            empty_text.validate(),
            Err(InputError::EmptyField("correctedText"))
        );
    }

    #[test]
    fn create_input_deserializes_camel_case_and_ignores_unknown_fields() {
        let input: CreateSessionInput = serde_json::from_str(
            r#"{"originalText":"I has","correctedText":"I have","language":"en","extra":1}"#,
        )
        .unwrap();
        assert_eq!(input.original_text, "I has");
        assert_eq!(input.corrected_text, "I have");
        assert_eq!(input.language.as_deref(), Some("en"));
        assert_eq!(input.overall_comment, None);
    }
}
