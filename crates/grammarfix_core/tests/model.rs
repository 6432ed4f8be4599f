use grammarfix_core::model::issue::{KNOWN_ISSUE_TYPES, KNOWN_SEVERITIES};
use grammarfix_core::{
    GrammarIssue, GrammarSession, IssueValidationError, SessionPatch, SessionValidationError,
};
use uuid::Uuid;

#[test]
fn new_session_is_valid_with_equal_timestamps() {
    let session = GrammarSession::new("user-a", "I has", "I have", 1_000);

    assert!(session.validate().is_ok());
    assert!(!session.id.is_nil());
    assert_eq!(session.created_at, session.updated_at);
    assert!(session.is_owned_by("user-a"));
    assert!(!session.is_owned_by("user-b"));
}

#[test]
fn session_validation_rejects_broken_invariants() {
    let base = GrammarSession::new("user-a", "I has", "I have", 1_000);

    let mut nil_id = base.clone();
    nil_id.id = Uuid::nil();
    assert_eq!(nil_id.validate(), Err(SessionValidationError::NilId));

    let mut blank_owner = base.clone();
    blank_owner.owner_id = "  ".to_string();
    assert_eq!(
        blank_owner.validate(),
        Err(SessionValidationError::BlankOwner)
    );

    let mut empty_corrected = base.clone();
    empty_corrected.corrected_text.clear();
    assert_eq!(
        empty_corrected.validate(),
        Err(SessionValidationError::EmptyCorrectedText)
    );

    let mut backwards = base;
    backwards.updated_at = 999;
    assert_eq!(
        backwards.validate(),
        Err(SessionValidationError::UpdatedBeforeCreated)
    );
}

#[test]
fn whitespace_only_text_is_not_empty() {
    let session = GrammarSession::new("user-a", " ", "\n", 1_000);
    assert!(session.validate().is_ok());
}

#[test]
fn patch_applies_only_supplied_fields() {
    let mut session = GrammarSession::new("user-a", "I has", "I have", 1_000);
    session.language = Some("en".to_string());

    let patch = SessionPatch {
        corrected_text: Some("I have got".to_string()),
        overall_comment: Some("Fine.".to_string()),
        ..SessionPatch::default()
    };
    assert!(!patch.is_empty());
    patch.apply_to(&mut session);

    assert_eq!(session.language.as_deref(), Some("en"));
    assert_eq!(session.original_text, "I has");
    assert_eq!(session.corrected_text, "I have got");
    assert_eq!(session.overall_comment.as_deref(), Some("Fine."));
    assert!(SessionPatch::default().is_empty());
}

#[test]
fn issue_requires_non_nil_ids_only() {
    let session_id = Uuid::new_v4();
    let issue = GrammarIssue::new(session_id, 1_000);
    assert!(issue.validate().is_ok());

    let orphan = GrammarIssue::new(Uuid::nil(), 1_000);
    assert_eq!(orphan.validate(), Err(IssueValidationError::NilSessionId));
}

#[test]
fn known_vocabularies_match_documented_tags() {
    assert_eq!(
        KNOWN_ISSUE_TYPES,
        &["spelling", "grammar", "style", "punctuation"]
    );
    assert_eq!(KNOWN_SEVERITIES, &["minor", "moderate", "major"]);
}

#[test]
fn records_serialize_with_camel_case_keys() {
    let mut session = GrammarSession::new("user-a", "I has", "I have", 1_000);
    session.overall_comment = Some("ok".to_string());
    let json = serde_json::to_value(&session).unwrap();
    assert_eq!(json["ownerId"], "user-a");
    assert_eq!(json["originalText"], "I has");
    assert_eq!(json["correctedText"], "I have");
    assert_eq!(json["overallComment"], "ok");
    assert_eq!(json["createdAt"], 1_000);
    assert!(json.get("original_text").is_none());

    let issue = GrammarIssue::new(session.id, 2_000);
    let json = serde_json::to_value(&issue).unwrap();
    assert_eq!(json["sessionId"], session.id.to_string());
    assert_eq!(json["issueType"], serde_json::Value::Null);

    let decoded: GrammarIssue = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, issue);
}
