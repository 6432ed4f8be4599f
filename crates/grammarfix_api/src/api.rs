//! Named remote actions over the grammar-fix access layer.
//!
//! # Responsibility
//! - Route `createSession|updateSession|listSessions|createIssue|listIssues`
//!   to the access layer.
//! - Translate JSON input and access errors into the wire envelope.
//!
//! # Invariants
//! - Exported functions never panic.
//! - Responses are `{"success":true,"data":...}` or
//!   `{"success":false,"error":{"code":...,"message":...}}`.
//! - The caller identity is checked before the input is parsed.
//! - Internal failures never echo storage details to the caller.

use grammarfix_core::db::open_db;
use grammarfix_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    require_user, sqlite_service, AccessError, CallerContext, CoreConfig, CreateIssueInput,
    CreateSessionInput, ListIssuesInput, SqliteGrammarFixService, UpdateSessionInput,
};
use log::{info, warn};
use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::OnceLock;

const BAD_REQUEST: &str = "BAD_REQUEST";
const NOT_FOUND: &str = "NOT_FOUND";
const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";
const INTERNAL_MESSAGE: &str = "Internal server error.";

static CONFIG: OnceLock<Result<CoreConfig, String>> = OnceLock::new();
static LOGGING_SETUP: OnceLock<Option<String>> = OnceLock::new();

/// Health check.
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Core crate version.
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// Returns an empty string on success and the error message on failure.
/// Safe to call repeatedly with the same `level + log_dir`.
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Remote operations exposed by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateSession,
    UpdateSession,
    ListSessions,
    CreateIssue,
    ListIssues,
}

impl Action {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "createSession" => Some(Self::CreateSession),
            "updateSession" => Some(Self::UpdateSession),
            "listSessions" => Some(Self::ListSessions),
            "createIssue" => Some(Self::CreateIssue),
            "listIssues" => Some(Self::ListIssues),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::CreateSession => "createSession",
            Self::UpdateSession => "updateSession",
            Self::ListSessions => "listSessions",
            Self::CreateIssue => "createIssue",
            Self::ListIssues => "listIssues",
        }
    }
}

/// Failure payload inside a `success: false` envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionErrorBody {
    pub code: &'static str,
    pub message: String,
}

/// Wire envelope for one action call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ActionErrorBody>,
}

impl ActionResponse {
    fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn failure(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ActionErrorBody {
                code,
                message: message.into(),
            }),
        }
    }

    fn internal() -> Self {
        Self::failure(INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
    }

    /// Error code for failures, `None` on success.
    pub fn error_code(&self) -> Option<&'static str> {
        self.error.as_ref().map(|error| error.code)
    }

    /// Serializes the envelope; falls back to a fixed internal error body.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                r#"{{"success":false,"error":{{"code":"{INTERNAL_SERVER_ERROR}","message":"{INTERNAL_MESSAGE}"}}}}"#
            )
        })
    }
}

impl From<AccessError> for ActionResponse {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::Repo(_) | AccessError::InconsistentState(_) => Self::internal(),
            other => Self::failure(other.code(), other.to_string()),
        }
    }
}

/// Runs one named action for `caller` on an open, migrated connection.
///
/// Check order: action name, caller identity, JSON shape, then the access
/// layer's own validation and ownership checks.
pub fn dispatch(
    conn: &Connection,
    caller: &CallerContext,
    action: &str,
    input_json: &str,
) -> ActionResponse {
    let Some(action) = Action::from_name(action) else {
        warn!("event=action_dispatch module=api status=denied reason=unknown_action");
        return ActionResponse::failure(NOT_FOUND, format!("Unknown action `{action}`."));
    };

    if let Err(err) = require_user(caller) {
        return ActionResponse::from(err);
    }

    let service = match sqlite_service(conn) {
        Ok(service) => service,
        Err(err) => {
            warn!(
                "event=action_dispatch module=api status=error action={} error={}",
                action.name(),
                err
            );
            return ActionResponse::internal();
        }
    };

    let response = match run_action(&service, caller, action, input_json) {
        Ok(data) => ActionResponse::ok(data),
        Err(response) => response,
    };
    match response.error_code() {
        None => info!(
            "event=action_dispatch module=api status=ok action={}",
            action.name()
        ),
        Some(code) => info!(
            "event=action_dispatch module=api status=error action={} code={}",
            action.name(),
            code
        ),
    }
    response
}

/// Opens the configured database and dispatches one action.
///
/// `user_id` is the identity the hosting environment authenticated; `None`
/// or blank means anonymous. Always returns a JSON envelope string.
pub fn handle_action(user_id: Option<String>, action: String, input_json: String) -> String {
    let caller = CallerContext::from_identity(user_id);
    let config = match configured() {
        Ok(config) => config,
        Err(err) => {
            warn!("event=action_config module=api status=error error={err}");
            return ActionResponse::internal().to_json();
        }
    };

    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            warn!("event=action_db_open module=api status=error error={err}");
            return ActionResponse::internal().to_json();
        }
    };

    dispatch(&conn, &caller, &action, &input_json).to_json()
}

fn configured() -> Result<&'static CoreConfig, &'static str> {
    let config = CONFIG
        .get_or_init(CoreConfig::from_env)
        .as_ref()
        .map_err(String::as_str)?;
    LOGGING_SETUP.get_or_init(|| start_logging(config));
    Ok(config)
}

/// Logging is best effort: a failure is recorded once and actions still run.
fn start_logging(config: &CoreConfig) -> Option<String> {
    let log_dir = config.log_dir.as_ref()?;
    init_logging_inner(config.log_level, &log_dir.to_string_lossy()).err()
}

/// Error from the one-time logging setup done by [`handle_action`], if any.
pub fn logging_setup_error() -> Option<&'static str> {
    LOGGING_SETUP.get()?.as_deref()
}

fn run_action(
    service: &SqliteGrammarFixService<'_>,
    caller: &CallerContext,
    action: Action,
    input_json: &str,
) -> Result<Value, ActionResponse> {
    match action {
        Action::CreateSession => {
            let input: CreateSessionInput = parse_input(input_json)?;
            to_data(service.create_session(caller, input))
        }
        Action::UpdateSession => {
            let input: UpdateSessionInput = parse_input(input_json)?;
            to_data(service.update_session(caller, input))
        }
        Action::ListSessions => {
            parse_optional_object(input_json)?;
            to_data(service.list_sessions(caller))
        }
        Action::CreateIssue => {
            let input: CreateIssueInput = parse_input(input_json)?;
            to_data(service.create_issue(caller, input))
        }
        Action::ListIssues => {
            let input: ListIssuesInput = parse_input(input_json)?;
            to_data(service.list_issues(caller, input))
        }
    }
}

fn parse_input<T: DeserializeOwned>(input_json: &str) -> Result<T, ActionResponse> {
    serde_json::from_str(input_json)
        .map_err(|err| ActionResponse::failure(BAD_REQUEST, format!("Invalid input: {err}")))
}

/// Accepts an absent body or any JSON object; rejects everything else.
fn parse_optional_object(input_json: &str) -> Result<(), ActionResponse> {
    if input_json.trim().is_empty() {
        return Ok(());
    }
    parse_input::<Map<String, Value>>(input_json).map(|_| ())
}

fn to_data<T: Serialize>(
    result: Result<grammarfix_core::Success<T>, AccessError>,
) -> Result<Value, ActionResponse> {
    let data = result.map_err(ActionResponse::from)?.into_data();
    serde_json::to_value(data).map_err(|err| {
        warn!("event=action_encode module=api status=error error={err}");
        ActionResponse::internal()
    })
}

#[cfg(test)]
mod tests {
    use super::{core_version, dispatch, init_logging, ping, Action, ActionResponse};
    use grammarfix_core::db::open_db_in_memory;
    use grammarfix_core::CallerContext;
    use rusqlite::Connection;
    use serde_json::{json, Value};
    use uuid::Uuid;

    fn call(conn: &Connection, user: &str, action: &str, input: Value) -> ActionResponse {
        dispatch(
            conn,
            &CallerContext::authenticated(user),
            action,
            &input.to_string(),
        )
    }

    fn create_session(conn: &Connection, user: &str) -> String {
        let response = call(
            conn,
            user,
            "createSession",
            json!({"originalText": "I has a dog", "correctedText": "I have a dog"}),
        );
        assert!(response.success, "{response:?}");
        response.data.unwrap()["session"]["id"]
            .as_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_invalid_arguments() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "/tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn action_names_round_trip() {
        for action in [
            Action::CreateSession,
            Action::UpdateSession,
            Action::ListSessions,
            Action::CreateIssue,
            Action::ListIssues,
        ] {
            assert_eq!(Action::from_name(action.name()), Some(action));
        }
        assert_eq!(Action::from_name("deleteSession"), None);
    }

    #[test]
    fn end_to_end_session_and_issue_flow() {
        let conn = open_db_in_memory().unwrap();
        let session_id = create_session(&conn, "user-a");

        let issue = call(
            &conn,
            "user-a",
            "createIssue",
            json!({
                "sessionId": session_id,
                "issueType": "grammar",
                "originalFragment": "I has",
                "correctedFragment": "I have",
                "severity": "minor"
            }),
        );
        assert!(issue.success, "{issue:?}");

        let denied = call(
            &conn,
            "user-b",
            "listIssues",
            json!({"sessionId": session_id}),
        );
        assert_eq!(denied.error_code(), Some("NOT_FOUND"));
        assert_eq!(
            denied.error.unwrap().message,
            "Grammar fix session not found."
        );

        let listed = call(
            &conn,
            "user-a",
            "listIssues",
            json!({"sessionId": session_id}),
        );
        let data = listed.data.unwrap();
        assert_eq!(data["total"], 1);
        assert_eq!(data["items"][0]["originalFragment"], "I has");
        assert_eq!(data["items"][0]["sessionId"], session_id.as_str());
    }

    #[test]
    fn update_and_list_sessions_use_camel_case_wire_fields() {
        let conn = open_db_in_memory().unwrap();
        let session_id = create_session(&conn, "user-a");

        let updated = call(
            &conn,
            "user-a",
            "updateSession",
            json!({"id": session_id, "overallComment": "Check verb agreement."}),
        );
        let data = updated.data.unwrap();
        let session = &data["session"];
        assert_eq!(session["overallComment"], "Check verb agreement.");
        assert_eq!(session["originalText"], "I has a dog");
        assert!(session["updatedAt"].as_i64().unwrap() >= session["createdAt"].as_i64().unwrap());

        let listed = dispatch(
            &conn,
            &CallerContext::authenticated("user-a"),
            "listSessions",
            "",
        );
        let json: Value = serde_json::from_str(&listed.to_json()).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["total"], 1);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn anonymous_caller_is_unauthorized_even_with_malformed_input() {
        let conn = open_db_in_memory().unwrap();

        let response = dispatch(
            &conn,
            &CallerContext::anonymous(),
            "createSession",
            "{not json",
        );
        let json: Value = serde_json::from_str(&response.to_json()).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "UNAUTHORIZED");
        assert_eq!(
            json["error"]["message"],
            "You must be signed in to perform this action."
        );
        assert!(json.get("data").is_none());
    }

    #[test]
    fn malformed_or_incomplete_input_is_bad_request() {
        let conn = open_db_in_memory().unwrap();

        let malformed = dispatch(
            &conn,
            &CallerContext::authenticated("user-a"),
            "createSession",
            "{not json",
        );
        assert_eq!(malformed.error_code(), Some("BAD_REQUEST"));

        let missing_field = call(
            &conn,
            "user-a",
            "createSession",
            json!({"originalText": "I has a dog"}),
        );
        assert_eq!(missing_field.error_code(), Some("BAD_REQUEST"));

        let wrong_type = call(
            &conn,
            "user-a",
            "createSession",
            json!({"originalText": 1, "correctedText": "x"}),
        );
        assert_eq!(wrong_type.error_code(), Some("BAD_REQUEST"));

        let empty_text = call(
            &conn,
            "user-a",
            "createSession",
            json!({"originalText": "", "correctedText": "x"}),
        );
        assert_eq!(empty_text.error_code(), Some("BAD_REQUEST"));

        let empty_id = call(&conn, "user-a", "listIssues", json!({"sessionId": ""}));
        assert_eq!(empty_id.error_code(), Some("BAD_REQUEST"));
    }

    #[test]
    fn list_sessions_accepts_absent_or_object_body_only() {
        let conn = open_db_in_memory().unwrap();
        let caller = CallerContext::authenticated("user-a");

        for accepted in ["", "  ", "{}", r#"{"page":1}"#] {
            let response = dispatch(&conn, &caller, "listSessions", accepted);
            assert!(response.success, "{accepted:?}: {response:?}");
        }
        for rejected in ["{not json", "[1]", "null", "\"x\""] {
            let response = dispatch(&conn, &caller, "listSessions", rejected);
            assert_eq!(response.error_code(), Some("BAD_REQUEST"), "{rejected:?}");
        }
    }

    #[test]
    fn update_without_fields_is_bad_request() {
        let conn = open_db_in_memory().unwrap();
        let session_id = create_session(&conn, "user-a");

        let response = call(&conn, "user-a", "updateSession", json!({"id": session_id}));
        assert_eq!(response.error_code(), Some("BAD_REQUEST"));
        assert_eq!(
            response.error.unwrap().message,
            "At least one field must be provided to update."
        );
    }

    #[test]
    fn unknown_or_foreign_ids_are_not_found() {
        let conn = open_db_in_memory().unwrap();
        let session_id = create_session(&conn, "user-a");

        let foreign = call(
            &conn,
            "user-b",
            "updateSession",
            json!({"id": session_id, "language": "en"}),
        );
        let missing = call(
            &conn,
            "user-a",
            "updateSession",
            json!({"id": Uuid::new_v4().to_string(), "language": "en"}),
        );
        let malformed = call(
            &conn,
            "user-a",
            "createIssue",
            json!({"sessionId": "S1"}),
        );

        assert_eq!(foreign, missing);
        assert_eq!(foreign.error_code(), Some("NOT_FOUND"));
        assert_eq!(malformed.error_code(), Some("NOT_FOUND"));
    }

    #[test]
    fn unknown_action_is_not_found_and_named() {
        let conn = open_db_in_memory().unwrap();

        let response = call(&conn, "user-a", "deleteSession", json!({}));
        assert_eq!(response.error_code(), Some("NOT_FOUND"));
        assert!(response.error.unwrap().message.contains("deleteSession"));
    }

    #[test]
    fn uninitialized_connection_reports_internal_error_without_details() {
        let conn = Connection::open_in_memory().unwrap();

        let response = call(&conn, "user-a", "listSessions", json!({}));
        assert_eq!(response.error_code(), Some("INTERNAL_SERVER_ERROR"));
        assert_eq!(response.error.unwrap().message, "Internal server error.");
    }
}
