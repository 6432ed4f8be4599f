//! Grammar-fix access layer.
//!
//! # Responsibility
//! - Provide the five remote operations over sessions and issues.
//! - Gate every call on an authenticated caller and on session ownership.
//!
//! # Invariants
//! - Check order: authentication gate, input validation, ownership resolver,
//!   then one store write or select. Rejected requests never write.
//! - A session owned by someone else is reported exactly like a missing one.
//! - Issues are reachable only through a session the caller owns.
//! - `updated_at` never moves backwards on update.
//! - Log lines carry ids and counts only, never user text.

use crate::auth::{require_user, AuthenticatedUser, CallerContext};
use crate::db::now_epoch_ms;
use crate::model::issue::GrammarIssue;
use crate::model::session::GrammarSession;
use crate::repo::issue_repo::IssueRepository;
use crate::repo::session_repo::SessionRepository;
use crate::service::envelope::{IssueData, ListData, SessionData, Success};
use crate::service::error::{AccessError, AccessResult};
use crate::service::input::{
    CreateIssueInput, CreateSessionInput, ListIssuesInput, UpdateSessionInput,
};
use log::{debug, error, warn};
use uuid::Uuid;

/// Access-layer facade over injected session and issue repositories.
pub struct GrammarFixService<S: SessionRepository, I: IssueRepository> {
    sessions: S,
    issues: I,
    clock: fn() -> i64,
}

impl<S: SessionRepository, I: IssueRepository> GrammarFixService<S, I> {
    /// Creates a service using the wall clock for timestamps.
    pub fn new(sessions: S, issues: I) -> Self {
        Self {
            sessions,
            issues,
            clock: now_epoch_ms,
        }
    }

    /// Replaces the epoch-milliseconds clock used for `created_at`/`updated_at`.
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    /// Creates a session owned by the caller.
    ///
    /// # Contract
    /// - `originalText` and `correctedText` must be non-empty.
    /// - Fresh id, `created_at == updated_at`.
    /// - Identical repeated calls create distinct rows.
    pub fn create_session(
        &self,
        context: &CallerContext,
        input: CreateSessionInput,
    ) -> AccessResult<Success<SessionData>> {
        traced("session_create", self.try_create_session(context, input))
    }

    /// Overwrites only the supplied fields of an owned session.
    ///
    /// # Contract
    /// - At least one optional field must be present.
    /// - `updated_at` is refreshed even when values are unchanged.
    /// - Concurrent updates are last-write-wins per field.
    pub fn update_session(
        &self,
        context: &CallerContext,
        input: UpdateSessionInput,
    ) -> AccessResult<Success<SessionData>> {
        traced("session_update", self.try_update_session(context, input))
    }

    /// Lists every session owned by the caller, oldest first.
    pub fn list_sessions(
        &self,
        context: &CallerContext,
    ) -> AccessResult<Success<ListData<GrammarSession>>> {
        traced("session_list", self.try_list_sessions(context))
    }

    /// Attaches a new issue to an owned session.
    ///
    /// # Contract
    /// - Every annotation field is optional.
    /// - Missing or foreign session fails with `NotFound` and writes nothing.
    pub fn create_issue(
        &self,
        context: &CallerContext,
        input: CreateIssueInput,
    ) -> AccessResult<Success<IssueData>> {
        traced("issue_create", self.try_create_issue(context, input))
    }

    /// Lists issues of an owned session, oldest first.
    pub fn list_issues(
        &self,
        context: &CallerContext,
        input: ListIssuesInput,
    ) -> AccessResult<Success<ListData<GrammarIssue>>> {
        traced("issue_list", self.try_list_issues(context, input))
    }

    fn try_create_session(
        &self,
        context: &CallerContext,
        input: CreateSessionInput,
    ) -> AccessResult<Success<SessionData>> {
        let user = require_user(context)?;
        input.validate()?;

        let session = input.into_session(user.id.clone(), (self.clock)());
        self.sessions.insert_session(&session)?;
        debug!(
            "event=session_create module=service status=ok session_id={}",
            session.id
        );
        Ok(Success::new(SessionData { session }))
    }

    fn try_update_session(
        &self,
        context: &CallerContext,
        input: UpdateSessionInput,
    ) -> AccessResult<Success<SessionData>> {
        let user = require_user(context)?;
        input.validate()?;

        let existing = self.owned_session(&input.id, user)?;
        let updated_at = (self.clock)().max(existing.updated_at);
        self.sessions.update_owned_session(
            existing.id,
            &user.id,
            &input.to_patch(),
            updated_at,
        )?;

        let session = self
            .sessions
            .find_owned_session(existing.id, &user.id)?
            .ok_or(AccessError::InconsistentState(
                "updated session not found in read-back",
            ))?;
        debug!(
            "event=session_update module=service status=ok session_id={}",
            session.id
        );
        Ok(Success::new(SessionData { session }))
    }

    fn try_list_sessions(
        &self,
        context: &CallerContext,
    ) -> AccessResult<Success<ListData<GrammarSession>>> {
        let user = require_user(context)?;
        let items = self.sessions.list_sessions_by_owner(&user.id)?;
        debug!(
            "event=session_list module=service status=ok total={}",
            items.len()
        );
        Ok(Success::new(ListData::from(items)))
    }

    fn try_create_issue(
        &self,
        context: &CallerContext,
        input: CreateIssueInput,
    ) -> AccessResult<Success<IssueData>> {
        let user = require_user(context)?;
        input.validate()?;

        let session = self.owned_session(&input.session_id, user)?;
        let issue = input.into_issue(session.id, (self.clock)());
        self.issues.insert_issue(&issue)?;
        debug!(
            "event=issue_create module=service status=ok session_id={} issue_id={}",
            session.id, issue.id
        );
        Ok(Success::new(IssueData { issue }))
    }

    fn try_list_issues(
        &self,
        context: &CallerContext,
        input: ListIssuesInput,
    ) -> AccessResult<Success<ListData<GrammarIssue>>> {
        let user = require_user(context)?;
        input.validate()?;

        let session = self.owned_session(&input.session_id, user)?;
        let items = self.issues.list_issues_for_session(session.id)?;
        debug!(
            "event=issue_list module=service status=ok session_id={} total={}",
            session.id,
            items.len()
        );
        Ok(Success::new(ListData::from(items)))
    }

    /// Ownership resolver: loads `session_id` only if `user` owns it.
    ///
    /// Ids are matched as stored: only the lowercase hyphenated form can
    /// match. Any other spelling, malformed or not, resolves to `NotFound`.
    pub fn owned_session(
        &self,
        session_id: &str,
        user: &AuthenticatedUser,
    ) -> AccessResult<GrammarSession> {
        let id = match Uuid::parse_str(session_id) {
            Ok(id) if id.to_string() == session_id => id,
            _ => return Err(AccessError::NotFound),
        };

        self.sessions
            .find_owned_session(id, &user.id)?
            .ok_or(AccessError::NotFound)
    }
}

fn traced<T>(event: &str, result: AccessResult<T>) -> AccessResult<T> {
    match &result {
        Ok(_) => {}
        Err(
            err @ (AccessError::Unauthorized
            | AccessError::NotFound
            | AccessError::InvalidInput(_)),
        ) => {
            warn!(
                "event={event} module=service status=denied error_code={}",
                err.code()
            );
        }
        Err(err) => {
            error!(
                "event={event} module=service status=error error_code={} error={err}",
                err.code()
            );
        }
    }

    result
}
