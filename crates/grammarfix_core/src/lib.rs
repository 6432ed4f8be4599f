//! Persistence and authorization core for grammar-fix sessions.
//! Every read or write of a session or issue goes through the
//! ownership-scoped access layer in [`service`].

pub mod auth;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use auth::{require_user, AuthenticatedUser, CallerContext};
pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::issue::{GrammarIssue, IssueId, IssueValidationError};
pub use model::session::{
    GrammarSession, SessionId, SessionPatch, SessionValidationError, UserId,
};
pub use repo::issue_repo::{IssueRepository, SqliteIssueRepository};
pub use repo::session_repo::{SessionRepository, SqliteSessionRepository};
pub use repo::{RepoError, RepoResult};
pub use service::envelope::{IssueData, ListData, SessionData, Success};
pub use service::error::{AccessError, AccessResult};
pub use service::grammar_service::GrammarFixService;
pub use service::input::{
    CreateIssueInput, CreateSessionInput, InputError, ListIssuesInput, UpdateSessionInput,
};

/// Access layer wired to SQLite repositories on one connection.
pub type SqliteGrammarFixService<'conn> =
    GrammarFixService<SqliteSessionRepository<'conn>, SqliteIssueRepository<'conn>>;

/// Builds a [`SqliteGrammarFixService`] over a migrated connection.
pub fn sqlite_service(conn: &rusqlite::Connection) -> RepoResult<SqliteGrammarFixService<'_>> {
    Ok(GrammarFixService::new(
        SqliteSessionRepository::try_new(conn)?,
        SqliteIssueRepository::try_new(conn)?,
    ))
}

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
