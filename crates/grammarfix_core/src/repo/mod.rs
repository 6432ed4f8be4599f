//! Repository layer: the store collaborator behind the access layer.
//!
//! # Responsibility
//! - Define narrow data access contracts for sessions and issues.
//! - Isolate SQLite query details from access-layer orchestration.
//!
//! # Invariants
//! - Write paths validate records before any SQL mutation.
//! - Session lookups used for authorization filter on id AND owner in the
//!   same predicate.

mod guard;
pub mod issue_repo;
pub mod session_repo;

use crate::db::DbError;
use crate::model::issue::IssueValidationError;
use crate::model::session::{SessionId, SessionValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for session/issue persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Session failed structural validation before a write.
    SessionValidation(SessionValidationError),
    /// Issue failed structural validation before a write.
    IssueValidation(IssueValidationError),
    /// No session row matched the id/owner predicate.
    NotFound(SessionId),
    /// Persisted row cannot be converted into a valid record.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::SessionValidation(err) => write!(f, "{err}"),
            Self::IssueValidation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "session not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::SessionValidation(err) => Some(err),
            Self::IssueValidation(err) => Some(err),
            Self::NotFound(_)
            | Self::InvalidData(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<SessionValidationError> for RepoError {
    fn from(value: SessionValidationError) -> Self {
        Self::SessionValidation(value)
    }
}

impl From<IssueValidationError> for RepoError {
    fn from(value: IssueValidationError) -> Self {
        Self::IssueValidation(value)
    }
}
