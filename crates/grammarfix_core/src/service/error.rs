//! Typed failures surfaced by the access layer.

use crate::repo::RepoError;
use crate::service::input::InputError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AccessResult<T> = Result<T, AccessError>;

/// Access-layer failure taxonomy.
#[derive(Debug)]
pub enum AccessError {
    /// No authenticated identity on the caller context.
    Unauthorized,
    /// Session missing or owned by someone else. The two are indistinguishable.
    NotFound,
    /// Request shape failed validation.
    InvalidInput(InputError),
    /// Unclassified store failure.
    Repo(RepoError),
    /// Write succeeded but read-back did not match.
    InconsistentState(&'static str),
}

impl AccessError {
    /// Stable wire code for the failure envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::NotFound => "NOT_FOUND",
            Self::InvalidInput(_) => "BAD_REQUEST",
            Self::Repo(_) | Self::InconsistentState(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl Display for AccessError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "You must be signed in to perform this action."),
            Self::NotFound => write!(f, "Grammar fix session not found."),
            Self::InvalidInput(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent session state: {details}"),
        }
    }
}

impl Error for AccessError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidInput(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<InputError> for AccessError {
    fn from(value: InputError) -> Self {
        Self::InvalidInput(value)
    }
}

impl From<RepoError> for AccessError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(_) => Self::NotFound,
            other => Self::Repo(other),
        }
    }
}
