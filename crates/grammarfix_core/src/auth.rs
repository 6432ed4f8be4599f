//! Authentication gate.
//!
//! Credential verification happens upstream; this module only reads the
//! identity that was resolved for the current request.

use crate::model::session::UserId;
use crate::service::error::{AccessError, AccessResult};

/// Identity attached to a request after upstream authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: UserId,
}

/// Per-request caller context, passed explicitly into every operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerContext {
    user: Option<AuthenticatedUser>,
}

impl CallerContext {
    /// Context with no identity attached.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Context for a request authenticated as `user_id`.
    pub fn authenticated(user_id: impl Into<UserId>) -> Self {
        Self {
            user: Some(AuthenticatedUser { id: user_id.into() }),
        }
    }

    /// Builds a context from an optional upstream identity.
    pub fn from_identity(user_id: Option<String>) -> Self {
        match user_id {
            Some(id) => Self::authenticated(id),
            None => Self::anonymous(),
        }
    }

    pub fn user(&self) -> Option<&AuthenticatedUser> {
        self.user.as_ref()
    }
}

/// Returns the authenticated identity or `AccessError::Unauthorized`.
///
/// A blank identity string is treated the same as no identity.
pub fn require_user(context: &CallerContext) -> AccessResult<&AuthenticatedUser> {
    match context.user() {
        Some(user) if !user.id.trim().is_empty() => Ok(user),
        _ => Err(AccessError::Unauthorized),
    }
}

#[cfg(test)]
mod tests {
    use super::{require_user, CallerContext};
    use crate::service::error::AccessError;

    #[test]
    fn anonymous_context_is_unauthorized() {
        let err = require_user(&CallerContext::anonymous()).unwrap_err();
        assert!(matches!(err, AccessError::Unauthorized));
    }

    #[test]
    fn blank_identity_is_unauthorized() {
        let err = require_user(&CallerContext::authenticated("   ")).unwrap_err();
        assert!(matches!(err, AccessError::Unauthorized));
    }

    #[test]
    fn authenticated_context_returns_identity() {
        let context = CallerContext::from_identity(Some("user-a".to_string()));
        assert_eq!(require_user(&context).unwrap().id, "user-a");
    }
}
