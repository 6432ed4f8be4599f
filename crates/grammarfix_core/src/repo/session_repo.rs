//! Session repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist and query `grammar_fix_sessions` rows.
//! - Fold ownership into every lookup predicate.
//!
//! # Invariants
//! - No query returns or mutates a row whose `owner_id` differs from the
//!   caller-supplied owner.
//! - Listing order is deterministic: `created_at ASC, id ASC`.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::model::session::{GrammarSession, SessionId, SessionPatch, SessionValidationError};
use crate::repo::guard::ensure_table_ready;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

const SESSION_TABLE: &str = "grammar_fix_sessions";

const SESSION_COLUMNS: &[&str] = &[
    "id",
    "owner_id",
    "language",
    "original_text",
    "corrected_text",
    "overall_comment",
    "created_at",
    "updated_at",
];

const SESSION_SELECT_SQL: &str = "SELECT
    id,
    owner_id,
    language,
    original_text,
    corrected_text,
    overall_comment,
    created_at,
    updated_at
FROM grammar_fix_sessions";

/// Repository interface for owner-scoped session persistence.
pub trait SessionRepository {
    /// Inserts one new session row.
    fn insert_session(&self, session: &GrammarSession) -> RepoResult<()>;
    /// Loads a session only if it exists AND belongs to `owner_id`.
    fn find_owned_session(
        &self,
        id: SessionId,
        owner_id: &str,
    ) -> RepoResult<Option<GrammarSession>>;
    /// Writes supplied patch fields and `updated_at` on an owned session.
    ///
    /// Returns `RepoError::NotFound` when no owned row matched.
    fn update_owned_session(
        &self,
        id: SessionId,
        owner_id: &str,
        patch: &SessionPatch,
        updated_at: i64,
    ) -> RepoResult<()>;
    /// Lists every session owned by `owner_id`.
    fn list_sessions_by_owner(&self, owner_id: &str) -> RepoResult<Vec<GrammarSession>>;
}

/// SQLite-backed session repository.
pub struct SqliteSessionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSessionRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, SESSION_TABLE, SESSION_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl SessionRepository for SqliteSessionRepository<'_> {
    fn insert_session(&self, session: &GrammarSession) -> RepoResult<()> {
        session.validate()?;

        self.conn.execute(
            "INSERT INTO grammar_fix_sessions (
                id,
                owner_id,
                language,
                original_text,
                corrected_text,
                overall_comment,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                session.id.to_string(),
                session.owner_id.as_str(),
                session.language.as_deref(),
                session.original_text.as_str(),
                session.corrected_text.as_str(),
                session.overall_comment.as_deref(),
                session.created_at,
                session.updated_at,
            ],
        )?;

        Ok(())
    }

    fn find_owned_session(
        &self,
        id: SessionId,
        owner_id: &str,
    ) -> RepoResult<Option<GrammarSession>> {
        self.conn
            .query_row(
                &format!("{SESSION_SELECT_SQL} WHERE id = ?1 AND owner_id = ?2;"),
                params![id.to_string(), owner_id],
                read_session_columns,
            )
            .optional()?
            .map(SessionColumns::into_session)
            .transpose()
    }

    fn update_owned_session(
        &self,
        id: SessionId,
        owner_id: &str,
        patch: &SessionPatch,
        updated_at: i64,
    ) -> RepoResult<()> {
        validate_patch(patch)?;

        let changed = self.conn.execute(
            "UPDATE grammar_fix_sessions
             SET
                language = COALESCE(?3, language),
                original_text = COALESCE(?4, original_text),
                corrected_text = COALESCE(?5, corrected_text),
                overall_comment = COALESCE(?6, overall_comment),
                updated_at = ?7
             WHERE id = ?1
               AND owner_id = ?2;",
            params![
                id.to_string(),
                owner_id,
                patch.language.as_deref(),
                patch.original_text.as_deref(),
                patch.corrected_text.as_deref(),
                patch.overall_comment.as_deref(),
                updated_at,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn list_sessions_by_owner(&self, owner_id: &str) -> RepoResult<Vec<GrammarSession>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SESSION_SELECT_SQL}
             WHERE owner_id = ?1
             ORDER BY created_at ASC, id ASC;"
        ))?;

        let mut rows = stmt.query([owner_id])?;
        let mut sessions = Vec::new();
        while let Some(row) = rows.next()? {
            sessions.push(read_session_columns(row)?.into_session()?);
        }

        Ok(sessions)
    }
}

/// Raw column values before uuid parsing and validation.
struct SessionColumns {
    id: String,
    owner_id: String,
    language: Option<String>,
    original_text: String,
    corrected_text: String,
    overall_comment: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl SessionColumns {
    fn into_session(self) -> RepoResult<GrammarSession> {
        let id = Uuid::parse_str(&self.id).map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid uuid value `{}` in grammar_fix_sessions.id",
                self.id
            ))
        })?;

        let session = GrammarSession {
            id,
            owner_id: self.owner_id,
            language: self.language,
            original_text: self.original_text,
            corrected_text: self.corrected_text,
            overall_comment: self.overall_comment,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        session
            .validate()
            .map_err(|err| RepoError::InvalidData(format!("session {id}: {err}")))?;
        Ok(session)
    }
}

fn read_session_columns(row: &Row<'_>) -> rusqlite::Result<SessionColumns> {
    Ok(SessionColumns {
        id: row.get("id")?,
        owner_id: row.get("owner_id")?,
        language: row.get("language")?,
        original_text: row.get("original_text")?,
        corrected_text: row.get("corrected_text")?,
        overall_comment: row.get("overall_comment")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn validate_patch(patch: &SessionPatch) -> Result<(), SessionValidationError> {
    if patch.original_text.as_deref() == Some("") {
        return Err(SessionValidationError::EmptyOriginalText);
    }
    if patch.corrected_text.as_deref() == Some("") {
        return Err(SessionValidationError::EmptyCorrectedText);
    }
    Ok(())
}
