//! Issue repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist and list `grammar_issues` rows for one session.
//!
//! # Invariants
//! - This layer does not check ownership; callers resolve the owned parent
//!   session first.
//! - Listing order is deterministic: `created_at ASC, id ASC`.

use crate::model::issue::GrammarIssue;
use crate::model::session::SessionId;
use crate::repo::guard::ensure_table_ready;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const ISSUE_TABLE: &str = "grammar_issues";

const ISSUE_COLUMNS: &[&str] = &[
    "id",
    "session_id",
    "issue_type",
    "original_fragment",
    "corrected_fragment",
    "explanation",
    "severity",
    "created_at",
];

/// Repository interface for issue persistence.
pub trait IssueRepository {
    /// Inserts one new issue row.
    fn insert_issue(&self, issue: &GrammarIssue) -> RepoResult<()>;
    /// Lists every issue attached to `session_id`.
    fn list_issues_for_session(&self, session_id: SessionId) -> RepoResult<Vec<GrammarIssue>>;
}

/// SQLite-backed issue repository.
pub struct SqliteIssueRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteIssueRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_table_ready(conn, ISSUE_TABLE, ISSUE_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl IssueRepository for SqliteIssueRepository<'_> {
    fn insert_issue(&self, issue: &GrammarIssue) -> RepoResult<()> {
        issue.validate()?;

        self.conn.execute(
            "INSERT INTO grammar_issues (
                id,
                session_id,
                issue_type,
                original_fragment,
                corrected_fragment,
                explanation,
                severity,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                issue.id.to_string(),
                issue.session_id.to_string(),
                issue.issue_type.as_deref(),
                issue.original_fragment.as_deref(),
                issue.corrected_fragment.as_deref(),
                issue.explanation.as_deref(),
                issue.severity.as_deref(),
                issue.created_at,
            ],
        )?;

        Ok(())
    }

    fn list_issues_for_session(&self, session_id: SessionId) -> RepoResult<Vec<GrammarIssue>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                id,
                session_id,
                issue_type,
                original_fragment,
                corrected_fragment,
                explanation,
                severity,
                created_at
             FROM grammar_issues
             WHERE session_id = ?1
             ORDER BY created_at ASC, id ASC;",
        )?;

        let mut rows = stmt.query([session_id.to_string()])?;
        let mut issues = Vec::new();
        while let Some(row) = rows.next()? {
            issues.push(parse_issue_row(row)?);
        }

        Ok(issues)
    }
}

fn parse_issue_row(row: &Row<'_>) -> RepoResult<GrammarIssue> {
    let id = parse_uuid(row.get("id")?, "grammar_issues.id")?;
    let session_id = parse_uuid(row.get("session_id")?, "grammar_issues.session_id")?;

    let issue = GrammarIssue {
        id,
        session_id,
        issue_type: row.get("issue_type")?,
        original_fragment: row.get("original_fragment")?,
        corrected_fragment: row.get("corrected_fragment")?,
        explanation: row.get("explanation")?,
        severity: row.get("severity")?,
        created_at: row.get("created_at")?,
    };
    issue
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("issue {id}: {err}")))?;
    Ok(issue)
}

fn parse_uuid(value: String, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(&value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}
