//! Schema readiness check shared by the SQLite repositories.

use crate::db::migrations::{current_version, latest_version};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{Connection, OptionalExtension};
use std::collections::HashSet;

/// Rejects connections that are not fully migrated or that lack `table` or
/// any of `columns`.
pub(crate) fn ensure_table_ready(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> RepoResult<()> {
    let actual_version = current_version(conn)?;
    if actual_version != latest_version() {
        return Err(RepoError::UninitializedConnection {
            expected_version: latest_version(),
            actual_version,
        });
    }

    let declared = declared_columns(conn, table)?
        .ok_or(RepoError::MissingRequiredTable(table))?;
    match columns.iter().find(|column| !declared.contains(**column)) {
        Some(&column) => Err(RepoError::MissingRequiredColumn { table, column }),
        None => Ok(()),
    }
}

/// Column names of `table`, or `None` when no such table exists.
fn declared_columns(conn: &Connection, table: &str) -> RepoResult<Option<HashSet<String>>> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            [table],
            |_| Ok(()),
        )
        .optional()?;
    if found.is_none() {
        return Ok(None);
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let names = stmt
        .query_map([table], |row| row.get::<_, String>(0))?
        .collect::<Result<HashSet<_>, _>>()?;
    Ok(Some(names))
}
