//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `grammarfix_core` linkage and that migrations apply cleanly.
//! - Keep output deterministic for quick local sanity checks.

use grammarfix_core::db::migrations::{current_version, latest_version};
use grammarfix_core::db::open_db_in_memory;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("grammarfix_core ping={}", grammarfix_core::ping());
    println!("grammarfix_core version={}", grammarfix_core::core_version());

    let schema_version = open_db_in_memory()
        .map_err(|err| err.to_string())
        .and_then(|conn| current_version(&conn).map_err(|err| err.to_string()));
    match schema_version {
        Ok(version) => {
            println!("grammarfix_core schema={version}/{}", latest_version());
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("grammarfix_core schema error: {err}");
            ExitCode::FAILURE
        }
    }
}
