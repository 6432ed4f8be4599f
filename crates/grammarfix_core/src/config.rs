//! Runtime configuration resolved from environment variables.
//!
//! | Variable                | Default                          |
//! |-------------------------|----------------------------------|
//! | `GRAMMARFIX_DB_PATH`    | `<temp dir>/grammarfix.sqlite3`  |
//! | `GRAMMARFIX_LOG_LEVEL`  | [`default_log_level`]            |
//! | `GRAMMARFIX_LOG_DIR`    | unset (file logging disabled)    |
//!
//! Blank values are treated as unset.

use crate::logging::{default_log_level, normalize_level, normalize_log_dir};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "GRAMMARFIX_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "GRAMMARFIX_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "GRAMMARFIX_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "grammarfix.sqlite3";

/// Resolved core configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    pub log_dir: Option<PathBuf>,
}

impl CoreConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = read(DB_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));

        let log_level = match read(LOG_LEVEL_ENV) {
            Some(value) => normalize_level(&value).map_err(|err| format!("{LOG_LEVEL_ENV}: {err}"))?,
            None => default_log_level(),
        };

        let log_dir = read(LOG_DIR_ENV)
            .map(|value| normalize_log_dir(&value))
            .transpose()
            .map_err(|err| format!("{LOG_DIR_ENV}: {err}"))?;

        Ok(Self {
            db_path,
            log_level,
            log_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, DB_PATH_ENV, LOG_DIR_ENV, LOG_LEVEL_ENV};
    use crate::logging::default_log_level;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn resolve(pairs: &[(&str, &str)]) -> Result<CoreConfig, String> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        CoreConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset_or_blank() {
        let config = resolve(&[(DB_PATH_ENV, "  ")]).unwrap();
        assert_eq!(
            config.db_path,
            std::env::temp_dir().join("grammarfix.sqlite3")
        );
        assert_eq!(config.log_level, default_log_level());
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn explicit_values_are_normalized() {
        let log_dir = std::env::temp_dir().join("grammarfix-logs");
        let config = resolve(&[
            (DB_PATH_ENV, "/var/lib/grammarfix/db.sqlite3"),
            (LOG_LEVEL_ENV, "WARNING"),
            (LOG_DIR_ENV, log_dir.to_str().unwrap()),
        ])
        .unwrap();
        assert_eq!(
            config.db_path,
            PathBuf::from("/var/lib/grammarfix/db.sqlite3")
        );
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(log_dir));
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let err = resolve(&[(LOG_LEVEL_ENV, "loud")]).unwrap_err();
        assert!(err.starts_with(LOG_LEVEL_ENV));

        let err = resolve(&[(LOG_DIR_ENV, "relative/logs")]).unwrap_err();
        assert!(err.starts_with(LOG_DIR_ENV));
    }
}
