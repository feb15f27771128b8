use taleforge_core::error::CoreError;

/// Database configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// SQLite connection URL.
    pub database_url: String,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

pub const DEFAULT_DATABASE_URL: &str = "sqlite://taleforge.db?mode=rwc";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

impl DbConfig {
    /// Load configuration from the environment, after reading an optional
    /// `.env` file.
    ///
    /// | Env Var              | Default                          |
    /// |----------------------|----------------------------------|
    /// | `DATABASE_URL`       | `sqlite://taleforge.db?mode=rwc` |
    /// | `DB_MAX_CONNECTIONS` | `5`                              |
    pub fn from_env() -> Result<Self, CoreError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CoreError> {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(raw) => raw.trim().parse::<u32>().ok().filter(|n| *n > 0).ok_or_else(|| {
                CoreError::Validation(format!(
                    "DB_MAX_CONNECTIONS must be a positive integer, got '{raw}'"
                ))
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            database_url,
            max_connections,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = DbConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
    }

    #[test]
    fn values_are_read() {
        let config = DbConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("DB_MAX_CONNECTIONS", "12"),
        ]))
        .unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.max_connections, 12);
    }

    #[test]
    fn bad_connection_count_is_an_error() {
        for raw in ["many", "0", "-1"] {
            assert_matches!(
                DbConfig::from_lookup(lookup(&[("DB_MAX_CONNECTIONS", raw)])),
                Err(CoreError::Validation(_))
            );
        }
    }
}
