/// Database configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Leader (primary) connection URL.
    pub leader_url: String,
    /// Follower (replica) connection URL; reads go to the leader when unset.
    pub follower_url: Option<String>,
    /// Pool ceiling applied to each side (default: `20`).
    pub max_connections: u32,
}

/// A required variable is missing or malformed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} must be a valid {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

impl DbConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                 | Default          |
    /// |-------------------------|------------------|
    /// | `DATABASE_URL`          | required         |
    /// | `DATABASE_FOLLOWER_URL` | `DATABASE_URL`   |
    /// | `DB_MAX_CONNECTIONS`    | `20`             |
    pub fn from_env() -> Result<Self, ConfigError> {
        let leader_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let follower_url = std::env::var("DATABASE_FOLLOWER_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let max_connections = match std::env::var("DB_MAX_CONNECTIONS") {
            Ok(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "DB_MAX_CONNECTIONS",
                expected: "u32",
                value,
            })?,
            Err(_) => 20,
        };

        Ok(Self {
            leader_url,
            follower_url,
            max_connections,
        })
    }
}
