use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Database URL for SQLite.
    /// TOML: `database.url`. Default: `sqlite://modelbook.db`.
    #[serde(default = "default_url")]
    pub url: String,

    /// TOML: `database.busy_timeout_secs`. Default: `5`.
    #[serde(default = "default_busy_timeout_secs")]
    pub busy_timeout_secs: u64,

    /// TOML: `database.max_connections`. Default: `5`.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Use WAL journaling. TOML: `database.wal`. Default: `true`.
    #[serde(default = "default_true")]
    pub wal: bool,

    /// Apply pending migrations when the database actor starts.
    /// TOML: `database.migrate_on_start`. Default: `true`.
    #[serde(default = "default_true")]
    pub migrate_on_start: bool,
}

impl DatabaseConfig {
    /// Defaults with a different URL.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            busy_timeout_secs: default_busy_timeout_secs(),
            max_connections: default_max_connections(),
            wal: true,
            migrate_on_start: true,
        }
    }
}

fn default_url() -> String {
    "sqlite://modelbook.db".to_string()
}

fn default_busy_timeout_secs() -> u64 {
    5
}

fn default_max_connections() -> u32 {
    5
}

fn default_true() -> bool {
    true
}
