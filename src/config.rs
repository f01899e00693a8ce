//! Configuration for the purchase-request store.
//!
//! Supports:
//! - CLI arguments via clap (flattened into a binary's own parser)
//! - Environment variable overrides
//! - Defaults that match the `data/compras.db` layout

use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

/// Default directory holding the database file.
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Default database file name inside the data directory.
pub const DEFAULT_DB_FILE: &str = "compras.db";

/// Location and tuning of the SQLite database.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Data directory for the SQLite database
    #[arg(short, long, env = "COMPRAS_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Database file name inside the data directory
    #[arg(long, env = "COMPRAS_DB_FILE", default_value = DEFAULT_DB_FILE)]
    pub db_file: String,

    /// Maximum number of pooled connections (concurrent sessions)
    #[arg(long, env = "COMPRAS_POOL_SIZE", default_value_t = 8)]
    pub pool_size: u32,

    /// How long a writer waits for a competing write lock, in milliseconds
    #[arg(long, env = "COMPRAS_BUSY_TIMEOUT_MS", default_value_t = 5000)]
    pub busy_timeout_ms: u64,
}

impl StoreConfig {
    /// Full path of the database file.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file)
    }

    /// Busy timeout as a [`Duration`].
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    /// Configuration rooted at `data_dir`, everything else default.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            db_file: DEFAULT_DB_FILE.into(),
            pool_size: 8,
            busy_timeout_ms: 5000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        store: StoreConfig,
    }

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.db_path(), PathBuf::from("./data").join("compras.db"));
        assert_eq!(config.pool_size, 8);
        assert_eq!(config.busy_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_flattened_args_override_defaults() {
        let harness = Harness::parse_from([
            "compras",
            "--data-dir",
            "/tmp/compras",
            "--pool-size",
            "2",
        ]);
        assert_eq!(harness.store.data_dir, PathBuf::from("/tmp/compras"));
        assert_eq!(harness.store.db_file, "compras.db");
        assert_eq!(harness.store.pool_size, 2);
    }
}
