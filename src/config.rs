//! Runtime configuration loaded from environment variables.

use std::net::IpAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::db::{self, Database};

const DEFAULT_PORT: u16 = 3000;

#[derive(Clone, Debug)]
pub struct Config {
    /// Database file (from CATEGORY_TREE_DB). Defaults to the platform data directory.
    pub db_path: Option<PathBuf>,
    /// Bind address for the HTTP API (from CATEGORY_TREE_HOST)
    pub host: IpAddr,
    /// Port for the HTTP API (from CATEGORY_TREE_PORT)
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: None,
            host: IpAddr::from([127, 0, 0, 1]),
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset. Malformed values are errors rather than
    /// silently replaced.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = lookup("CATEGORY_TREE_DB") {
            config.db_path = Some(PathBuf::from(path));
        }
        if let Some(host) = lookup("CATEGORY_TREE_HOST") {
            config.host = host
                .trim()
                .parse()
                .with_context(|| format!("Invalid CATEGORY_TREE_HOST: {}", host))?;
        }
        if let Some(port) = lookup("CATEGORY_TREE_PORT") {
            config.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid CATEGORY_TREE_PORT: {}", port))?;
        }

        Ok(config)
    }

    /// Open and migrate the configured database.
    pub fn open_database(&self) -> Result<Database> {
        let path = match &self.db_path {
            Some(path) => path.clone(),
            None => db::default_path()?,
        };
        tracing::info!("Using database at {}", path.display());

        let db = Database::open(path)?;
        db.migrate()?;
        Ok(db)
    }
}
