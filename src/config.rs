//! Configuration loaded from `~/.investo/config.toml`.
//!
//! Every key is optional; a missing file means all defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::db::get_default_data_dir;

/// Environment variable that forces latency simulation on (`1`) or off (`0`)
pub const LATENCY_ENV: &str = "INVESTO_SIMULATE_LATENCY";

/// Where the ledger and users live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// SQLite file, survives restarts
    #[default]
    Sqlite,
    /// Process lifetime only
    Memory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub storage: StorageKind,
    /// SQLite file; defaults to `<data dir>/data.db`
    pub database: Option<PathBuf>,
    pub simulate_latency: bool,
    pub seed_demo_data: bool,
    /// JSON stock catalog replacing the built-in one
    pub catalog: Option<PathBuf>,
    /// Directory for the database and session file; defaults to `~/.investo`
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageKind::Sqlite,
            database: None,
            simulate_latency: false,
            seed_demo_data: true,
            catalog: None,
            data_dir: None,
        }
    }
}

impl Config {
    /// Default config file location (~/.investo/config.toml)
    pub fn default_path() -> Result<PathBuf> {
        Ok(get_default_data_dir()?.join("config.toml"))
    }

    /// Load from `path`, or from the default location when `None`
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };

        let mut config = if path.exists() {
            debug!("Loading config from {:?}", path);
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {:?}", path))?;
            Self::parse(&raw).with_context(|| format!("Invalid config file {:?}", path))?
        } else {
            debug!("No config at {:?}, using defaults", path);
            Self::default()
        };

        config.apply_env(std::env::var(LATENCY_ENV).ok().as_deref());
        Ok(config)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    fn apply_env(&mut self, latency: Option<&str>) {
        if let Some(value) = latency {
            self.simulate_latency = !matches!(value.trim(), "" | "0" | "false");
        }
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => get_default_data_dir(),
        }
    }

    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database {
            Some(path) => Ok(path.clone()),
            None => Ok(self.data_dir()?.join("data.db")),
        }
    }

    pub fn session_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("session.json"))
    }
}
