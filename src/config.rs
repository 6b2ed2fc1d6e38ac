use std::{fs, net::SocketAddr, path::{Path, PathBuf}};
use serde::{Serialize, Deserialize};
use anyhow::{self, Context};
use log::info;

use crate::backend::JsonStore;
use crate::core::Ledger;

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Accounts file, relative to the working directory
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig { path: PathBuf::from("data.json") }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig { address: SocketAddr::from(([127, 0, 0, 1], 8080)) }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    pub const DEFAULT_LOCATION: &'static str = "resources/bankbook.toml";

    pub fn read(filepath: impl AsRef<Path>) -> anyhow::Result<Self> {
        let file_content = fs::read_to_string(filepath)
            .with_context(|| "failed to read config file")?;
        let config = toml::from_str(&file_content)
            .with_context(|| "failed to parse config file")?;
        return Ok(config);
    }

    /// Like `read`, but a missing file yields the defaults.
    pub fn read_or_default(filepath: impl AsRef<Path>) -> anyhow::Result<Self> {
        let filepath = filepath.as_ref();
        if !filepath.exists() {
            info!("no config at {}, using defaults", filepath.display());
            return Ok(AppConfig::default());
        }
        AppConfig::read(filepath)
            .with_context(|| format!("while loading {}", filepath.display()))
    }

    pub fn open_ledger(&self) -> Ledger<JsonStore> {
        Ledger::open(JsonStore::new(&self.storage.path))
    }
}
