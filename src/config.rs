use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const API_KEY_ENV: &str = "OMDB_API_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_initial_query")]
    pub initial_query: String,
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
    #[serde(default = "default_max_rating")]
    pub max_rating: u8,
    /// Optional label per star, e.g. ["Terrible", "Poor", "Okay", "Good", "Amazing"]
    #[serde(default)]
    pub rating_labels: Vec<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_base_url() -> String {
    "http://www.omdbapi.com".to_string()
}

fn default_initial_query() -> String {
    "inception".to_string()
}

fn default_min_query_len() -> usize {
    crate::app::search::DEFAULT_MIN_QUERY_LEN
}

fn default_max_rating() -> u8 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            initial_query: default_initial_query(),
            min_query_len: default_min_query_len(),
            max_rating: default_max_rating(),
            rating_labels: Vec::new(),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

/// `~/.config/popcorn` (or the platform equivalent).
pub fn config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
        .join("popcorn"))
}

pub fn default_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reads `path` when it exists, defaults otherwise. The environment is not
    /// consulted, so this is what gets written back to disk.
    pub fn load_file_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads the config file if there is one, then applies the environment.
    pub fn load(path: &Path) -> Result<Self> {
        let config = Self::load_file_or_default(path)?
            .with_api_key_override(std::env::var(API_KEY_ENV).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn with_api_key_override(mut self, api_key: Option<String>) -> Self {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
        self
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=10).contains(&self.max_rating) {
            return Err(anyhow::anyhow!("max_rating must be between 1 and 10"));
        }
        if self.min_query_len == 0 {
            return Err(anyhow::anyhow!("min_query_len must be at least 1"));
        }
        if !self.rating_labels.is_empty() && self.rating_labels.len() != self.max_rating as usize {
            return Err(anyhow::anyhow!(
                "rating_labels needs one label per star ({} given, max_rating is {})",
                self.rating_labels.len(),
                self.max_rating
            ));
        }
        if self.base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("base_url cannot be empty"));
        }
        Ok(())
    }

    pub fn log_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.log_dir {
            return Ok(dir.clone());
        }
        Ok(dirs::data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?
            .join("popcorn")
            .join("logs"))
    }
}
