//! numtriad configuration module
//!
//! Config loading priority:
//! 1. Path in `NUMTRIAD_CONFIG`
//! 2. `numtriad.json` in the working directory
//! 3. Built-in defaults
//!
//! Every field has a serde default, so partial files are accepted.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::search::engine::RankingConfig;

pub const CONFIG_FILE: &str = "numtriad.json";
pub const CONFIG_ENV: &str = "NUMTRIAD_CONFIG";
pub const CONFIG_VERSION: u32 = 1;

/// Default Model2Vec model ID
pub const DEFAULT_MODEL2VEC_MODEL: &str = "minishlab/potion-base-8M";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub ranking: RankingSettings,

    #[serde(default)]
    pub scorer: ScorerSettings,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

/// Retrieval weights and default result count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingSettings {
    #[serde(default = "default_alpha")]
    pub alpha: f64,

    #[serde(default = "default_beta")]
    pub beta: f64,

    #[serde(default = "default_gamma")]
    pub gamma: f64,

    #[serde(default = "default_k")]
    pub default_k: usize,
}

fn default_alpha() -> f64 {
    0.7
}

fn default_beta() -> f64 {
    0.3
}

fn default_gamma() -> f64 {
    0.1
}

fn default_k() -> usize {
    3
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            beta: default_beta(),
            gamma: default_gamma(),
            default_k: default_k(),
        }
    }
}

/// Scorer selection (neural vs heuristic)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorerSettings {
    /// Use the neural-text scorer when its model and checkpoint are present.
    /// `false` forces the heuristic scorer.
    #[serde(default = "default_true")]
    pub neural: bool,

    /// Local Model2Vec directory; overrides the HuggingFace cache lookup
    #[serde(default)]
    pub model_path: Option<PathBuf>,

    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// safetensors checkpoint of the regressor head
    #[serde(default)]
    pub regressor_path: Option<PathBuf>,

    #[serde(default = "default_true")]
    pub linguistic_features: bool,
}

fn default_model_id() -> String {
    DEFAULT_MODEL2VEC_MODEL.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ScorerSettings {
    fn default() -> Self {
        Self {
            neural: true,
            model_path: None,
            model_id: default_model_id(),
            regressor_path: None,
            linguistic_features: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            ranking: RankingSettings::default(),
            scorer: ScorerSettings::default(),
        }
    }
}

impl Config {
    /// Load from `NUMTRIAD_CONFIG`, then `root/numtriad.json`, then defaults
    pub fn load(root: &Path) -> Self {
        if let Ok(env_path) = std::env::var(CONFIG_ENV) {
            let env_path = PathBuf::from(env_path);
            match Self::load_from_file(&env_path) {
                Ok(config) => return config,
                Err(e) => warn!(
                    "Failed to load {} from {}: {}. Trying {}.",
                    CONFIG_ENV,
                    env_path.display(),
                    e,
                    CONFIG_FILE
                ),
            }
        }

        let config_path = root.join(CONFIG_FILE);
        if config_path.exists() {
            match Self::load_from_file(&config_path) {
                Ok(config) => return config,
                Err(e) => warn!("Failed to load {}: {}. Using defaults.", CONFIG_FILE, e),
            }
        }

        debug!("No config file found, using defaults");
        Self::default()
    }

    /// Load relative to the current working directory
    pub fn load_default() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::load(&cwd)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        if config.version > CONFIG_VERSION {
            warn!(
                "Config version {} is newer than supported version {}.",
                config.version, CONFIG_VERSION
            );
        }
        Ok(config)
    }

    /// Write pretty JSON to `root/numtriad.json`, returning the path
    pub fn save(&self, root: &Path) -> Result<PathBuf> {
        let config_path = root.join(CONFIG_FILE);
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, content)?;
        Ok(config_path)
    }

    /// Generate default config file content
    pub fn default_json() -> Result<String> {
        Ok(serde_json::to_string_pretty(&Config::default())?)
    }

    /// Validated ranking weights
    pub fn ranking_config(&self) -> crate::core::error::Result<RankingConfig> {
        RankingConfig::new(self.ranking.alpha, self.ranking.beta, self.ranking.gamma)
    }
}
