//! `graft.toml` configuration.

use graft_kernel::{Search, Strategy};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_PROBE_DEPTH: usize = 64;
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraftConfig {
    pub merge: MergeConfig,
    pub colimit: ColimitConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergeConfig {
    pub strategy: Strategy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColimitConfig {
    pub search: Search,
    /// Bound on lazy unfolding probes.
    pub probe_depth: usize,
}

impl Default for ColimitConfig {
    fn default() -> Self {
        Self {
            search: Search::default(),
            probe_depth: DEFAULT_PROBE_DEPTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// `EnvFilter` directives; `RUST_LOG` takes precedence.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl GraftConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}
