//! Configuration module
//!
//! Lookup order: explicit path, local `.aura-gemini/config.toml` (walking up
//! from the current directory), global `~/.aura-gemini/config.toml`, defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Directory holding the config file, both locally and in the home directory
pub const CONFIG_DIR: &str = ".aura-gemini";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub compile: CompileConfig,

    #[serde(default)]
    pub query: QueryConfig,
}

/// External executables
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolsConfig {
    /// The `aura` executable (compile, info)
    #[serde(default = "default_aura_bin")]
    pub aura_bin: String,

    /// Python interpreter with the `aura` package installed
    #[serde(default = "default_python")]
    pub python: String,

    /// Module run by `memory`
    #[serde(default = "default_memory_module")]
    pub memory_module: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            aura_bin: default_aura_bin(),
            python: default_python(),
            memory_module: default_memory_module(),
        }
    }
}

fn default_aura_bin() -> String {
    "aura".to_string()
}

fn default_python() -> String {
    "python3".to_string()
}

fn default_memory_module() -> String {
    "aura.memory".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompileConfig {
    /// Output file when none is given on the command line
    #[serde(default = "default_output")]
    pub default_output: PathBuf,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            default_output: default_output(),
        }
    }
}

fn default_output() -> PathBuf {
    PathBuf::from("knowledge.aura")
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryConfig {
    /// Results shown per query
    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Characters of document text shown per result
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            preview_chars: default_preview_chars(),
        }
    }
}

fn default_limit() -> usize {
    crate::core::ranker::DEFAULT_LIMIT
}

fn default_preview_chars() -> usize {
    300
}

impl Config {
    /// Load config from default locations
    pub fn load() -> Result<Self> {
        if let Some(local) = Self::find_local_config() {
            return Self::load_from(&local);
        }

        if let Some(global) = Self::global_config_path() {
            if global.exists() {
                return Self::load_from(&global);
            }
        }

        Ok(Self::default())
    }

    /// Load from `path` when given, otherwise from default locations
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        }
    }

    /// Load config from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Save config to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Find local .aura-gemini/config.toml walking up directories
    pub fn find_local_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            let config_path = current.join(CONFIG_DIR).join("config.toml");
            if config_path.exists() {
                return Some(config_path);
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Global config path (~/.aura-gemini/config.toml)
    pub fn global_config_path() -> Option<PathBuf> {
        directories::UserDirs::new().map(|u| u.home_dir().join(CONFIG_DIR).join("config.toml"))
    }

    /// Local config path in the current directory
    pub fn local_config_path() -> PathBuf {
        PathBuf::from(CONFIG_DIR).join("config.toml")
    }

    /// Apply command-line / environment overrides
    pub fn with_overrides(mut self, aura_bin: Option<String>, python: Option<String>) -> Self {
        if let Some(aura_bin) = aura_bin {
            self.tools.aura_bin = aura_bin;
        }
        if let Some(python) = python {
            self.tools.python = python;
        }
        self
    }
}
