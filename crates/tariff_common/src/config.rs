//! Explorer configuration.
//!
//! TOML config file with a fallback chain:
//! 1. $TARIFFCTL_CONFIG (explicit override)
//! 2. $XDG_CONFIG_HOME/tariffctl/config.toml
//! 3. ~/.config/tariffctl/config.toml
//! 4. Built-in defaults

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Where the static tariff dataset lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSettings {
    #[serde(default = "default_dataset_path")]
    pub path: PathBuf,
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("data/tariffs.csv")
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
        }
    }
}

/// Completion gateway settings. The defaults point at Gemini's
/// OpenAI-compatible endpoint; any server speaking that shape works.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewaySettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key. Credentials never live
    /// in the config file itself. `None` for servers that take no key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: Option<String>,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/openai".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_api_key_env() -> Option<String> {
    Some("GEMINI_API_KEY".to_string())
}

fn default_max_tokens() -> u32 {
    1024
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Top-level configuration for the tariff explorer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExplorerConfig {
    #[serde(default)]
    pub dataset: DatasetSettings,

    #[serde(default)]
    pub gateway: GatewaySettings,
}

impl ExplorerConfig {
    /// Discover the config file path with the fallback chain.
    fn discover_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("TARIFFCTL_CONFIG") {
            return Some(PathBuf::from(path));
        }
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg).join("tariffctl/config.toml"));
        }
        if let Ok(home) = std::env::var("HOME") {
            return Some(PathBuf::from(home).join(".config/tariffctl/config.toml"));
        }
        None
    }

    /// Load configuration, falling back to defaults when no file exists.
    pub fn load() -> Result<Self> {
        match Self::discover_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ExplorerConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ExplorerConfig::default();
        assert_eq!(config.dataset.path, PathBuf::from("data/tariffs.csv"));
        assert_eq!(config.gateway.model, "gemini-2.0-flash");
        assert_eq!(
            config.gateway.api_key_env.as_deref(),
            Some("GEMINI_API_KEY")
        );
        assert_eq!(config.gateway.max_tokens, 1024);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: ExplorerConfig = toml::from_str(
            r#"
            [gateway]
            model = "llama3"
            "#,
        )
        .unwrap();

        assert_eq!(config.gateway.model, "llama3");
        // Untouched sections and fields keep their defaults
        assert_eq!(config.dataset.path, PathBuf::from("data/tariffs.csv"));
        assert_eq!(config.gateway.max_tokens, 1024);
    }

    #[test]
    fn test_full_toml_round_trip() {
        let config: ExplorerConfig = toml::from_str(
            r#"
            [dataset]
            path = "/srv/tariffs/data.csv"

            [gateway]
            base_url = "http://localhost:11434/v1"
            model = "llama3"
            api_key_env = "LOCAL_KEY"
            max_tokens = 256
            "#,
        )
        .unwrap();

        assert_eq!(config.dataset.path, PathBuf::from("/srv/tariffs/data.csv"));
        assert_eq!(config.gateway.base_url, "http://localhost:11434/v1");
        assert_eq!(config.gateway.api_key_env.as_deref(), Some("LOCAL_KEY"));
        assert_eq!(config.gateway.max_tokens, 256);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[gateway]\nmodel = \"test-model\"").unwrap();

        let config = ExplorerConfig::load_from(file.path()).unwrap();
        assert_eq!(config.gateway.model, "test-model");
    }

    #[test]
    fn test_load_from_missing_file_is_an_error() {
        assert!(ExplorerConfig::load_from(Path::new("/nonexistent/config.toml")).is_err());
    }

    #[test]
    fn test_load_from_invalid_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "this is not toml [").unwrap();

        assert!(ExplorerConfig::load_from(file.path()).is_err());
    }
}
