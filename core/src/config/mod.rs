use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const MEDCREW_DIR: &str = ".medcrew";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    pub api_key: String,
    pub base_url: String,
    pub results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://google.serper.dev".to_string(),
            results: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScrapeConfig {
    pub max_chars: usize,
    pub max_bytes: usize,
    pub timeout_secs: u64,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            max_chars: 8_000,
            max_bytes: 2 * 1024 * 1024,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub provider: Option<String>,
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: String,
    pub temperature: f64,
    pub max_iterations: usize,
    pub search: SearchConfig,
    pub scrape: ScrapeConfig,
    pub server: ServerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            provider: None,
            api_key: String::new(),
            base_url: None,
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            max_iterations: 15,
            search: SearchConfig::default(),
            scrape: ScrapeConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

pub fn get_medcrew_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(MEDCREW_DIR)
}

pub fn get_config_path() -> PathBuf {
    get_medcrew_dir().join("config.toml")
}

pub fn config_exists() -> bool {
    get_config_path().exists()
}

impl Config {
    /// Loads the config file when present, falling back to defaults, then
    /// applies environment overrides.
    pub fn load_or_init() -> Result<Self> {
        let mut config = if config_exists() {
            load_config_from(&get_config_path())?
        } else {
            Config::default()
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(provider) = non_empty("MEDCREW_PROVIDER") {
            self.provider = Some(provider);
        }
        if let Some(model) = non_empty("MEDCREW_MODEL") {
            self.model = model;
        }
        if let Some(key) = non_empty("SERPER_API_KEY") {
            self.search.api_key = key;
        }
        if let Some(host) = non_empty("MEDCREW_HOST") {
            self.server.host = host;
        }
        if let Some(port) = non_empty("MEDCREW_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!(%port, "Ignoring invalid MEDCREW_PORT"),
            }
        }
    }
}

pub fn load_config() -> Result<Config> {
    load_config_from(&get_config_path())
}

pub fn load_config_from(config_path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(config_path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            anyhow::anyhow!(
                "Config file not found. Run 'medcrew onboard' to set up your configuration."
            )
        } else {
            anyhow::anyhow!("Failed to read config from {}: {}", config_path.display(), e)
        }
    })?;

    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config from {}", config_path.display()))
}

pub fn save_config(config: &Config) -> Result<()> {
    save_config_to(config, &get_config_path())
}

pub fn save_config_to(config: &Config, config_path: &Path) -> Result<()> {
    if let Some(dir) = config_path.parent()
        && !dir.exists()
    {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create config directory at {}", dir.display()))?;
    }

    let content =
        toml::to_string_pretty(config).with_context(|| "Failed to serialize config to TOML")?;

    std::fs::write(config_path, content)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_original_app() {
        let config = Config::default();
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert_eq!(config.server.port, 8501);
        assert_eq!(config.search.results, 10);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "model = \"gpt-4o\"\n\n[server]\nport = 9000\n").unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.scrape.max_chars, 8_000);
    }

    #[test]
    fn save_then_load_creates_directory() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("config.toml");
        let config = Config {
            api_key: "sk-test".into(),
            provider: Some("ollama".into()),
            ..Default::default()
        };

        save_config_to(&config, &path).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), config);
    }

    #[test]
    fn missing_file_points_to_onboarding() {
        let tmp = TempDir::new().unwrap();
        let err = load_config_from(&tmp.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("medcrew onboard"));
    }

    #[test]
    fn env_overrides_apply_and_skip_bad_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("MEDCREW_MODEL", "gpt-4o-mini"),
            ("SERPER_API_KEY", "serper-key"),
            ("MEDCREW_PORT", "not-a-port"),
            ("MEDCREW_HOST", "  "),
        ]);
        let mut config = Config::default();
        config.apply_env_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.search.api_key, "serper-key");
        assert_eq!(config.server.port, 8501);
        assert_eq!(config.server.host, "127.0.0.1");
    }
}
