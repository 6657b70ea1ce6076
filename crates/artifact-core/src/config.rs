use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::paths;

pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 4000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_PORT: u16 = 8090;

const CONFIG_FILE_PATH: &str = "config.toml";

/// Per-provider overrides. API keys are never stored here; they are read
/// from the environment on every call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub openrouter: ProviderSettings,
    #[serde(default)]
    pub aiml: ProviderSettings,
    #[serde(default)]
    pub openai: ProviderSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            providers: ProvidersConfig::default(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            data_dir: None,
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    /// Load `~/.artifact-studio/config.json`, falling back to `./config.toml`,
    /// then apply environment overrides.
    pub fn load() -> Self {
        let mut config = Self::from_file(&paths::config_json_path())
            .or_else(|| Self::from_file(Path::new(CONFIG_FILE_PATH)))
            .unwrap_or_default();
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Read a JSON or TOML file (by extension). Unreadable or invalid files are
    /// logged and ignored.
    pub fn from_file(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("Failed to read config {}: {}", path.display(), e);
                return None;
            }
        };

        let parsed = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::from_str::<Config>(&content).map_err(|e| e.to_string()),
            _ => serde_json::from_str::<Config>(&content).map_err(|e| e.to_string()),
        };

        match parsed {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                Some(config)
            }
            Err(e) => {
                log::warn!("Failed to parse config {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Apply `ARTIFACT_STUDIO_*` / `PORT` overrides from `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = parse_env(&lookup, "ARTIFACT_STUDIO_TEMPERATURE") {
            self.temperature = value;
        }
        if let Some(value) = parse_env(&lookup, "ARTIFACT_STUDIO_MAX_TOKENS") {
            self.max_tokens = value;
        }
        if let Some(value) = parse_env(&lookup, "ARTIFACT_STUDIO_TIMEOUT_SECS") {
            self.request_timeout_secs = value;
        }
        if let Some(dir) = lookup("ARTIFACT_STUDIO_DATA_DIR").filter(|v| !v.trim().is_empty()) {
            self.data_dir = Some(PathBuf::from(dir.trim()));
        }
        if let Some(port) = parse_env(&lookup, "PORT") {
            self.port = port;
        }
    }

    /// Directory holding canvas / app state / api data snapshots.
    pub fn snapshot_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(paths::snapshots_dir)
    }
}

fn parse_env<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring invalid value for {}: {:?}", key, raw);
            None
        }
    }
}
