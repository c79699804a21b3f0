use crate::error::{ConfigError, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// ── Top-level config ──────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Upstream completion API key (absence fails at call time, not startup)
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub default_model: String,
    #[serde(default = "default_temperature")]
    pub default_temperature: f64,
    /// Completion API base URL (overridable for self-hosted compatibles)
    #[serde(default = "default_provider_base_url")]
    pub provider_base_url: String,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub news: NewsConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub client: ClientConfig,
}

fn default_model() -> String {
    "gpt-4o-mini".into()
}

fn default_temperature() -> f64 {
    0.2
}

fn default_provider_base_url() -> String {
    "https://api.openai.com/v1".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            api_key: None,
            default_model: default_model(),
            default_temperature: default_temperature(),
            provider_base_url: default_provider_base_url(),
            gateway: GatewayConfig::default(),
            news: NewsConfig::default(),
            search: SearchConfig::default(),
            client: ClientConfig::default(),
        }
    }
}

// ── Gateway ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Gateway port (default: 8080)
    #[serde(default = "default_gateway_port")]
    pub port: u16,
    /// Gateway host (default: 127.0.0.1)
    #[serde(default = "default_gateway_host")]
    pub host: String,
}

fn default_gateway_port() -> u16 {
    8080
}

fn default_gateway_host() -> String {
    "127.0.0.1".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_gateway_port(),
            host: default_gateway_host(),
        }
    }
}

// ── News providers ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    /// Primary provider (NewsAPI) key
    #[serde(default)]
    pub newsapi_key: Option<String>,
    /// Fallback provider (GNews) key
    #[serde(default)]
    pub gnews_key: Option<String>,
    #[serde(default = "default_newsapi_base_url")]
    pub newsapi_base_url: String,
    #[serde(default = "default_gnews_base_url")]
    pub gnews_base_url: String,
}

fn default_newsapi_base_url() -> String {
    "https://newsapi.org".into()
}

fn default_gnews_base_url() -> String {
    "https://gnews.io".into()
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            newsapi_key: None,
            gnews_key: None,
            newsapi_base_url: default_newsapi_base_url(),
            gnews_base_url: default_gnews_base_url(),
        }
    }
}

// ── Web search ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_base_url")]
    pub base_url: String,
    /// Cap on parsed results per query
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_search_base_url() -> String {
    "https://html.duckduckgo.com".into()
}

fn default_max_results() -> usize {
    8
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_search_base_url(),
            max_results: default_max_results(),
        }
    }
}

// ── Client ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Gateway URL the client talks to
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,
}

fn default_gateway_url() -> String {
    "http://127.0.0.1:8080".into()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            gateway_url: default_gateway_url(),
        }
    }
}

// ── Load / save ──────────────────────────────────────────────────

impl Config {
    pub fn load_or_init() -> Result<Self> {
        let home = UserDirs::new()
            .map(|u| u.home_dir().to_path_buf())
            .ok_or_else(|| ConfigError::Load("could not find home directory".into()))?;
        let novax_dir = home.join(".novax");
        let config_path = novax_dir.join("config.toml");

        if !novax_dir.exists() {
            fs::create_dir_all(&novax_dir).map_err(ConfigError::Io)?;
        }

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self {
                config_path: config_path.clone(),
                ..Self::default()
            };
            config.save()?;
            Ok(config)
        }
    }

    /// Load and parse one config file. A file that exists but doesn't parse
    /// is an error, not a silent fall-back to defaults.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(config_path).map_err(ConfigError::Io)?;
        let mut config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::Load(format!("{}: {e}", config_path.display())))?;
        // Set computed path that is skipped during serialization
        config.config_path = config_path.to_path_buf();
        Ok(config)
    }

    /// Apply environment variable overrides to config
    pub fn apply_env_overrides(&mut self) {
        // API Key: NOVAX_API_KEY or API_KEY
        if let Ok(key) = std::env::var("NOVAX_API_KEY").or_else(|_| std::env::var("API_KEY")) {
            if !key.is_empty() {
                self.api_key = Some(key);
            }
        }

        // Model: NOVAX_MODEL
        if let Ok(model) = std::env::var("NOVAX_MODEL") {
            if !model.is_empty() {
                self.default_model = model;
            }
        }

        // News provider keys: NOVAX_NEWS_API_KEY / NOVAX_GNEWS_API_KEY
        if let Ok(key) = std::env::var("NOVAX_NEWS_API_KEY") {
            if !key.is_empty() {
                self.news.newsapi_key = Some(key);
            }
        }
        if let Ok(key) = std::env::var("NOVAX_GNEWS_API_KEY") {
            if !key.is_empty() {
                self.news.gnews_key = Some(key);
            }
        }

        // Gateway port: NOVAX_GATEWAY_PORT or PORT
        if let Ok(port_str) =
            std::env::var("NOVAX_GATEWAY_PORT").or_else(|_| std::env::var("PORT"))
        {
            if let Ok(port) = port_str.parse::<u16>() {
                self.gateway.port = port;
            }
        }

        // Gateway host: NOVAX_GATEWAY_HOST or HOST
        if let Ok(host) = std::env::var("NOVAX_GATEWAY_HOST").or_else(|_| std::env::var("HOST")) {
            if !host.is_empty() {
                self.gateway.host = host;
            }
        }

        // Client gateway URL: NOVAX_GATEWAY_URL
        if let Ok(url) = std::env::var("NOVAX_GATEWAY_URL") {
            if !url.is_empty() {
                self.client.gateway_url = url;
            }
        }

        // Temperature: NOVAX_TEMPERATURE
        if let Ok(temp_str) = std::env::var("NOVAX_TEMPERATURE") {
            if let Ok(temp) = temp_str.parse::<f64>() {
                if (0.0..=2.0).contains(&temp) {
                    self.default_temperature = temp;
                }
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Load(format!("serialize failed: {e}")))?;
        fs::write(&self.config_path, toml_str).map_err(ConfigError::Io)?;
        Ok(())
    }
}
