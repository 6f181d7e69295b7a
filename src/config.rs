use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub ai: AiSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Tenant blob store; no Redis URL means records live in process memory
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreSettings {
    pub redis_url: Option<String>,
    pub l1_cache_size: Option<u64>,
    pub l1_ttl_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSettings {
    pub ranking_capacity: Option<u64>,
    pub ranking_ttl_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AiSettings {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_ai_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_ai_model")]
    pub model: String,
    #[serde(default = "default_ai_timeout")]
    pub timeout_secs: u64,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_ai_endpoint(),
            model: default_ai_model(),
            timeout_secs: default_ai_timeout(),
        }
    }
}

fn default_ai_endpoint() -> String { "https://generativelanguage.googleapis.com".to_string() }
fn default_ai_model() -> String { "gemini-3-flash-preview".to_string() }
fn default_ai_timeout() -> u64 { 30 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchingSettings {
    pub default_limit: Option<u16>,
    pub max_limit: Option<u16>,
    pub min_score: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_budget_weight")]
    pub budget: u32,
    #[serde(default = "default_under_budget_credit")]
    pub under_budget: u32,
    #[serde(default = "default_area_weight")]
    pub area: u32,
    #[serde(default = "default_area_fallback_credit")]
    pub area_fallback: u32,
    #[serde(default = "default_bhk_weight")]
    pub bhk: u32,
    #[serde(default = "default_furnishing_weight")]
    pub furnishing: u32,
    #[serde(default = "default_lifestyle_weight")]
    pub lifestyle: u32,
    #[serde(default = "default_availability_weight")]
    pub availability: u32,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            budget: default_budget_weight(),
            under_budget: default_under_budget_credit(),
            area: default_area_weight(),
            area_fallback: default_area_fallback_credit(),
            bhk: default_bhk_weight(),
            furnishing: default_furnishing_weight(),
            lifestyle: default_lifestyle_weight(),
            availability: default_availability_weight(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            budget: config.budget,
            under_budget: config.under_budget,
            area: config.area,
            area_fallback: config.area_fallback,
            bhk: config.bhk,
            furnishing: config.furnishing,
            lifestyle: config.lifestyle,
            availability: config.availability,
        }
    }
}

fn default_budget_weight() -> u32 { 30 }
fn default_under_budget_credit() -> u32 { 20 }
fn default_area_weight() -> u32 { 25 }
fn default_area_fallback_credit() -> u32 { 10 }
fn default_bhk_weight() -> u32 { 15 }
fn default_furnishing_weight() -> u32 { 10 }
fn default_lifestyle_weight() -> u32 { 10 }
fn default_availability_weight() -> u32 { 10 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with PROPMATE_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., PROPMATE__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("PROPMATE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("PROPMATE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn scoring_weights(&self) -> ScoringWeights {
        ScoringWeights::from(&self.scoring.weights)
    }
}

/// Apply the conventional unprefixed variables on top of the layered config
///
/// `REDIS_URL` selects the store backend and `GEMINI_API_KEY` (or `API_KEY`)
/// enables remote pitch generation.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let redis_url = env::var("REDIS_URL").ok();
    let api_key = env::var("GEMINI_API_KEY").or_else(|_| env::var("API_KEY")).ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(url) = redis_url {
        builder = builder.set_override("store.redis_url", url)?;
    }
    if let Some(key) = api_key {
        builder = builder.set_override("ai.api_key", key)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.budget, 30);
        assert_eq!(weights.under_budget, 20);
        assert_eq!(weights.area, 25);
        assert_eq!(weights.area_fallback, 10);
        assert_eq!(weights.bhk, 15);
        assert_eq!(weights.furnishing, 10);
        assert_eq!(weights.lifestyle, 10);
        assert_eq!(weights.availability, 10);
        assert_eq!(ScoringWeights::from(&weights), ScoringWeights::default());
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_partial_weights_table() {
        let weights: WeightsConfig = toml::from_str("under_budget = 15").unwrap();
        assert_eq!(weights.under_budget, 15);
        assert_eq!(weights.budget, 30);
    }

    #[test]
    fn test_shipped_default_config_parses() {
        let settings: Settings = toml::from_str(include_str!("../config/default.toml")).unwrap();
        assert_eq!(settings.server.port, 8080);
        assert!(settings.scoring_weights().validate().is_ok());
        assert!(settings.store.redis_url.is_none());
    }
}
