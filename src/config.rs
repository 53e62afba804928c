//! Configuration loading from TOML with environment variable resolution.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Every section is optional and falls back to defaults. Secrets (the
//! odds API key) are referenced by env-var name in the config and
//! resolved at runtime via `std::env::var`.

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::fs;

use crate::data::odds_api::DEFAULT_BASE_URL;
use crate::engine::selector::SelectorConfig;
use crate::estimator::{ConstantEstimator, ImpliedProbabilityEstimator, ProbabilityEstimator};
use crate::types::ParlayError;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub selection: SelectorConfig,
    #[serde(default)]
    pub estimator: EstimatorConfig,
    #[serde(default)]
    pub odds_api: OddsApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EstimatorKind {
    #[default]
    Constant,
    Implied,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EstimatorConfig {
    #[serde(default)]
    pub kind: EstimatorKind,
    /// Used by the constant estimator.
    #[serde(default = "default_probability")]
    pub probability: f64,
}

fn default_probability() -> f64 {
    ConstantEstimator::DEFAULT_PROBABILITY
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            kind: EstimatorKind::default(),
            probability: default_probability(),
        }
    }
}

impl EstimatorConfig {
    pub fn build(&self) -> Box<dyn ProbabilityEstimator> {
        match self.kind {
            EstimatorKind::Constant => Box::new(ConstantEstimator::new(self.probability)),
            EstimatorKind::Implied => Box::new(ImpliedProbabilityEstimator),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OddsApiConfig {
    pub base_url: String,
    pub api_key_env: String,
    pub regions: String,
    pub markets: String,
    pub sports: Vec<String>,
    pub bookmakers: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for OddsApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_env: "ODDS_API_KEY".to_string(),
            regions: "us".to_string(),
            markets: "h2h".to_string(),
            sports: [
                "basketball_nba",
                "americanfootball_nfl",
                "baseball_mlb",
                "mma_mixed_martial_arts",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            bookmakers: vec!["draftkings".to_string(), "fanduel".to_string()],
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub database_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://parlays.db".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ScheduleConfig {
    pub interval_hours: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self { interval_hours: 24 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HistoryConfig {
    pub limit: u32,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { limit: 10 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DashboardConfig {
    pub enabled: bool,
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: 8080,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::from_toml(&contents).with_context(|| format!("Invalid config file: {path}"))
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<(), ParlayError> {
        self.selection.validate()?;

        if self.estimator.kind == EstimatorKind::Constant
            && !(self.estimator.probability > 0.0 && self.estimator.probability <= 1.0)
        {
            return Err(ParlayError::Config(format!(
                "estimator.probability must be in (0, 1], got {}",
                self.estimator.probability
            )));
        }
        if self.odds_api.bookmakers.is_empty() {
            return Err(ParlayError::Config("odds_api.bookmakers is empty".into()));
        }
        if self.schedule.interval_hours == 0 {
            return Err(ParlayError::Config("schedule.interval_hours must be at least 1".into()));
        }
        Ok(())
    }

    /// Resolve an environment variable name to its value.
    /// Useful for loading secrets referenced in the config.
    pub fn resolve_env(env_name: &str) -> Result<String> {
        std::env::var(env_name)
            .with_context(|| format!("Environment variable not set: {env_name}"))
    }

    /// The odds API key, read from the configured env var.
    pub fn odds_api_key(&self) -> Result<SecretString> {
        Self::resolve_env(&self.odds_api.api_key_env).map(SecretString::new)
    }
}
