use anyhow::{Context, Result};
use std::env;

use super::scoring::{ScoringConfig, ScoringProfile};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub log_level: String,
    /// Optional TOML file with the scoring configuration
    pub scoring_config_path: Option<String>,
    /// Overrides the profile from the scoring configuration
    pub scoring_profile: Option<ScoringProfile>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .unwrap_or(3000);
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let scoring_config_path = env::var("SCORING_CONFIG").ok();
        let scoring_profile = match env::var("SCORING_PROFILE") {
            Ok(value) => Some(value.parse().map_err(anyhow::Error::msg)?),
            Err(_) => None,
        };

        Ok(AppConfig {
            host,
            port,
            environment,
            log_level,
            scoring_config_path,
            scoring_profile,
        })
    }

    /// Build the scoring configuration: file if given, defaults otherwise, then the profile override
    pub fn scoring_config(&self) -> Result<ScoringConfig> {
        let mut config = match &self.scoring_config_path {
            Some(path) => ScoringConfig::from_file(path)
                .with_context(|| format!("Failed to load scoring config from {}", path))?,
            None => ScoringConfig::default(),
        };

        if let Some(profile) = self.scoring_profile {
            config.profile = profile;
            config
                .validate()
                .context("Scoring config invalid after profile override")?;
        }

        Ok(config)
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
