use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::engine::AnalysisParams;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum retained outcomes; older ones are evicted
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// Outcomes required before the engine runs
    #[serde(default = "default_min_history")]
    pub min_history: usize,
    /// Trailing window scored by the risk classifier
    #[serde(default = "default_analysis_window")]
    pub analysis_window: usize,
    /// Use per-rule adaptive weights in the predictor
    #[serde(default = "default_adaptive")]
    pub adaptive: bool,
}

fn default_capacity() -> usize {
    100
}
fn default_min_history() -> usize {
    3
}
fn default_analysis_window() -> usize {
    27
}
fn default_adaptive() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            min_history: default_min_history(),
            analysis_window: default_analysis_window(),
            adaptive: default_adaptive(),
        }
    }
}

impl SessionConfig {
    pub fn analysis_params(&self) -> AnalysisParams {
        AnalysisParams {
            min_history: self.min_history,
            analysis_window: self.analysis_window,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address for `cadence serve`
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum concurrently open sessions
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}
fn default_max_sessions() -> usize {
    1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_sessions: default_max_sessions(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from a directory, then the environment
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("CADENCE_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (CADENCE__SESSION__CAPACITY, etc.)
            .add_source(
                Environment::with_prefix("CADENCE")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !(20..=1000).contains(&self.session.capacity) {
            errors.push(format!(
                "session.capacity must be between 20 and 1000 (got {})",
                self.session.capacity
            ));
        }

        if !(2..=9).contains(&self.session.min_history) {
            errors.push(format!(
                "session.min_history must be between 2 and 9 (got {})",
                self.session.min_history
            ));
        }

        if self.session.analysis_window < self.session.min_history {
            errors.push("session.analysis_window must be at least session.min_history".to_string());
        }

        if self.session.analysis_window > self.session.capacity {
            errors.push("session.analysis_window cannot exceed session.capacity".to_string());
        }

        if self.server.max_sessions == 0 {
            errors.push("server.max_sessions must be positive".to_string());
        }

        if self.server.bind.parse::<std::net::SocketAddr>().is_err() {
            errors.push(format!("server.bind is not a socket address: {}", self.server.bind));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = AppConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.session.capacity, 100);
        assert_eq!(cfg.session.analysis_params().analysis_window, 27);
    }

    #[test]
    fn validate_collects_every_violation() {
        let mut cfg = AppConfig::default();
        cfg.session.capacity = 5;
        cfg.session.min_history = 12;
        cfg.server.bind = "nowhere".to_string();
        let errors = cfg.validate().unwrap_err();
        assert_eq!(errors.len(), 4, "{errors:?}");
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: AppConfig = toml::from_str("[session]\ncapacity = 40\n").unwrap();
        assert_eq!(cfg.session.capacity, 40);
        assert_eq!(cfg.session.min_history, 3);
        assert!(cfg.session.adaptive);
        assert_eq!(cfg.server.bind, "127.0.0.1:8080");
    }
}
