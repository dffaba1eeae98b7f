//! Configuration management for Portfolio-Smoke

use crate::{Error, Result};
use serde::Deserialize;
use std::env;

/// Default deployed target, overridable via `SMOKE_TARGET_URL`.
pub const DEFAULT_TARGET_URL: &str = "https://vivek1499-portfolio.vercel.app";

/// Suite configuration
///
/// Resolved once at startup and immutable thereafter.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SmokeConfig {
    /// Base URL of the site under test
    pub target_url: String,

    /// Chrome debugging endpoint (e.g. "http://localhost:9222")
    pub cdp_endpoint: String,

    /// Navigation timeout in milliseconds
    pub navigation_timeout_ms: u64,

    /// Interval between document.readyState polls in milliseconds
    pub poll_interval_ms: u64,

    /// Log level
    pub log_level: String,

    /// Probe predicates and thresholds
    pub tuning: ProbeTuning,
}

/// Tunable probe predicates
///
/// The keyword lists and the navigation threshold are deliberately loose
/// tunings against an evolving third-party page; they live here rather than
/// in case logic so tolerance can be adjusted without touching the cases.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProbeTuning {
    /// Substrings accepted in the document title
    pub title_keywords: Vec<String>,

    /// Tag name expected for the rendering canvas
    pub canvas_tag: String,

    /// Class-attribute marker identifying navigation elements
    pub nav_class_marker: String,

    /// Minimum number of navigation-like elements
    pub nav_min_count: usize,

    /// Keyword expected in project listing text
    pub project_keyword: String,

    /// Keywords accepted for the skills/tools section
    pub skills_keywords: Vec<String>,
}

impl Default for SmokeConfig {
    fn default() -> Self {
        Self {
            target_url: DEFAULT_TARGET_URL.to_string(),
            cdp_endpoint: "http://localhost:9222".to_string(),
            navigation_timeout_ms: 30000,
            poll_interval_ms: 100,
            log_level: "info".to_string(),
            tuning: ProbeTuning::default(),
        }
    }
}

impl Default for ProbeTuning {
    fn default() -> Self {
        Self {
            title_keywords: vec!["Vivek".to_string(), "Portfolio".to_string()],
            canvas_tag: "canvas".to_string(),
            nav_class_marker: "nav".to_string(),
            nav_min_count: 3,
            project_keyword: "Project".to_string(),
            skills_keywords: vec!["Tools".to_string(), "Skills".to_string()],
        }
    }
}

impl SmokeConfig {
    /// Load configuration from environment variables
    ///
    /// Starts from the TOML file named by `SMOKE_CONFIG` when set, otherwise
    /// from defaults, then applies `SMOKE_*` overrides.
    pub fn from_env() -> Result<Self> {
        let mut config = match env::var("SMOKE_CONFIG") {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => SmokeConfig::default(),
        };

        if let Ok(url) = env::var("SMOKE_TARGET_URL") {
            config.target_url = url;
        }

        if let Ok(endpoint) = env::var("SMOKE_CDP_ENDPOINT") {
            config.cdp_endpoint = endpoint;
        }

        if let Ok(timeout) = env::var("SMOKE_NAV_TIMEOUT_MS") {
            config.navigation_timeout_ms = timeout
                .parse()
                .map_err(|_| Error::configuration("Invalid SMOKE_NAV_TIMEOUT_MS"))?;
        }

        if let Ok(interval) = env::var("SMOKE_POLL_INTERVAL_MS") {
            config.poll_interval_ms = interval
                .parse()
                .map_err(|_| Error::configuration("Invalid SMOKE_POLL_INTERVAL_MS"))?;
        }

        if let Ok(log_level) = env::var("SMOKE_LOG_LEVEL") {
            config.log_level = log_level;
        }

        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::configuration(format!("Failed to read config file: {}", e)))?;

        let config: SmokeConfig = toml::from_str(&content)
            .map_err(|e| Error::configuration(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SmokeConfig::default();
        assert_eq!(config.target_url, DEFAULT_TARGET_URL);
        assert_eq!(config.navigation_timeout_ms, 30000);
        assert_eq!(config.tuning.nav_min_count, 3);
        assert_eq!(config.tuning.title_keywords, vec!["Vivek", "Portfolio"]);
        assert_eq!(config.tuning.skills_keywords, vec!["Tools", "Skills"]);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            target_url = "https://staging.example.com"
            navigation_timeout_ms = 5000

            [tuning]
            nav_min_count = 5
            project_keyword = "Work"
        "#;

        let config: SmokeConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.target_url, "https://staging.example.com");
        assert_eq!(config.navigation_timeout_ms, 5000);
        assert_eq!(config.tuning.nav_min_count, 5);
        assert_eq!(config.tuning.project_keyword, "Work");
        // Unspecified fields keep their defaults
        assert_eq!(config.tuning.canvas_tag, "canvas");
        assert_eq!(config.poll_interval_ms, 100);
    }

    #[test]
    fn test_partial_tuning_defaults() {
        let config: SmokeConfig = toml::from_str("").unwrap();
        assert_eq!(config.tuning.nav_class_marker, "nav");
    }
}
