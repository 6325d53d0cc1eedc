//! Runtime configuration
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 1.1.0: Added BOTANICA_RESEARCH_MODEL for recommendation and safety queries
//! - 1.0.0: Initial env-based configuration

use anyhow::{Context as _, Result};
use std::env;
use std::path::PathBuf;

/// Default model for identification, encyclopedia, tips, and chat.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default model for recommendation and safety queries, which cross-verify
/// plants against the user's medical condition and warrant the stronger tier.
pub const DEFAULT_RESEARCH_MODEL: &str = "gpt-4o";

/// Application configuration loaded from the process environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_model: String,
    pub research_model: String,
    pub data_dir: PathBuf,
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `OPENAI_API_KEY` is required; everything else has a default.
    pub fn from_env() -> Result<Self> {
        let openai_api_key = env::var("OPENAI_API_KEY")
            .context("OPENAI_API_KEY must be set (see .env.example)")?;

        let openai_model =
            env::var("BOTANICA_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let research_model = env::var("BOTANICA_RESEARCH_MODEL")
            .unwrap_or_else(|_| DEFAULT_RESEARCH_MODEL.to_string());
        let data_dir = env::var("BOTANICA_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("botanica-data"));
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Config {
            openai_api_key,
            openai_model,
            research_model,
            data_dir,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test: env vars are process-global, so the missing-key and
    // defaults cases must not run on parallel test threads.
    #[test]
    fn test_from_env() {
        env::remove_var("OPENAI_API_KEY");
        assert!(Config::from_env().is_err());

        env::set_var("OPENAI_API_KEY", "sk-test");
        env::remove_var("BOTANICA_MODEL");
        env::remove_var("BOTANICA_RESEARCH_MODEL");
        env::remove_var("BOTANICA_DATA_DIR");

        let config = Config::from_env().unwrap();
        assert_eq!(config.openai_model, DEFAULT_MODEL);
        assert_eq!(config.research_model, DEFAULT_RESEARCH_MODEL);
        assert_eq!(config.data_dir, PathBuf::from("botanica-data"));
    }
}
