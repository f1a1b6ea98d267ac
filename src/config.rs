use std::path::{Path, PathBuf};

use eyre::Result;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::summarize::DEFAULT_MODEL;

/// Environment variable holding the Gemini API key
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

pub const DEFAULT_LANG: &str = "en";

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub default_lang: Option<String>,
    pub default_model: Option<String>,
}

impl Config {
    /// Load config from ~/.config/ytnotes/config.toml if it exists
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }

    /// API key from the environment, else from the config file
    pub fn api_key(&self) -> Option<String> {
        resolve_api_key(std::env::var(API_KEY_ENV).ok(), self.api_key.as_deref())
    }

    pub fn lang(&self, flag: Option<&str>) -> String {
        flag.or(self.default_lang.as_deref())
            .unwrap_or(DEFAULT_LANG)
            .to_string()
    }

    pub fn model(&self, flag: Option<&str>) -> String {
        flag.or(self.default_model.as_deref())
            .unwrap_or(DEFAULT_MODEL)
            .to_string()
    }
}

fn resolve_api_key(env: Option<String>, file: Option<&str>) -> Option<String> {
    env.or_else(|| file.map(str::to_string))
        .filter(|key| !key.trim().is_empty())
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("ytnotes")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
api_key = "AIzaSyTest"
default_lang = "es"
default_model = "gemini-1.5-flash"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("AIzaSyTest"));
        assert_eq!(config.default_lang.as_deref(), Some("es"));
        assert_eq!(config.default_model.as_deref(), Some("gemini-1.5-flash"));
    }

    #[test]
    fn test_parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.api_key.is_none());
        assert!(config.default_lang.is_none());
        assert!(config.default_model.is_none());
    }

    #[test]
    fn test_parse_partial_config() {
        let config: Config = toml::from_str(r#"default_lang = "fr""#).unwrap();
        assert_eq!(config.default_lang.as_deref(), Some("fr"));
        assert!(config.default_model.is_none());
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let config = Config::load_from(Path::new("/nonexistent/ytnotes/config.toml")).unwrap();
        assert!(config.default_lang.is_none());
    }

    #[test]
    fn test_flag_beats_config_beats_default() {
        let config: Config = toml::from_str(r#"default_model = "gemini-1.5-pro""#).unwrap();
        assert_eq!(config.model(Some("gemini-2.0-flash")), "gemini-2.0-flash");
        assert_eq!(config.model(None), "gemini-1.5-pro");
        assert_eq!(config.lang(None), DEFAULT_LANG);
        assert_eq!(Config::default().model(None), DEFAULT_MODEL);
    }

    #[test]
    fn test_env_key_beats_file_key() {
        assert_eq!(
            resolve_api_key(Some("from-env".to_string()), Some("from-file")).as_deref(),
            Some("from-env")
        );
        assert_eq!(resolve_api_key(None, Some("from-file")).as_deref(), Some("from-file"));
        assert_eq!(resolve_api_key(None, Some("  ")), None);
        assert_eq!(resolve_api_key(None, None), None);
    }
}
