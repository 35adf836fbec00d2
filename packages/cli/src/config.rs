use crate::error::CliError;
use critic_editor::EditorMode;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_NAME: &str = "critic.config.json";

/// Critic configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Name written into new suggestions and comments
    #[serde(default)]
    pub author_name: String,

    /// Mode commands run in unless `--mode` says otherwise
    #[serde(default)]
    pub default_mode: EditorMode,

    /// Strip markup from text handed to the clipboard
    #[serde(default = "default_clipboard_cleanup")]
    pub clipboard_cleanup: bool,
}

fn default_clipboard_cleanup() -> bool {
    true
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> Result<Self, CliError> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if !config_path.exists() {
            // Return default config if none exists
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        serde_json::from_str(&content).map_err(|source| CliError::Config {
            path: config_path,
            source,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            author_name: String::new(),
            default_mode: EditorMode::Editing,
            clipboard_cleanup: default_clipboard_cleanup(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "authorName": "Bo",
            "defaultMode": "suggesting",
            "clipboardCleanup": false
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.author_name, "Bo");
        assert_eq!(config.default_mode, EditorMode::Suggesting);
        assert!(!config.clipboard_cleanup);
    }

    #[test]
    fn test_default_config() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.clipboard_cleanup);
        assert_eq!(config.default_mode, EditorMode::Editing);
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load(dir.path()).unwrap(), Config::default());

        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), r#"{"authorName":"Al"}"#).unwrap();
        assert_eq!(Config::load(dir.path()).unwrap().author_name, "Al");

        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), "{ nope").unwrap();
        assert!(matches!(Config::load(dir.path()), Err(CliError::Config { .. })));
    }
}
