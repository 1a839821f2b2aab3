use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::patch_key::KeyScheme;

pub const DEFAULT_BASE_DIR: &str = "/data/GoldHEN";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_dir: PathBuf,
    /// Prefix of the notification shown after a patch is switched on.
    pub enabled_message: String,
    pub disabled_message: String,
    pub key_scheme: KeyScheme,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_dir: PathBuf::from(DEFAULT_BASE_DIR),
            enabled_message: "Enabled".to_owned(),
            disabled_message: "Disabled".to_owned(),
            key_scheme: KeyScheme::Djb2,
        }
    }
}

impl Config {
    fn load_path(path: &Path) -> Result<Config> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open config: {}", path.display()))?;
        serde_json::from_reader(std::io::BufReader::new(file))
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Load from `path` if given. A config that cannot be loaded falls back to defaults.
    pub fn load(path: Option<&Path>) -> Config {
        let Some(path) = path else {
            return Config::default();
        };

        Self::load_path(path).unwrap_or_else(|err| {
            log::error!("Failed to load config: {:#}", err);
            log::info!("Using default values instead.");
            Config::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"base_dir": "/tmp/goldhen", "key_scheme": "wide"}"#).unwrap();
        assert_eq!(config.base_dir, PathBuf::from("/tmp/goldhen"));
        assert_eq!(config.key_scheme, KeyScheme::Wide);
        assert_eq!(config.enabled_message, "Enabled");
    }

    #[test]
    fn test_missing_file_falls_back() {
        let path = std::env::temp_dir().join("patchstate_config_missing/none.json");
        assert_eq!(Config::load(Some(&path)), Config::default());
        assert_eq!(Config::load(None), Config::default());
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let dir = std::env::temp_dir().join("patchstate_config_malformed");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        fs::write(&path, b"{ not json").unwrap();

        assert_eq!(Config::load(Some(&path)), Config::default());
        let _ = fs::remove_dir_all(&dir);
    }
}
