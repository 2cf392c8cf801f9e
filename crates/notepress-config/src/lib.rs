use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

pub const DEFAULT_SESSION_FILE: &str = "session.json";
pub const DEFAULT_TOC_LABEL: &str = "目次";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Account name as it appears in `https://note.com/<user_urlname>`.
    pub user_urlname: String,

    /// Saved login cookies, see `notepress_client::Session`.
    #[serde(default = "default_session_file")]
    pub session_file: PathBuf,

    /// Overrides the browser User-Agent sent with every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Heading placed above a `<toc>` block.
    #[serde(default = "default_toc_label")]
    pub toc_label: String,
}

fn default_session_file() -> PathBuf {
    PathBuf::from(DEFAULT_SESSION_FILE)
}

fn default_toc_label() -> String {
    DEFAULT_TOC_LABEL.to_string()
}

impl Config {
    pub fn new(user_urlname: impl Into<String>) -> Self {
        Self {
            user_urlname: user_urlname.into(),
            session_file: default_session_file(),
            user_agent: None,
            toc_label: default_toc_label(),
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the session path
        config.session_file =
            Self::expand_path(&config.session_file).unwrap_or(config.session_file);

        Ok(Some(config))
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/notepress");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/notepress/config.toml"));
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: Config = toml::from_str(r#"user_urlname = "alice""#).unwrap();

        assert_eq!(config, Config::new("alice"));
        assert_eq!(config.session_file, PathBuf::from("session.json"));
        assert_eq!(config.toc_label, "目次");
        assert_eq!(config.user_agent, None);
    }

    #[test]
    fn test_missing_user_urlname_is_a_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "toc_label = \"Contents\"\n").unwrap();

        let result = Config::load_from_path(&config_file);

        assert!(matches!(result, Err(ConfigError::ConfigParseError { .. })));
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let path = PathBuf::from("~/notes/session.json");
        let expanded = Config::expand_path(&path).unwrap();

        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().ends_with("notes/session.json"));
    }

    #[test]
    fn test_expand_path_with_env_var() {
        unsafe {
            env::set_var("NOTEPRESS_TEST_STATE", "/state");
        }

        let path = PathBuf::from("$NOTEPRESS_TEST_STATE/session.json");
        let expanded = Config::expand_path(&path).unwrap();

        assert_eq!(expanded, PathBuf::from("/state/session.json"));

        unsafe {
            env::remove_var("NOTEPRESS_TEST_STATE");
        }
    }

    #[test]
    fn test_expand_path_with_relative_path() {
        let path = PathBuf::from("session.json");
        assert_eq!(Config::expand_path(&path).unwrap(), path);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let mut test_config = Config::new("alice");
        test_config.session_file = PathBuf::from("/tmp/notepress/session.json");
        test_config.user_agent = Some("notepress-test".to_string());
        test_config.toc_label = "Contents".to_string();

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_session_file_with_tilde_in_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_file,
            "user_urlname = \"alice\"\nsession_file = \"~/.notepress/session.json\"\n",
        )
        .unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();

        let session = config.session_file.to_string_lossy();
        assert!(!session.starts_with('~'));
        assert!(session.ends_with(".notepress/session.json"));
    }
}
