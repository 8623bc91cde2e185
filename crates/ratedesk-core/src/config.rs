//! Configuration loading and persistence.
//!
//! The config file lives at `$RATEDESK_HOME/config.toml`. Missing keys fall
//! back to defaults, and edits made through [`Config::save_base_url_to`]
//! keep user comments by merging into the embedded template.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable that overrides `api.base_url`.
pub const API_URL_ENV: &str = "RATEDESK_API_URL";

const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("default_config.toml");

/// Returns the commented template written by `config init`.
pub fn default_config_template() -> &'static str {
    DEFAULT_CONFIG_TEMPLATE
}

pub mod paths {
    //! Path resolution for ratedesk configuration and data files.
    //!
    //! RATEDESK_HOME resolution order:
    //! 1. RATEDESK_HOME environment variable (if set)
    //! 2. ~/.config/ratedesk (default)
    //! 3. ./.ratedesk when no home directory can be determined

    use std::path::PathBuf;

    pub const HOME_ENV: &str = "RATEDESK_HOME";

    /// Returns the ratedesk home directory.
    pub fn ratedesk_home() -> PathBuf {
        if let Ok(home) = std::env::var(HOME_ENV)
            && !home.trim().is_empty()
        {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".ratedesk"),
            |h| h.join(".config").join("ratedesk"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        ratedesk_home().join("config.toml")
    }

    /// Returns the path to the persisted session.
    pub fn session_path() -> PathBuf {
        ratedesk_home().join("session.json")
    }

    /// Returns the directory that holds TUI log files.
    pub fn log_dir() -> PathBuf {
        ratedesk_home().join("logs")
    }
}

/// REST API settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL including the `/api` prefix. There is no built-in default.
    pub base_url: Option<String>,
    /// Per-request timeout in seconds (0 = no timeout).
    pub request_timeout_secs: u32,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub file: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: true,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub log: LogConfig,
}

impl Config {
    /// Loads configuration from the default path.
    /// Returns defaults if the file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Resolves the API base URL: `RATEDESK_API_URL` > `api.base_url`.
    ///
    /// # Errors
    /// Returns an error if neither source is set or the value is not a URL.
    pub fn resolve_base_url(&self) -> Result<String> {
        let env_url = std::env::var(API_URL_ENV).ok();
        resolve_base_url(env_url.as_deref(), self.api.base_url.as_deref())
    }

    /// Request timeout, or `None` when disabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.api.request_timeout_secs > 0)
            .then(|| Duration::from_secs(u64::from(self.api.request_timeout_secs)))
    }

    /// Creates a config file with the default template.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Saves only `api.base_url` to a specific config file path.
    ///
    /// Creates the file with default template if it doesn't exist.
    /// If file exists, merges user values into the latest template.
    ///
    /// # Errors
    /// Returns an error if the URL is invalid or the file cannot be written.
    pub fn save_base_url_to(path: &Path, base_url: &str) -> Result<()> {
        use toml_edit::{DocumentMut, value};

        let base_url = base_url.trim();
        validate_url(base_url)?;

        let contents = if path.exists() {
            let user_config = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            merge_with_template(&user_config)?
        } else {
            default_config_template().to_string()
        };

        let mut doc: DocumentMut = contents
            .parse()
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        doc["api"]["base_url"] = value(base_url);

        Self::write_config(path, &doc.to_string())
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;
        Ok(())
    }
}

/// Picks the first non-blank candidate (env first) and validates it.
///
/// # Errors
/// Returns an error if no candidate is set or the chosen value is not a URL.
pub fn resolve_base_url(env_url: Option<&str>, config_url: Option<&str>) -> Result<String> {
    let chosen = [env_url, config_url]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|candidate| !candidate.is_empty());

    let Some(url) = chosen else {
        anyhow::bail!(
            "No API base URL configured. Set {API_URL_ENV} or run `ratedesk config set-url <URL>`."
        );
    };

    validate_url(url)?;
    Ok(url.trim_end_matches('/').to_string())
}

fn validate_url(url: &str) -> Result<()> {
    let parsed = url::Url::parse(url).with_context(|| format!("Invalid API base URL: {url}"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("Invalid API base URL: {url} (expected http or https)");
    }
    Ok(())
}

fn merge_with_template(user_config: &str) -> Result<String> {
    use toml_edit::DocumentMut;

    let mut doc: DocumentMut = default_config_template()
        .parse()
        .context("Failed to parse default config template")?;
    let user_doc: DocumentMut = user_config.parse().context("Failed to parse user config")?;

    merge_items(doc.as_table_mut(), user_doc.as_table());

    Ok(doc.to_string())
}

/// Recursively overlays `source` onto `target`.
fn merge_items(target: &mut toml_edit::Table, source: &toml_edit::Table) {
    use toml_edit::Item;

    for (key, value) in source {
        match value {
            Item::Value(v) => {
                target[key] = Item::Value(v.clone());
            }
            Item::Table(src_table) => {
                if let Some(Item::Table(target_table)) = target.get_mut(key) {
                    merge_items(target_table, src_table);
                } else {
                    target[key] = Item::Table(src_table.clone());
                }
            }
            Item::ArrayOfTables(src_arr) => {
                target[key] = Item::ArrayOfTables(src_arr.clone());
            }
            Item::None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.log.level, "info");
        assert!(config.api.base_url.is_none());
    }

    #[test]
    fn test_load_partial_file_merges_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api]\nbase_url = \"http://api.test/api\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.api.base_url.as_deref(), Some("http://api.test/api"));
        assert_eq!(config.api.request_timeout_secs, 0);
        assert!(config.log.file);
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api\nbase_url = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config"));
    }

    #[test]
    fn test_template_parses_to_defaults() {
        let parsed: Config = toml::from_str(default_config_template()).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_init_refuses_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        Config::init(&path).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("[api]"));

        let err = Config::init(&path).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_save_base_url_preserves_user_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "# mine\n[log]\nlevel = \"debug\"\n").unwrap();

        Config::save_base_url_to(&path, "https://ratings.example.com/api").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(
            config.api.base_url.as_deref(),
            Some("https://ratings.example.com/api")
        );
        assert_eq!(config.log.level, "debug");
        assert!(!path.with_extension("toml.tmp").exists());
    }

    #[test]
    fn test_save_base_url_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        assert!(Config::save_base_url_to(&path, "not a url").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_resolve_base_url_prefers_env() {
        let url = resolve_base_url(Some("http://env.test/api/"), Some("http://cfg.test/api"));
        assert_eq!(url.unwrap(), "http://env.test/api");
    }

    #[test]
    fn test_resolve_base_url_skips_blank_env() {
        let url = resolve_base_url(Some("   "), Some("http://cfg.test/api"));
        assert_eq!(url.unwrap(), "http://cfg.test/api");
    }

    #[test]
    fn test_resolve_base_url_requires_a_value() {
        let err = resolve_base_url(None, None).unwrap_err();
        assert!(err.to_string().contains(API_URL_ENV));
    }

    #[test]
    fn test_resolve_base_url_rejects_non_http() {
        assert!(resolve_base_url(None, Some("ftp://files.test")).is_err());
    }

    #[test]
    fn test_request_timeout_zero_disables() {
        let mut config = Config::default();
        assert!(config.request_timeout().is_none());

        config.api.request_timeout_secs = 15;
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(15)));
    }
}
