use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::client::DEFAULT_BASE_URL;
use crate::error::{AdminError, Result};
use crate::pagination::{check_rows_per_page, DEFAULT_ROWS_PER_PAGE};

pub const BASE_URL_ENV: &str = "USERADMIN_BASE_URL";

#[derive(Serialize, Deserialize, Default, Debug, PartialEq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows_per_page: Option<u32>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents =
            std::fs::read_to_string(config_path).map_err(|e| AdminError::ConfigRead {
                path: config_path.to_path_buf(),
                source: e,
            })?;

        toml::from_str(&contents).map_err(|e| AdminError::ConfigParse {
            path: config_path.to_path_buf(),
            source: e,
        })
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        let write_err = |e| AdminError::ConfigSave {
            path: config_path.to_path_buf(),
            source: e,
        };
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }

        let contents = toml::to_string(self)?;
        std::fs::write(config_path, contents).map_err(write_err)
    }

    pub fn config_path() -> Result<PathBuf> {
        ProjectDirs::from("", "", "useradmin")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or(AdminError::NoConfigDir)
    }

    /// Service base URL with env var taking precedence over config file
    pub fn base_url(&self) -> Result<Url> {
        let raw = std::env::var(BASE_URL_ENV)
            .ok()
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Url::parse(&raw).map_err(|e| AdminError::InvalidUrl(format!("{raw}: {e}")))
    }

    /// Rows per page, preferring an explicit argument over the configured value
    pub fn resolve_rows_per_page(&self, explicit: Option<u32>) -> Result<u32> {
        let rows = explicit
            .or(self.rows_per_page)
            .unwrap_or(DEFAULT_ROWS_PER_PAGE);
        check_rows_per_page(rows)?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.resolve_rows_per_page(None).unwrap(), 5);
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("useradmin").join("config.toml");
        let config = Config {
            base_url: Some("http://localhost:8080".to_string()),
            rows_per_page: Some(10),
        };

        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();

        assert_eq!(loaded, config);
        assert_eq!(loaded.resolve_rows_per_page(None).unwrap(), 10);
        assert_eq!(loaded.resolve_rows_per_page(Some(15)).unwrap(), 15);
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "rows_per_page = \"many\"").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(AdminError::ConfigParse { .. })
        ));
    }

    #[test]
    fn unwritable_location_is_a_save_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let result = Config::default().save_to(&blocker.join("config.toml"));

        assert!(
            matches!(&result, Err(AdminError::ConfigSave { .. })),
            "expected ConfigSave, got: {result:?}"
        );
    }

    #[test]
    fn rows_per_page_must_be_an_option() {
        let config = Config {
            rows_per_page: Some(7),
            ..Config::default()
        };
        assert!(matches!(
            config.resolve_rows_per_page(None),
            Err(AdminError::InvalidPageSize(7))
        ));
    }

    #[test]
    fn base_url_from_file() {
        // Only meaningful when the override is not set in the test environment.
        if std::env::var(BASE_URL_ENV).is_ok() {
            return;
        }
        let config = Config {
            base_url: Some("http://localhost:8080/api".to_string()),
            ..Config::default()
        };
        assert_eq!(config.base_url().unwrap().as_str(), "http://localhost:8080/api");
        assert_eq!(
            Config::default().base_url().unwrap().as_str(),
            "https://dummyjson.com/"
        );

        let broken = Config {
            base_url: Some("not a url".to_string()),
            ..Config::default()
        };
        assert!(matches!(broken.base_url(), Err(AdminError::InvalidUrl(_))));
    }
}
