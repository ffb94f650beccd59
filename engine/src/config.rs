//! Configuration loading for rota.
//!
//! Read once at startup from `~/.rota/config.toml`:
//!
//! ```toml
//! [api]
//! base_url = "https://jsonplaceholder.typicode.com/todos"
//!
//! [app]
//! ascii_only = false
//! high_contrast = false
//! ```

use serde::Deserialize;
use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

/// Reference collection used when neither the environment nor the config
/// file names one.
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com/todos";

const BASE_URL_ENV_VAR: &str = "ROTA_API_URL";

#[derive(Debug, Default, Deserialize)]
pub struct RotaConfig {
    pub api: Option<ApiSection>,
    pub app: Option<AppSection>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiSection {
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppSection {
    /// Use ASCII-only glyphs for icons and markers.
    #[serde(default)]
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

/// Presentation options resolved from the `[app]` section.
#[derive(Debug, Clone, Copy, Default)]
pub struct UiOptions {
    pub ascii_only: bool,
    pub high_contrast: bool,
}

impl RotaConfig {
    /// Canonical config location, `~/.rota/config.toml`.
    #[must_use]
    pub fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".rota").join("config.toml"))
    }

    /// Loads the config file from the canonical location.
    ///
    /// A missing file is `Ok(None)`; a malformed one is an error carrying the
    /// offending path.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = Self::path() else {
            return Ok(None);
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let config = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Some(config))
    }

    /// Collection address, in precedence order: `ROTA_API_URL`, the config
    /// file, the built-in default.
    #[must_use]
    pub fn base_url(config: Option<&Self>) -> String {
        if let Ok(url) = env::var(BASE_URL_ENV_VAR)
            && !url.trim().is_empty()
        {
            return url;
        }

        config
            .and_then(|cfg| cfg.api.as_ref())
            .and_then(|api| api.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    #[must_use]
    pub fn ui_options(config: Option<&Self>) -> UiOptions {
        let app = config.and_then(|cfg| cfg.app.as_ref());
        UiOptions {
            ascii_only: app.is_some_and(|app| app.ascii_only),
            high_contrast: app.is_some_and(|app| app.high_contrast),
        }
    }
}
