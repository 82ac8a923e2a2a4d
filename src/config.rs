//! Application-level configuration loading: database location, listening port
//! and the genres and platforms seeded at startup.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

use crate::state::session::DEFAULT_SESSION_TTL;

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "GAME_CATALOG_CONFIG_PATH";
const DEFAULT_DATABASE_URL: &str = "sqlite://data/catalog.db";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// `sqlite:` URL of the catalog database.
    pub database_url: String,
    /// TCP port the HTTP server listens on.
    pub port: u16,
    /// Seconds a session (and its forgery token) stays valid after being opened.
    pub session_ttl_secs: u64,
    /// Genres and platforms seeded at startup.
    pub reference_data: ReferenceData,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
/// Genres and platforms inserted when missing; existing rows are left alone.
pub struct ReferenceData {
    /// Genre names.
    #[serde(default = "default_genres")]
    pub genres: Vec<String>,
    /// Platform names.
    #[serde(default = "default_platforms")]
    pub platforms: Vec<String>,
}

impl AppConfig {
    /// Load the configuration from disk, then apply environment overrides.
    ///
    /// A missing or unreadable file falls back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        let config = match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(config) => {
                    info!(
                        path = %path.display(),
                        genres = config.reference_data.genres.len(),
                        platforms = config.reference_data.platforms.len(),
                        "loaded configuration"
                    );
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        };

        config.with_overrides(
            env::var("DATABASE_URL").ok(),
            env::var("PORT").or_else(|_| env::var("SERVER_PORT")).ok(),
        )
    }

    /// Lifetime of a session.
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    fn from_json(contents: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<RawConfig>(contents).map(Into::into)
    }

    /// Environment values win over the file. Unparsable ports are ignored.
    fn with_overrides(mut self, database_url: Option<String>, port: Option<String>) -> Self {
        if let Some(url) = database_url.filter(|url| !url.trim().is_empty()) {
            self.database_url = url;
        }
        match port.map(|value| value.parse::<u16>()) {
            Some(Ok(port)) => self.port = port,
            Some(Err(err)) => warn!(error = %err, "ignoring invalid port override"),
            None => {}
        }
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.into(),
            port: DEFAULT_PORT,
            session_ttl_secs: DEFAULT_SESSION_TTL.as_secs(),
            reference_data: ReferenceData::default(),
        }
    }
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self {
            genres: default_genres(),
            platforms: default_platforms(),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    database_url: Option<String>,
    port: Option<u16>,
    session_ttl_secs: Option<u64>,
    #[serde(default)]
    reference_data: ReferenceData,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        Self {
            database_url: value
                .database_url
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            port: value.port.unwrap_or(DEFAULT_PORT),
            session_ttl_secs: value
                .session_ttl_secs
                .unwrap_or(DEFAULT_SESSION_TTL.as_secs()),
            reference_data: value.reference_data,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

fn default_genres() -> Vec<String> {
    ["Action", "Adventure", "RPG", "Strategy", "Sports", "Puzzle"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_platforms() -> Vec<String> {
    ["PC", "PlayStation", "Xbox", "Nintendo Switch", "SNES"]
        .into_iter()
        .map(String::from)
        .collect()
}
