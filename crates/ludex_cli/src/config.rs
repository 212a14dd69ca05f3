//! Configuration file support for the ludex CLI.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. Environment variables (prefixed with `LUDEX_`, e.g., `LUDEX_DATABASE_URL`)
//! 2. Config file (~/.config/ludex/config.toml or ./ludex.toml)
//! 3. Built-in defaults
//!
//! The database URL defaults to `sqlite://~/.local/state/ludex/ludex.db`
//! (the XDG state directory) if not explicitly configured.
//!
//! Example config file:
//! ```toml
//! [database]
//! url = "sqlite://~/.local/state/ludex/ludex.db"  # optional, this is the default
//!
//! [rawg]
//! api_key = "..."          # or LUDEX_RAWG_API_KEY
//!
//! [igdb]
//! client_id = "..."        # or LUDEX_IGDB_CLIENT_ID
//! client_secret = "..."    # or LUDEX_IGDB_CLIENT_SECRET
//!
//! [twitch]
//! client_id = "..."        # or LUDEX_TWITCH_CLIENT_ID
//! client_secret = "..."    # or LUDEX_TWITCH_CLIENT_SECRET
//! ```

use std::path::PathBuf;

use config::{Config as ConfigBuilder, File, FileFormat};
use directories::ProjectDirs;
use serde::Deserialize;

use ludex::sync::SourceCredentials;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// RAWG configuration.
    pub rawg: RawgConfig,
    /// IGDB configuration.
    pub igdb: OAuthClientConfig,
    /// Twitch configuration.
    pub twitch: OAuthClientConfig,
}

/// Database configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database connection URL. Supports sqlite:// and postgres://
    /// schemes. Defaults to a SQLite file in the XDG state directory.
    pub url: Option<String>,
}

/// RAWG configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawgConfig {
    /// RAWG API key.
    pub api_key: Option<String>,
}

/// Client-credentials pair for IGDB/Twitch.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OAuthClientConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

impl Config {
    /// Load configuration from files and environment.
    pub fn load() -> anyhow::Result<Self> {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = Self::config_file_path() {
            builder = builder.add_source(
                File::from(path).format(FileFormat::Toml).required(false),
            );
        }
        builder = builder.add_source(
            File::new("ludex.toml", FileFormat::Toml).required(false),
        );

        let mut config: Config = builder.build()?.try_deserialize()?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Environment variables win over file values. Applied by hand
    /// because keys like `client_id` do not survive a single-character
    /// env separator.
    fn apply_env_overrides(&mut self) {
        let overlay = |target: &mut Option<String>, name: &str| {
            if let Ok(value) = std::env::var(name) {
                if !value.is_empty() {
                    *target = Some(value);
                }
            }
        };

        overlay(&mut self.database.url, "LUDEX_DATABASE_URL");
        overlay(&mut self.rawg.api_key, "LUDEX_RAWG_API_KEY");
        overlay(&mut self.igdb.client_id, "LUDEX_IGDB_CLIENT_ID");
        overlay(&mut self.igdb.client_secret, "LUDEX_IGDB_CLIENT_SECRET");
        overlay(&mut self.twitch.client_id, "LUDEX_TWITCH_CLIENT_ID");
        overlay(&mut self.twitch.client_secret, "LUDEX_TWITCH_CLIENT_SECRET");
    }

    /// XDG config file location.
    fn config_file_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "ludex").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// The effective database URL.
    pub fn database_url(&self) -> String {
        if let Some(url) = &self.database.url {
            return url.clone();
        }

        let state_dir = ProjectDirs::from("", "", "ludex")
            .map(|dirs| {
                dirs.state_dir()
                    .map(PathBuf::from)
                    .unwrap_or_else(|| dirs.data_local_dir().to_path_buf())
            })
            .unwrap_or_else(|| PathBuf::from("."));

        if let Err(err) = std::fs::create_dir_all(&state_dir) {
            tracing::warn!(dir = %state_dir.display(), error = %err, "could not create state directory");
        }

        format!("sqlite://{}?mode=rwc", state_dir.join("ludex.db").display())
    }

    /// Credentials in the shape the sync service expects.
    pub fn credentials(&self) -> SourceCredentials {
        SourceCredentials {
            rawg_api_key: self.rawg.api_key.clone(),
            igdb_client_id: self.igdb.client_id.clone(),
            igdb_client_secret: self.igdb.client_secret.clone(),
            twitch_client_id: self.twitch.client_id.clone(),
            twitch_client_secret: self.twitch.client_secret.clone(),
        }
    }
}
