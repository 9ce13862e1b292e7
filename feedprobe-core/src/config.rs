//! Credential and target settings shared by the fetch tools.
//!
//! Values come from an optional TOML file (`feedprobe.toml`, or the path in
//! `FEEDPROBE_CONFIG`), then environment variables override individual fields.
//! A `.env` file in the working directory is loaded first.

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

pub const CONFIG_PATH_VAR: &str = "FEEDPROBE_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "feedprobe.toml";

pub const DEFAULT_SUBREDDIT: &str = "dubai";
pub const DEFAULT_POST_LIMIT: u32 = 20;
pub const DEFAULT_CHANNEL: &str = "dubaionline";
pub const DEFAULT_MESSAGE_LIMIT: usize = 50;
pub const DEFAULT_AUTH_SESSION: &str = "news_session";
pub const DEFAULT_SCRAPE_SESSION: &str = "my_session";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub reddit: RedditSettings,
    pub telegram: TelegramSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RedditSettings {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
    pub subreddit: String,
    pub limit: u32,
}

impl Default for RedditSettings {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            user_agent: String::new(),
            subreddit: DEFAULT_SUBREDDIT.to_string(),
            limit: DEFAULT_POST_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelegramSettings {
    pub api_id: i32,
    pub api_hash: String,
    pub phone: String,
    pub channel: String,
    pub message_limit: usize,
    pub auth_session: String,
    pub scrape_session: String,
}

impl Default for TelegramSettings {
    fn default() -> Self {
        Self {
            api_id: 0,
            api_hash: String::new(),
            phone: String::new(),
            channel: DEFAULT_CHANNEL.to_string(),
            message_limit: DEFAULT_MESSAGE_LIMIT,
            auth_session: DEFAULT_AUTH_SESSION.to_string(),
            scrape_session: DEFAULT_SCRAPE_SESSION.to_string(),
        }
    }
}

impl ProbeConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::Read {
                path: path.display().to_string(),
                reason: e.to_string(),
            },
        })?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&contents)
    }

    /// Reads `.env`, the config file if any, then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }

        let mut config = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::from_file(path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            Err(_) => {
                info!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                Self::default()
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Overlays credential variables; empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = get("REDDIT_CLIENT_ID") {
            self.reddit.client_id = value;
        }
        if let Some(value) = get("REDDIT_CLIENT_SECRET") {
            self.reddit.client_secret = value;
        }
        if let Some(value) = get("REDDIT_USER_AGENT") {
            self.reddit.user_agent = value;
        }
        if let Some(value) = get("TELEGRAM_API_ID") {
            self.telegram.api_id =
                value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        field: "TELEGRAM_API_ID".to_string(),
                        value: value.clone(),
                    })?;
        }
        if let Some(value) = get("TELEGRAM_API_HASH") {
            self.telegram.api_hash = value;
        }
        if let Some(value) = get("TELEGRAM_PHONE") {
            self.telegram.phone = value;
        }
        Ok(())
    }
}
