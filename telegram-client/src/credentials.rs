use feedprobe_core::{TelegramError, TelegramSettings};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

const SESSION_SUFFIX: &str = ".session";

/// App credentials issued at my.telegram.org.
#[derive(Debug, Clone)]
pub struct ApiCredentials {
    pub api_id: i32,
    pub api_hash: String,
}

impl ApiCredentials {
    pub fn new(api_id: i32, api_hash: &str) -> Result<Self, TelegramError> {
        if api_id <= 0 {
            return Err(TelegramError::InvalidApiId {
                value: api_id.to_string(),
            });
        }
        let api_hash = api_hash.trim();
        if api_hash.is_empty() {
            return Err(TelegramError::MissingCredential {
                field: "api_hash".to_string(),
            });
        }
        Ok(Self {
            api_id,
            api_hash: api_hash.to_string(),
        })
    }

    /// Parses an API id given as text, e.g. from the command line.
    pub fn parse(api_id: &str, api_hash: &str) -> Result<Self, TelegramError> {
        let api_id = api_id.trim();
        if api_id.is_empty() {
            return Err(TelegramError::MissingCredential {
                field: "api_id".to_string(),
            });
        }
        let parsed = api_id
            .parse::<i32>()
            .map_err(|_| TelegramError::InvalidApiId {
                value: api_id.to_string(),
            })?;
        Self::new(parsed, api_hash)
    }

    pub fn from_settings(settings: &TelegramSettings) -> Result<Self, TelegramError> {
        if settings.api_id == 0 {
            return Err(TelegramError::MissingCredential {
                field: "api_id".to_string(),
            });
        }
        Self::new(settings.api_id, &settings.api_hash)
    }
}

/// Phone number in international form, `+` followed by 7 to 15 digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn parse(raw: &str) -> Result<Self, TelegramError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TelegramError::MissingCredential {
                field: "phone".to_string(),
            });
        }

        let cleaned: String = trimmed
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
            .collect();
        let digits = cleaned.strip_prefix('+').unwrap_or(&cleaned);

        let valid = (7..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit());
        if !valid {
            return Err(TelegramError::InvalidPhone {
                phone: trimmed.to_string(),
            });
        }
        Ok(Self(format!("+{}", digits)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PhoneNumber {
    type Err = TelegramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Path of the session file for `stem`, with the `.session` suffix added once.
pub fn session_path(stem: impl Into<PathBuf>) -> PathBuf {
    let path: PathBuf = stem.into();
    if path.to_string_lossy().ends_with(SESSION_SUFFIX) {
        return path;
    }
    let mut name = path.into_os_string();
    name.push(SESSION_SUFFIX);
    PathBuf::from(name)
}
