use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Reddit API error: {0}")]
    RedditApi(#[from] RedditApiError),

    #[error("Telegram error: {0}")]
    Telegram(#[from] TelegramError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

#[derive(Error, Debug, Clone)]
pub enum RedditApiError {
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Rate limit exceeded. Retry after {retry_after} seconds")]
    RateLimitExceeded { retry_after: u64 },

    #[error("Forbidden access to resource: {resource}")]
    Forbidden { resource: String },

    #[error("Subreddit not found: {subreddit}")]
    SubredditNotFound { subreddit: String },

    #[error("Invalid OAuth token")]
    InvalidToken,

    #[error("Request timeout")]
    RequestTimeout,

    #[error("Invalid API response: {details}")]
    InvalidResponse { details: String },

    #[error("Server error: {status_code}")]
    ServerError { status_code: u16 },
}

#[derive(Error, Debug, Clone)]
pub enum TelegramError {
    #[error("Invalid phone number '{phone}': expected country code and 7-15 digits")]
    InvalidPhone { phone: String },

    #[error("Invalid API id '{value}': expected a positive integer")]
    InvalidApiId { value: String },

    #[error("Missing Telegram credential: {field}")]
    MissingCredential { field: String },

    #[error("Connection failed: {reason}")]
    ConnectionFailed { reason: String },

    #[error("Authorization failed: {reason}")]
    AuthorizationFailed { reason: String },

    #[error("The login code was rejected")]
    InvalidCode,

    #[error("The two-factor password was rejected")]
    InvalidPassword,

    #[error("This phone number is not registered with Telegram")]
    SignUpRequired,

    #[error("No entity named '{name}'")]
    EntityNotFound { name: String },

    #[error("'{name}' is a {kind}, not a channel")]
    NotAChannel { name: String, kind: String },

    #[error("Session file error at {path}: {reason}")]
    Session { path: String, reason: String },

    #[error("Request failed: {reason}")]
    Invocation { reason: String },

    #[error("Client is not connected")]
    Disconnected,

    #[error("Login prompt failed: {reason}")]
    Prompt { reason: String },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to read configuration file {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Configuration parsing error: {0}")]
    Parse(#[from] toml::de::Error),
}
