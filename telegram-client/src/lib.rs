pub mod api;
pub mod auth;
pub mod credentials;
pub mod grammers;
pub mod scraper;
pub mod setup;

#[cfg(test)]
mod fake;

pub use api::{FetchedMessage, SignInOutcome, TelegramApi};
pub use auth::{AuthState, Authenticator, LoginPrompt, StdinPrompt};
pub use credentials::{session_path, ApiCredentials, PhoneNumber};
pub use grammers::GrammersApi;
pub use scraper::ChannelScraper;
pub use setup::{probe_channel_access, run_auth_setup, SetupReport};
