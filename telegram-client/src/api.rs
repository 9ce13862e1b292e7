use crate::credentials::PhoneNumber;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use feedprobe_core::{Account, ChannelMessage, ResolvedEntity, TelegramError};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum SignInOutcome {
    SignedIn(Account),
    PasswordRequired { hint: Option<String> },
}

/// A message as the client library hands it back, before the post URL is derived.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedMessage {
    pub id: i32,
    pub date: DateTime<Utc>,
    pub text: Option<String>,
    pub views: Option<i32>,
}

impl FetchedMessage {
    pub fn into_channel_message(self, channel: &str) -> ChannelMessage {
        ChannelMessage {
            post_url: ChannelMessage::post_url_for(channel, self.id),
            id: self.id,
            date: self.date,
            text: self.text.filter(|text| !text.is_empty()),
            views: self.views,
        }
    }
}

/// The calls the auth flow and the scraper make against a Telegram session.
///
/// Login tokens between `request_login_code`, `sign_in` and
/// `check_password` are held by the implementation.
#[async_trait]
pub trait TelegramApi: Send + Sync {
    async fn is_authorized(&self) -> Result<bool, TelegramError>;

    async fn request_login_code(&self, phone: &PhoneNumber) -> Result<(), TelegramError>;

    async fn sign_in(&self, code: &str) -> Result<SignInOutcome, TelegramError>;

    async fn check_password(&self, password: &str) -> Result<Account, TelegramError>;

    async fn get_me(&self) -> Result<Account, TelegramError>;

    /// `Ok(None)` when no user, group or channel has that name.
    async fn resolve_entity(&self, name: &str) -> Result<Option<ResolvedEntity>, TelegramError>;

    /// Most recent first, at most `limit` items.
    async fn recent_messages(
        &self,
        entity: &ResolvedEntity,
        limit: usize,
    ) -> Result<Vec<FetchedMessage>, TelegramError>;

    async fn save_session(&self) -> Result<PathBuf, TelegramError>;

    /// Idempotent; later calls on a disconnected client fail with `Disconnected`.
    async fn disconnect(&self);
}
