use crate::api::TelegramApi;
use crate::auth::{Authenticator, LoginPrompt};
use crate::credentials::PhoneNumber;
use feedprobe_core::{ChannelMessage, ErrorExt, TelegramError};
use std::collections::HashSet;
use tracing::{info, warn};

/// Pulls the latest messages of one broadcast channel.
///
/// Every failure degrades to an empty result and the client is always
/// disconnected afterwards, so a scraper is good for one `scrape` call.
pub struct ChannelScraper<A, P> {
    api: A,
    prompt: P,
    phone: Option<PhoneNumber>,
}

impl<A: TelegramApi, P: LoginPrompt> ChannelScraper<A, P> {
    pub fn new(api: A, prompt: P) -> Self {
        Self {
            api,
            prompt,
            phone: None,
        }
    }

    /// Phone number to log in with when the session is not authorized yet.
    pub fn with_phone(mut self, phone: PhoneNumber) -> Self {
        self.phone = Some(phone);
        self
    }

    pub async fn scrape(&self, channel: &str, limit: usize) -> Vec<ChannelMessage> {
        let result = self.try_scrape(channel, limit).await;
        self.api.disconnect().await;

        match result {
            Ok(messages) => messages,
            Err(TelegramError::NotAChannel { name, kind }) => {
                warn!(
                    "'{}' is not a public channel or you don't have access (resolved to a {}).",
                    name, kind
                );
                Vec::new()
            }
            Err(e @ TelegramError::EntityNotFound { .. }) => {
                e.log_warn();
                Vec::new()
            }
            Err(e) => {
                e.log_error();
                Vec::new()
            }
        }
    }

    /// Same as [`scrape`](Self::scrape) but reports why nothing came back and
    /// leaves the connection open.
    pub async fn try_scrape(
        &self,
        channel: &str,
        limit: usize,
    ) -> Result<Vec<ChannelMessage>, TelegramError> {
        let mut auth = Authenticator::new(&self.api);
        auth.ensure_authorized(self.phone.as_ref(), &self.prompt)
            .await?;
        info!("Client logged in.");

        let name = channel.trim().trim_start_matches('@');
        let entity = self
            .api
            .resolve_entity(name)
            .await?
            .ok_or_else(|| TelegramError::EntityNotFound {
                name: name.to_string(),
            })?;

        if !entity.is_channel() {
            return Err(TelegramError::NotAChannel {
                name: name.to_string(),
                kind: entity.kind.to_string(),
            });
        }

        info!(
            "Scraping messages from channel: {} (@{})",
            entity.title,
            entity.username.as_deref().unwrap_or(name)
        );

        let fetched = self.api.recent_messages(&entity, limit).await?;
        let mut seen = HashSet::new();
        let messages: Vec<ChannelMessage> = fetched
            .into_iter()
            .filter(|message| seen.insert(message.id))
            .take(limit)
            .map(|message| message.into_channel_message(name))
            .collect();

        info!("Scraped {} messages.", messages.len());
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FetchedMessage;
    use crate::fake::{FakePrompt, FakeTelegram};
    use chrono::{TimeZone, Utc};
    use feedprobe_core::EntityKind;

    fn scraper(api: &FakeTelegram) -> ChannelScraper<FakeTelegram, FakePrompt> {
        ChannelScraper::new(api.clone(), FakePrompt::code("12345"))
    }

    #[tokio::test]
    async fn test_scrape_caps_at_limit() {
        let api = FakeTelegram::new()
            .authorized()
            .with_entity("dubaionline", 100, EntityKind::Channel)
            .with_messages(100, 80);

        let messages = scraper(&api).scrape("dubaionline", 50).await;

        assert_eq!(messages.len(), 50);
        assert_eq!(messages[0].id, 80);
        assert_eq!(messages[0].post_url, "https://t.me/dubaionline/80");
        assert!(api.is_disconnected());
    }

    #[tokio::test]
    async fn test_scrape_returns_fewer_when_channel_is_short() {
        let api = FakeTelegram::new()
            .authorized()
            .with_entity("smallchan", 7, EntityKind::Channel)
            .with_messages(7, 12);

        let messages = scraper(&api).scrape("@smallchan", 50).await;

        assert_eq!(messages.len(), 12);
        // ids are most recent first with no repeats
        assert!(messages.windows(2).all(|pair| pair[0].id > pair[1].id));
        // id 12 is divisible by 3 so the fake gives it no text
        assert_eq!(messages[0].text, None);
        assert_eq!(messages[0].views, Some(120));
        assert_eq!(messages[1].text.as_deref(), Some("message 11"));
    }

    #[tokio::test]
    async fn test_non_channel_entity_yields_empty() {
        let api = FakeTelegram::new()
            .authorized()
            .with_entity("durov", 1, EntityKind::User)
            .with_messages(1, 5);

        let scraper = scraper(&api);
        assert!(matches!(
            scraper.try_scrape("durov", 50).await,
            Err(TelegramError::NotAChannel { .. })
        ));

        let messages = scraper.scrape("durov", 50).await;
        assert!(messages.is_empty());
        assert!(!api.calls().contains(&"recent_messages".to_string()));
    }

    #[tokio::test]
    async fn test_group_entity_yields_empty() {
        let api = FakeTelegram::new()
            .authorized()
            .with_entity("rustgroup", 3, EntityKind::Group);

        assert!(scraper(&api).scrape("rustgroup", 10).await.is_empty());
        assert!(api.is_disconnected());
    }

    #[tokio::test]
    async fn test_unknown_channel_yields_empty() {
        let api = FakeTelegram::new().authorized();
        assert!(scraper(&api).scrape("nosuchchannel", 10).await.is_empty());
        assert!(api.is_disconnected());
    }

    #[tokio::test]
    async fn test_transport_errors_degrade_to_empty() {
        let api = FakeTelegram::new()
            .authorized()
            .with_entity("dubaionline", 100, EntityKind::Channel)
            .failing_resolve();
        assert!(scraper(&api).scrape("dubaionline", 10).await.is_empty());
        assert!(api.is_disconnected());

        let api = FakeTelegram::new()
            .authorized()
            .with_entity("dubaionline", 100, EntityKind::Channel)
            .with_messages(100, 5)
            .failing_messages();
        assert!(scraper(&api).scrape("dubaionline", 10).await.is_empty());
        assert_eq!(api.calls().last().map(String::as_str), Some("disconnect"));
    }

    #[tokio::test]
    async fn test_duplicate_ids_are_dropped() {
        let date = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let message = |id| FetchedMessage {
            id,
            date,
            text: Some(String::new()),
            views: None,
        };
        let api = FakeTelegram::new()
            .authorized()
            .with_entity("dubaionline", 100, EntityKind::Channel)
            .with_raw_messages(100, vec![message(9), message(9), message(8)]);

        let messages = scraper(&api).scrape("dubaionline", 10).await;
        let ids: Vec<i32> = messages.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![9, 8]);
        assert_eq!(messages[0].text, None);
    }

    #[tokio::test]
    async fn test_logs_in_when_session_is_fresh() {
        let api = FakeTelegram::new()
            .with_login_code("12345")
            .with_entity("dubaionline", 100, EntityKind::Channel)
            .with_messages(100, 3);

        let scraper = scraper(&api).with_phone(PhoneNumber::parse("+1234567890").unwrap());
        let messages = scraper.scrape("dubaionline", 50).await;

        assert_eq!(messages.len(), 3);
        assert!(api.session_saved());
    }

    #[tokio::test]
    async fn test_fresh_session_without_phone_yields_empty() {
        let api = FakeTelegram::new()
            .with_entity("dubaionline", 100, EntityKind::Channel)
            .with_messages(100, 3);

        assert!(scraper(&api).scrape("dubaionline", 50).await.is_empty());
        assert!(api.is_disconnected());
    }
}
