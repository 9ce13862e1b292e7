use feedprobe::{init_tracing, output};
use feedprobe_core::{ChannelMessage, ErrorExt, ProbeConfig, TelegramError, TelegramSettings};
use telegram_client::{
    session_path, ApiCredentials, ChannelScraper, GrammersApi, PhoneNumber, StdinPrompt,
};
use tracing::warn;

async fn scrape(settings: &TelegramSettings) -> Result<Vec<ChannelMessage>, TelegramError> {
    let credentials = ApiCredentials::from_settings(settings)?;
    let api = GrammersApi::connect(&credentials, session_path(&settings.scrape_session)).await?;

    let mut scraper = ChannelScraper::new(api, StdinPrompt);
    if !settings.phone.trim().is_empty() {
        match PhoneNumber::parse(&settings.phone) {
            Ok(phone) => scraper = scraper.with_phone(phone),
            Err(e) => warn!("Ignoring configured phone: {}", e),
        }
    }

    Ok(scraper
        .scrape(&settings.channel, settings.message_limit)
        .await)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ProbeConfig::load()?;
    let messages = match scrape(&config.telegram).await {
        Ok(messages) => messages,
        Err(e) => {
            e.log_error();
            Vec::new()
        }
    };

    println!("Scraped {} messages.", messages.len());
    for message in &messages {
        println!("{}", output::message_block(message));
    }
    Ok(())
}
