use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_FILTER: &str = "feedprobe=info,reddit_fetch=info,telegram_auth=info,\
telegram_scrape=info,reddit_client=info,telegram_client=info,feedprobe_core=info";

/// Logs go to stderr so stdout only carries the fetched records.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
