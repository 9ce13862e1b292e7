use feedprobe::{init_tracing, output};
use feedprobe_core::{CoreError, ErrorExt, ErrorReporter, ProbeConfig};
use reddit_client::{RedditClient, RedditCredentials};

async fn run() -> Result<(), CoreError> {
    let config = ProbeConfig::load()?;
    let settings = &config.reddit;

    let mut client = RedditClient::new(RedditCredentials::from_settings(settings))?;

    let info = client.subreddit_info(&settings.subreddit).await?;
    println!("{}", output::subreddit_header(&info));

    let posts = client
        .fetch_new_posts(&settings.subreddit, settings.limit)
        .await?;
    for post in &posts {
        println!("{}", output::post_line(post));
    }

    tracing::info!("Fetched {} posts from r/{}", posts.len(), settings.subreddit);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    if let Err(e) = run().await {
        ErrorReporter::new().report_error(&e);
        eprintln!("❌ {}", e.user_friendly_message());
        return Err(e.into());
    }
    Ok(())
}
