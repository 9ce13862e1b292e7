use clap::Parser;
use feedprobe::cli::AuthArgs;
use feedprobe::init_tracing;
use feedprobe::runner::{auth_exit, run_cancellable};
use feedprobe_core::{CoreError, ProbeConfig};
use std::process::ExitCode;
use telegram_client::{run_auth_setup, session_path, GrammersApi, StdinPrompt};

async fn setup(args: AuthArgs) -> Result<(), CoreError> {
    let config = ProbeConfig::load()?;
    let settings = &config.telegram;
    let target = args.resolve(settings)?;

    println!("Setting up Telegram authentication...");
    println!("API ID: {}", target.credentials.api_id);
    println!("Phone: {}", target.phone);

    let path = session_path(&settings.auth_session);

    println!("\nStarting authentication process...");
    println!("You will receive a code on your Telegram app.");

    let api = GrammersApi::connect(&target.credentials, &path).await?;
    let report = run_auth_setup(
        &api,
        &target.phone,
        Some(settings.channel.as_str()),
        &StdinPrompt,
    )
    .await?;

    println!("\n✅ Authentication successful!");
    println!("Logged in as: {}", report.account);
    println!("Session saved to: {}", path.display());

    println!("\nChannel access check:");
    match report.channel_probe {
        Some(Ok(_)) => println!("✅ Successfully accessed @{} channel", settings.channel),
        Some(Err(e)) => {
            println!(
                "⚠️  Warning: Could not access @{} channel: {}",
                settings.channel, e
            );
            println!("   Make sure the channel exists and is public");
        }
        None => {}
    }

    println!("\n🎉 Setup complete! You can now run telegram-scrape with this session.");
    Ok(())
}

fn main() -> ExitCode {
    let args = AuthArgs::parse();
    init_tracing();

    println!("Telegram Authentication Setup for News-to-Audio");
    println!("{}", "=".repeat(50));

    let outcome = match run_cancellable(setup(args), tokio::signal::ctrl_c()) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("❌ Failed to start the async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let (code, message) = auth_exit(&outcome);
    if let Some(message) = message {
        println!("{}", message);
    }
    ExitCode::from(code)
}
