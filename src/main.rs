//! Lingo CLI entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lingo::adapters::cli::CliChannel;
use lingo::adapters::telegram::TelegramChannel;
use lingo::adapters::{Channel, ChannelRegistry};
use lingo::agent::ChatCompletionsClient;
use lingo::handler::ChatHandler;

#[derive(Parser)]
#[command(name = "lingo")]
#[command(about = "🌍 Lingo - Multi-agent language tutor chat gateway")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the language tutors
    Chat {
        /// Message to send (interactive mode when omitted)
        #[arg(short, long)]
        message: Option<String>,

        /// Session ID
        #[arg(short, long, default_value = "cli:default")]
        session: String,
    },

    /// Start the Telegram gateway
    Gateway,

    /// Show Lingo status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Setup Global Ctrl+C handler
    let exit_flag = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
    let r = exit_flag.clone();

    ctrlc::set_handler(move || {
        if r.load(std::sync::atomic::Ordering::SeqCst) {
            println!("\n👋 Bye!");
            std::process::exit(0);
        } else {
            println!("\n⚠️  Press Ctrl+C again to exit");
            r.store(true, std::sync::atomic::Ordering::SeqCst);

            // Reset flag after 3 seconds
            let r2 = r.clone();
            std::thread::spawn(move || {
                std::thread::sleep(std::time::Duration::from_secs(3));
                r2.store(false, std::sync::atomic::Ordering::SeqCst);
            });
        }
    })
    .ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Chat { message, session } => {
            let config = lingo::config::load()?;
            let client =
                ChatCompletionsClient::new(&config.api_key, &config.base_url, &config.model);
            let handler = ChatHandler::new(client, &config.model);
            let mut channel = CliChannel::new(handler, &session);

            if let Some(msg) = message {
                channel.run_once(&msg).await?;
            } else {
                lingo::ui::print_header(&config.model, "cli");
                println!("🌍 Interactive mode (Ctrl+C to exit)\n");
                channel.run_interactive().await?;
            }
        }

        Commands::Gateway => {
            let config = lingo::config::load()?;

            if !config.telegram.enabled || config.telegram.token.is_empty() {
                lingo::ui::print_warning(
                    "Telegram is disabled in config. Enable it and set 'token' to run the gateway.",
                );
                return Ok(());
            }

            let client =
                ChatCompletionsClient::new(&config.api_key, &config.base_url, &config.model);
            let channel = TelegramChannel::new(config, client);

            lingo::ui::print_success("Gateway started. Listening for Telegram messages...");
            channel.start().await?;
        }

        Commands::Status => {
            let config = lingo::config::load_settings()?;
            println!("🌍 Lingo Status\n");
            println!("Model: {}", config.model);
            println!("Endpoint: {}", config.base_url);

            let _ = dotenvy::dotenv();
            let key_set = std::env::var(lingo::config::API_KEY_VAR)
                .map(|v| !v.is_empty())
                .unwrap_or(false);
            println!("Gemini API key: {}", if key_set { "✓" } else { "not set" });

            println!("\nChannels:");
            for name in ChannelRegistry::available() {
                let mark = if ChannelRegistry::is_enabled(name, &config) {
                    "✓"
                } else {
                    "–"
                };
                println!("  {} {} — {}", mark, name, ChannelRegistry::description(name));
            }
        }
    }

    Ok(())
}
