mod commands;
mod gateway;

use clap::{Parser, Subcommand};
use gateway::Gateway;
use std::collections::HashMap;
use std::sync::Arc;
use streamlate_channels::{HelixDirectory, OverlaySink, TwitchChannel};
use streamlate_core::config::{self, RuntimeConfig};
use streamlate_core::message::ChatCommand;
use streamlate_core::traits::{Channel, Completion, UserDirectory};
use streamlate_l10n::TemplateCatalog;
use streamlate_providers::OpenAiProvider;
use streamlate_store::Store;

#[derive(Parser)]
#[command(
    name = "streamlate",
    version,
    about = "Streamlate — livestream chat translation bot"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot.
    Start,
    /// Check backend availability and channel configuration.
    Status,
    /// Run one chat command through the pipeline and print the reply.
    Translate {
        /// The command body, e.g. "es hello everyone".
        #[arg(trailing_var_arg = true)]
        message: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Commands::Start => {
            let cfg = config::load(&cli.config)?;
            let store = build_store(&cfg).await?;

            let provider: Arc<dyn Completion> = Arc::new(OpenAiProvider::from_config(&cfg.provider));
            if !provider.is_available().await {
                anyhow::bail!("completion backend '{}' is not available", provider.name());
            }

            let mut channels: HashMap<String, Arc<dyn Channel>> = HashMap::new();
            let mut directory: Option<Arc<dyn UserDirectory>> = None;

            if let Some(ref tw) = cfg.channel.twitch {
                if tw.enabled {
                    if tw.oauth_token.is_empty() {
                        anyhow::bail!(
                            "Twitch is enabled but oauth_token is empty. Set it in config.toml."
                        );
                    }
                    channels.insert("twitch".to_string(), Arc::new(TwitchChannel::new(tw.clone())));
                    if !tw.client_id.is_empty() && !tw.helix_token.is_empty() {
                        directory = Some(Arc::new(HelixDirectory::new(
                            &tw.client_id,
                            &tw.helix_token,
                        )));
                    }
                }
            }
            if let Some(ref ov) = cfg.channel.overlay {
                if ov.enabled {
                    channels.insert("overlay".to_string(), Arc::new(OverlaySink::new(ov.clone())));
                }
            }
            if channels.is_empty() {
                anyhow::bail!("No channels enabled. Enable at least one channel in config.toml.");
            }

            println!("Streamlate — starting bot...");
            let gw = Arc::new(Gateway::new(
                store,
                provider,
                channels,
                directory,
                cfg.bot.base_command.clone(),
            ));
            gw.run().await?;
        }
        Commands::Status => {
            let cfg = config::load(&cli.config)?;
            println!("Streamlate — Status Check\n");
            println!("Config: {}", cli.config);
            println!("Base command: {}", cfg.bot.base_command);
            println!();

            let provider = OpenAiProvider::from_config(&cfg.provider);
            println!(
                "  backend: {}",
                if provider.is_available().await {
                    "available"
                } else {
                    "not available"
                }
            );
            println!();

            match cfg.channel.twitch {
                Some(ref tw) => println!(
                    "  twitch: {}",
                    if tw.enabled && !tw.oauth_token.is_empty() {
                        "configured"
                    } else if tw.enabled {
                        "enabled but missing oauth_token"
                    } else {
                        "disabled"
                    }
                ),
                None => println!("  twitch: not configured"),
            }
            match cfg.channel.overlay {
                Some(ref ov) => println!(
                    "  overlay: {}",
                    if ov.enabled { "configured" } else { "disabled" }
                ),
                None => println!("  overlay: not configured"),
            }
        }
        Commands::Translate { message } => {
            if message.is_empty() {
                anyhow::bail!("no message provided. Usage: streamlate translate <message>");
            }

            let cfg = config::load(&cli.config)?;
            let store = build_store(&cfg).await?;
            let provider: Arc<dyn Completion> = Arc::new(OpenAiProvider::from_config(&cfg.provider));

            let gw = Gateway::new(
                store,
                provider,
                HashMap::new(),
                None,
                cfg.bot.base_command.clone(),
            );
            let text = format!("{} {}", cfg.bot.base_command, message.join(" "));
            let cmd = ChatCommand::new("cli", "cli", "cli", &text);
            match gw.handle_command(&cmd).await? {
                Some(reply) => println!("{reply}"),
                None => println!("(no reply)"),
            }
        }
    }

    Ok(())
}

/// Open the store and seed the runtime documents on first run.
async fn build_store(cfg: &config::Config) -> anyhow::Result<Store> {
    let store = Store::new(&cfg.store).await?;
    store
        .seed_defaults(&RuntimeConfig::seed(), &TemplateCatalog::embedded_defaults()?)
        .await?;
    Ok(store)
}
