//! Main entry point for the Tradz gateway CLI

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tradz::cli::commands::{self, Commands};

/// Tradz - translation gateway with provider fallback
#[derive(Parser, Debug)]
#[command(name = "tradz", version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}={},tower_http={}", env!("CARGO_CRATE_NAME"), log_level, log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // no subcommand means serve
    match args.command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
        config: None,
    }) {
        Commands::Serve { host, port, config } => {
            commands::handle_serve(host, port, config).await?;
        }
        Commands::Translate {
            text,
            from,
            to,
            config,
        } => {
            commands::handle_translate(text, from, to, config).await?;
        }
        Commands::Detect { text } => {
            commands::handle_detect(text)?;
        }
        Commands::Providers { config } => {
            commands::handle_providers(config)?;
        }
    }

    Ok(())
}
