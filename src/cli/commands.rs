//! CLI command definitions and handlers

use clap::Subcommand;
use std::path::PathBuf;
use tracing::info;

use crate::core::config::GatewayConfig;
use crate::core::detector;
use crate::core::gateway::TranslationGateway;
use crate::core::models::{GatewayOutcome, TranslationRequest, AUTO_LANG};

/// Commands for the Tradz gateway
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP API server
    Serve {
        /// Bind address (default: HOST env var or 0.0.0.0)
        #[arg(long)]
        host: Option<String>,

        /// Listen port (default: PORT env var or 5000)
        #[arg(short, long)]
        port: Option<u16>,

        /// JSON configuration file instead of environment variables
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Translate a text once and print the result
    Translate {
        /// Text to translate
        text: String,

        /// Source language (auto-detect if not specified)
        #[arg(long, default_value = AUTO_LANG)]
        from: String,

        /// Target language
        #[arg(short, long, default_value = "en")]
        to: String,

        /// JSON configuration file instead of environment variables
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Detect the language of a text
    Detect {
        /// Text to inspect
        text: String,
    },

    /// List configured providers in fallback order
    Providers {
        /// JSON configuration file instead of environment variables
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Load and validate configuration from a file or the environment
pub fn load_config(path: Option<PathBuf>) -> anyhow::Result<GatewayConfig> {
    let config = match path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            GatewayConfig::from_file(&path)?
        }
        None => GatewayConfig::from_env()?,
    };
    config.validate()?;
    Ok(config)
}

/// Handle serve command
pub async fn handle_serve(
    host: Option<String>,
    port: Option<u16>,
    config: Option<PathBuf>,
) -> anyhow::Result<()> {
    use crate::server::api::run_server;

    let mut config = load_config(config)?;
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    info!("Starting HTTP server on {}:{}", config.host, config.port);
    println!("🚀 Server starting on http://{}:{}", config.host, config.port);

    run_server(config).await
}

/// Handle translate command
pub async fn handle_translate(
    text: String,
    from: String,
    to: String,
    config: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = load_config(config)?;
    let gateway = TranslationGateway::from_config(&config)?;
    let request = TranslationRequest::new(text, to).with_source_lang(from);

    let outcome = gateway.translate_text(&request).await;
    for attempt in outcome.attempts() {
        if let Some(kind) = attempt.error_kind {
            println!(
                "⚠️  {} failed ({}) after {} ms: {}",
                attempt.provider,
                kind,
                attempt.elapsed_ms,
                attempt.detail.as_deref().unwrap_or("")
            );
        }
    }

    match outcome {
        GatewayOutcome::EmptyInput => {
            println!();
            Ok(())
        }
        GatewayOutcome::Translated {
            text,
            source_lang,
            provider,
            ..
        } => {
            info!("Translated from {} by {}", source_lang, provider);
            println!("{}", text);
            Ok(())
        }
        GatewayOutcome::Failed { kind, detail, .. } => {
            Err(anyhow::anyhow!("Translation failed ({}): {}", kind, detail))
        }
    }
}

/// Handle detect command
pub fn handle_detect(text: String) -> anyhow::Result<()> {
    let detected = detector::detect(&text);
    println!("{}", detected);
    for (lang, hits) in detector::score(&text) {
        info!("{}: {} stopword hits", lang, hits);
    }
    Ok(())
}

/// Handle providers command
pub fn handle_providers(config: Option<PathBuf>) -> anyhow::Result<()> {
    let config = load_config(config)?;
    if config.providers.is_empty() {
        println!("No providers configured");
        return Ok(());
    }
    for (position, spec) in config.providers.iter().enumerate() {
        println!(
            "{}. {} ({}) {} [timeout {} ms]",
            position + 1,
            spec.name,
            spec.kind,
            spec.endpoint,
            spec.timeout_ms
        );
    }
    Ok(())
}
