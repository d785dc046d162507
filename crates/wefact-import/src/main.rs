//! WeFact import - replays a billing portal invoice export into WeFact.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wefact_client::WefactClient;
use wefact_import::{ImportConfig, RunOptions};

/// Import billing portal invoices into WeFact.
#[derive(Debug, Parser)]
#[command(name = "wefact-import", version, about)]
struct Args {
    /// Path to the billing portal invoices XML.
    #[arg(short = 'f', long = "file", value_parser = clap::builder::NonEmptyStringValueParser::new())]
    file: String,

    /// Keep the XML file after a successful run.
    #[arg(long)]
    keep_file: bool,

    /// Log what would be imported without creating invoices.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,wefact=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = ImportConfig::from_env()?;

    tracing::info!(
        endpoint = %config.endpoint,
        proxy_configured = %config.proxy_host.is_some(),
        dry_run = args.dry_run,
        "Import configuration loaded"
    );

    let client = WefactClient::with_options(config.api_key.clone(), config.client_options())?;
    let options = RunOptions {
        file: PathBuf::from(args.file),
        keep_file: args.keep_file,
        dry_run: args.dry_run,
    };

    let summary = wefact_import::run(&client, &config, &options).await?;

    tracing::info!(
        imported = summary.imported,
        skipped = summary.skipped,
        failed = summary.failed,
        "Import finished"
    );

    Ok(())
}
