//! WeFact proxy - SOCKS5 proxy for the import job.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Run a SOCKS5 proxy.
#[derive(Debug, Parser)]
#[command(name = "wefact-proxy", version, about)]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "WEFACT_PROXY_LISTEN", default_value = "0.0.0.0:8080")]
    listen: String,
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

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    wefact_proxy::serve(listener).await?;

    Ok(())
}
