//! SOCKS5 proxy for the import job.
//!
//! Runs the import job's outbound traffic from a host whose address is
//! whitelisted at WeFact. The protocol itself is handled by `fast-socks5`:
//! clients connect without authentication and every accepted connection is
//! served on its own task until either side closes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::net::SocketAddr;
use std::sync::Arc;

use fast_socks5::server::{Config, Socks5Socket};
use fast_socks5::SocksError;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, instrument, warn};

/// Seconds allowed for reaching a requested target.
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Server settings: no authentication, `CONNECT` targets resolved by the proxy.
#[must_use]
pub fn config() -> Config {
    let mut config = Config::default();
    config.set_request_timeout(CONNECT_TIMEOUT_SECS);
    config
}

/// Accept connections forever, handling each on its own task.
///
/// # Errors
///
/// Returns an error if accepting a connection fails.
pub async fn serve(listener: TcpListener) -> std::io::Result<()> {
    let config = Arc::new(config());
    info!(addr = %listener.local_addr()?, "SOCKS5 proxy listening");

    loop {
        let (stream, peer) = listener.accept().await?;
        let config = Arc::clone(&config);
        tokio::spawn(async move {
            if let Err(e) = handle(stream, peer, config).await {
                warn!(peer = %peer, error = %e, "Proxied connection failed");
            }
        });
    }
}

/// Run the SOCKS5 handshake on `stream` and relay traffic to the requested
/// target until the tunnel closes.
///
/// # Errors
///
/// Returns an error if the handshake is invalid or the target is unreachable.
#[instrument(skip(stream, config))]
pub async fn handle(
    stream: TcpStream,
    peer: SocketAddr,
    config: Arc<Config>,
) -> Result<(), SocksError> {
    Socks5Socket::new(stream, config).upgrade_to_socks5().await?;
    debug!("Tunnel closed");
    Ok(())
}
