//! TCP accept loop.
//!
//! Binds the listening socket once, then loops on `accept`, handing each
//! connection to its own task and continuing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{error, info};
use tokio::net::TcpListener;

use crate::app::relay::RelaySession;
use crate::config::ProxyConfig;
use crate::system::writer::TranscriptSink;

/// Bind `config.src_port` and relay every accepted connection until
/// `shutdown` is set. A single accept error is logged and does not stop
/// the loop; only a failure to bind the listening socket itself is fatal.
pub async fn run(
    config: Arc<ProxyConfig>,
    sink: Arc<dyn TranscriptSink>,
    shutdown: Arc<AtomicBool>,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(("0.0.0.0", config.src_port)).await?;
    info!("listening on port {}", config.src_port);

    while !shutdown.load(Ordering::Relaxed) {
        let (client, peer_addr) = match listener.accept().await {
            Ok(pair) => pair,
            Err(e) => {
                error!("accept failed: {e}");
                continue;
            }
        };

        info!("accepted connection from {peer_addr}");
        let session_config = Arc::clone(&config);
        let session_sink = Arc::clone(&sink);
        tokio::spawn(async move {
            RelaySession::new(client, peer_addr, session_config, session_sink)
                .run()
                .await;
        });
    }

    info!("acceptor loop shutting down");
    Ok(())
}
