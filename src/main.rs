//! # Relay Core
//!
//! A TCP port-forwarding and observation proxy. It listens on a local
//! port, connects each accepted client to a single fixed upstream, relays
//! bytes in both directions through an optional substitution engine, and
//! optionally writes a transcript of everything that crosses the wire.
//!
//! ## Architecture
//!
//! - **cli**: argv → validated [`config::ProxyConfig`]
//! - **system::acceptor**: binds the listening socket, spawns one task per connection
//! - **app::relay**: the per-connection duplex loop
//! - **app::substitute**: the byte-pattern rewrite engine
//! - **app::transcript**: the display-mode formatter
//! - **system::writer**: where formatted transcript blocks go

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use relay_core::cli::RawArgs;
use relay_core::system;
use relay_core::system::writer::StdoutSink;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config = RawArgs::parse()
        .into_config()
        .context("invalid command-line arguments")?;
    let config = Arc::new(config);

    eprintln!(
        "relay-core: forwarding 0.0.0.0:{} -> {}:{}",
        config.src_port, config.server, config.dst_port
    );

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = Arc::clone(&shutdown);
        ctrlc::set_handler(move || {
            log::info!("SIGINT received, shutting down");
            eprintln!("\nrelay-core: SIGINT received, shutting down...");
            shutdown.store(true, Ordering::SeqCst);
        })
        .context("error setting Ctrl-C handler")?;
    }

    let sink: Arc<dyn system::writer::TranscriptSink> = Arc::new(StdoutSink::new());

    system::acceptor::run(config, sink, shutdown)
        .await
        .context("acceptor loop failed")?;
    Ok(())
}
