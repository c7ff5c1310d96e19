//! The relay session state machine: one task per accepted connection.
//!
//! A single task polls both halves of the connection with `tokio::select!`,
//! applying substitution and transcript formatting to each chunk as it
//! crosses the proxy.

use std::sync::Arc;

use log::{debug, info, warn};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::app::substitute::substitute_bounded;
use crate::app::transcript::format_chunk;
use crate::config::{Direction, ProxyConfig, READ_BUFFER_SIZE, SUBSTITUTE_BUFFER_FACTOR};
use crate::error::SessionError;
use crate::system::writer::TranscriptSink;

/// The three states a session passes through, in order. Never revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Connecting,
    Relaying,
    Closing,
}

/// Drives one client connection end to end: connects upstream, relays both
/// directions until either side closes or errors, then reports how it
/// ended. Never panics and never propagates an error past `run`; a failed
/// session only ever affects itself.
pub struct RelaySession {
    client: TcpStream,
    peer_addr: std::net::SocketAddr,
    config: Arc<ProxyConfig>,
    sink: Arc<dyn TranscriptSink>,
    state: SessionState,
}

impl RelaySession {
    pub fn new(
        client: TcpStream,
        peer_addr: std::net::SocketAddr,
        config: Arc<ProxyConfig>,
        sink: Arc<dyn TranscriptSink>,
    ) -> Self {
        Self {
            client,
            peer_addr,
            config,
            sink,
            state: SessionState::Connecting,
        }
    }

    /// Run the session to completion. Errors are logged and swallowed:
    /// the caller (the acceptor loop) never sees a per-session failure.
    pub async fn run(mut self) {
        self.state = SessionState::Connecting;
        let (host, port) = self.config.upstream_addr();

        let upstream = match TcpStream::connect((host.as_str(), port)).await {
            Ok(stream) => stream,
            Err(io_err) => {
                let err = SessionError::UpstreamConnect(io_err);
                warn!("session {}: {err}", self.peer_addr);
                // Best-effort diagnostic to the client; failure here is not
                // itself an error worth reporting.
                let _ = self
                    .client
                    .write_all(format!("relay: {err}\n").as_bytes())
                    .await;
                return;
            }
        };

        self.state = SessionState::Relaying;
        info!("session {}: connected to {}:{}", self.peer_addr, host, port);

        let result = self.duplex(upstream).await;

        self.state = SessionState::Closing;
        match result {
            Ok(()) => debug!("session {}: closed cleanly", self.peer_addr),
            Err(err) => debug!("session {}: closed with error: {err}", self.peer_addr),
        }
    }

    /// The core duplex loop. Polls the upstream socket first, then the
    /// client socket, on every iteration. Either side reading zero bytes,
    /// erroring, or timing out ends the session; a single read is relayed
    /// to the other side by applying substitution, then formatting the
    /// substituted bytes for the transcript, in that order.
    async fn duplex(&mut self, mut upstream: TcpStream) -> Result<(), SessionError> {
        let mut upstream_buf = vec![0u8; READ_BUFFER_SIZE];
        let mut client_buf = vec![0u8; READ_BUFFER_SIZE];
        let max_substituted = READ_BUFFER_SIZE * SUBSTITUTE_BUFFER_FACTOR;

        loop {
            let upstream_read = tokio::time::timeout(
                crate::config::POLL_TIMEOUT,
                upstream.read(&mut upstream_buf),
            );
            let client_read = tokio::time::timeout(
                crate::config::POLL_TIMEOUT,
                self.client.read(&mut client_buf),
            );

            enum Event {
                Upstream(usize),
                Client(usize),
                Idle,
            }

            let event = tokio::select! {
                result = upstream_read => match result {
                    Ok(Ok(n)) => Event::Upstream(n),
                    Ok(Err(e)) => return Err(SessionError::Read(e)),
                    Err(_) => Event::Idle,
                },
                result = client_read => match result {
                    Ok(Ok(n)) => Event::Client(n),
                    Ok(Err(e)) => return Err(SessionError::Read(e)),
                    Err(_) => Event::Idle,
                },
            };

            match event {
                Event::Idle => continue,
                Event::Upstream(0) | Event::Client(0) => return Ok(()),
                Event::Upstream(n) => {
                    let chunk = &upstream_buf[..n];
                    let (out, truncated) = substitute_bounded(chunk, &self.config.rules, max_substituted);
                    if truncated {
                        warn!("session {}: inbound substitution output truncated", self.peer_addr);
                    }
                    self.client
                        .write_all(&out)
                        .await
                        .map_err(SessionError::Write)?;
                    self.client.flush().await.map_err(SessionError::Write)?;
                    // Transcript entry is emitted after the forward write completes.
                    self.emit(Direction::Inbound, &out);
                }
                Event::Client(n) => {
                    let chunk = &client_buf[..n];
                    let (out, truncated) = substitute_bounded(chunk, &self.config.rules, max_substituted);
                    if truncated {
                        warn!("session {}: outbound substitution output truncated", self.peer_addr);
                    }
                    upstream.write_all(&out).await.map_err(SessionError::Write)?;
                    upstream.flush().await.map_err(SessionError::Write)?;
                    self.emit(Direction::Outbound, &out);
                }
            }
        }
    }

    fn emit(&self, direction: Direction, chunk: &[u8]) {
        let block = format_chunk(chunk, direction, self.config.display_mode);
        if !block.is_empty() {
            self.sink.write(&block);
        }
    }
}
