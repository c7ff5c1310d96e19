//! End-to-end relay tests: spawn the binary's building blocks directly
//! against a local echo upstream, then drive it with a raw `TcpStream`
//! client, the same style used across the example pack's integration
//! tests.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use relay_core::app::relay::RelaySession;
use relay_core::config::{DisplayMode, ProxyConfig, SubstitutionRule};
use relay_core::system::writer::TranscriptSink;

/// A minimal blocking echo server used as the fixed upstream in these
/// tests: every byte read is written straight back.
fn spawn_echo_upstream() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    thread::spawn(move || {
        for stream in listener.incoming() {
            let mut stream = match stream {
                Ok(s) => s,
                Err(_) => continue,
            };
            thread::spawn(move || {
                let mut buf = [0u8; 1024];
                loop {
                    match stream.read(&mut buf) {
                        Ok(0) | Err(_) => return,
                        Ok(n) => {
                            if stream.write_all(&buf[..n]).is_err() {
                                return;
                            }
                        }
                    }
                }
            });
        }
    });
    port
}

struct CollectingSink {
    blocks: std::sync::Mutex<Vec<Vec<u8>>>,
}

impl TranscriptSink for CollectingSink {
    fn write(&self, block: &[u8]) {
        self.blocks.lock().unwrap().push(block.to_vec());
    }
}

async fn run_one_session(config: ProxyConfig, sink: Arc<dyn TranscriptSink>) -> u16 {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let config = Arc::new(config);
    tokio::spawn(async move {
        if let Ok((client, peer_addr)) = listener.accept().await {
            RelaySession::new(client, peer_addr, config, sink).run().await;
        }
    });
    // Give the acceptor a moment to reach `accept().await`.
    tokio::time::sleep(Duration::from_millis(20)).await;
    port
}

#[tokio::test]
async fn echoes_bytes_unchanged_with_no_display_mode() {
    let upstream_port = spawn_echo_upstream();
    let config = ProxyConfig {
        src_port: 0,
        server: "127.0.0.1".to_string(),
        dst_port: upstream_port,
        display_mode: DisplayMode::None,
        rules: vec![],
    };
    let sink: Arc<dyn TranscriptSink> = Arc::new(CollectingSink { blocks: std::sync::Mutex::new(vec![]) });
    let relay_port = run_one_session(config, Arc::clone(&sink)).await;

    let mut client = TcpStream::connect(("127.0.0.1", relay_port)).unwrap();
    client.write_all(b"hello\n").unwrap();

    let mut buf = [0u8; 64];
    let n = client.read(&mut buf).unwrap();
    assert_eq!(&buf[..n], b"hello\n");
}

#[tokio::test]
async fn substitution_rewrites_both_directions() {
    // Mirrors scenario S2: a "cat" -> "dog" rule rewrites the client's
    // outbound bytes before they reach upstream; the echoed-back "dog"
    // text has no further "cat" to match on the way back.
    let upstream_port = spawn_echo_upstream();
    let config = ProxyConfig {
        src_port: 0,
        server: "127.0.0.1".to_string(),
        dst_port: upstream_port,
        display_mode: DisplayMode::None,
        rules: vec![SubstitutionRule {
            pattern: b"cat".to_vec(),
            replacement: b"dog".to_vec(),
        }],
    };
    let sink: Arc<dyn TranscriptSink> = Arc::new(CollectingSink { blocks: std::sync::Mutex::new(vec![]) });
    let relay_port = run_one_session(config, sink).await;

    let mut client = TcpStream::connect(("127.0.0.1", relay_port)).unwrap();
    client.write_all(b"the cat sat\n").unwrap();

    let mut buf = [0u8; 64];
    let n = client.read(&mut buf).unwrap();
    assert_eq!(&buf[..n], b"the dog sat\n");
}

#[tokio::test]
async fn closing_the_client_socket_ends_the_session_without_hanging() {
    let upstream_port = spawn_echo_upstream();
    let config = ProxyConfig {
        src_port: 0,
        server: "127.0.0.1".to_string(),
        dst_port: upstream_port,
        display_mode: DisplayMode::None,
        rules: vec![],
    };
    let sink: Arc<dyn TranscriptSink> = Arc::new(CollectingSink { blocks: std::sync::Mutex::new(vec![]) });
    let relay_port = run_one_session(config, sink).await;

    {
        let client = TcpStream::connect(("127.0.0.1", relay_port)).unwrap();
        drop(client);
    }
    // The relayed session should observe EOF on the client side and return
    // without needing the poll timeout to fire.
    tokio::time::sleep(Duration::from_millis(100)).await;
}
