//! Error types for configuration validation and per-session failures.
//!
//! Mirrors the two error categories in the proxy's failure model: errors
//! that stop the process before the acceptor starts (`ConfigError`), and
//! errors that end exactly one session without affecting the acceptor or
//! any other connection (`SessionError`).

use thiserror::Error;

/// Startup-time configuration problems. Fatal: `main` reports these and
/// exits before any socket is bound.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("port must be between 1 and 65535, got {0}")]
    InvalidPort(i64),

    #[error("only one of --raw, --strip, --hex, --auto may be selected")]
    ConflictingDisplayModes,

    #[error("--auto chunk width must be a positive integer, got {0}")]
    InvalidAutoWidth(i64),

    #[error("--replace requires both a pattern and a replacement operand")]
    MissingReplaceOperand,

    #[error("--replace pattern/replacement must be at most {max} bytes, got {len}")]
    ReplaceOperandTooLong { len: usize, max: usize },

    #[error("at most {max} --replace rules are allowed, got {count}")]
    TooManyReplaceRules { count: usize, max: usize },
}

/// Problems that terminate a single relay session. Never propagates to the
/// acceptor or to any other session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to resolve or connect to upstream: {0}")]
    UpstreamConnect(#[source] std::io::Error),

    #[error("read from peer failed: {0}")]
    Read(#[source] std::io::Error),

    #[error("write to peer failed: {0}")]
    Write(#[source] std::io::Error),
}
