//! Immutable proxy configuration.
//!
//! A single [`ProxyConfig`] is built once at startup from validated CLI
//! arguments and shared read-only (via `Arc`) by every relay session. It
//! never changes for the lifetime of the process; there is no live
//! reconfiguration.

use crate::error::ConfigError;

/// Maximum number of `--replace` rules accepted.
pub const MAX_REPLACE_RULES: usize = 50;
/// Maximum length, in bytes, of a single pattern or replacement operand.
pub const MAX_REPLACE_OPERAND: usize = 512;
/// Size of each per-session scratch read buffer.
pub const READ_BUFFER_SIZE: usize = 1024;
/// Bound on substitution output for one chunk: generous headroom for
/// pathological replacement expansion without unbounded growth.
pub const SUBSTITUTE_BUFFER_FACTOR: usize = 4;
/// Design-level readiness poll timeout; exists only to keep the relay loop
/// responsive to shutdown, not a correctness deadline.
pub const POLL_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(2);

/// Transcript display mode. At most one is ever active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// No transcript emitted.
    None,
    /// Payload bytes inserted verbatim.
    Raw,
    /// Non-printable bytes replaced with `.`.
    Strip,
    /// Canonical 16-byte-per-row hex dump.
    Hex,
    /// Escaped form, chunked every `N` input bytes.
    Auto(u32),
}

/// One ordered pattern/replacement rule. An empty `pattern` acts as an
/// end-of-list sentinel: [`crate::app::substitute::substitute`] stops
/// applying rules as soon as it sees one.
#[derive(Debug, Clone)]
pub struct SubstitutionRule {
    pub pattern: Vec<u8>,
    pub replacement: Vec<u8>,
}

/// Direction of a forwarded chunk, used by the transcript formatter and by
/// logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Client → upstream.
    Outbound,
    /// Upstream → client.
    Inbound,
}

impl Direction {
    pub fn prefix(self) -> &'static str {
        match self {
            Direction::Outbound => "--> ",
            Direction::Inbound => "<-- ",
        }
    }
}

/// Immutable, process-wide proxy configuration.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub src_port: u16,
    pub server: String,
    pub dst_port: u16,
    pub display_mode: DisplayMode,
    pub rules: Vec<SubstitutionRule>,
}

impl ProxyConfig {
    pub fn upstream_addr(&self) -> (String, u16) {
        (self.server.clone(), self.dst_port)
    }
}

pub fn validate_port(raw: i64) -> Result<u16, ConfigError> {
    if raw < 1 || raw > 65535 {
        return Err(ConfigError::InvalidPort(raw));
    }
    Ok(raw as u16)
}
