//! # Application Module
//!
//! Core relay logic: the per-connection session state machine, the byte
//! substitution engine, and the transcript formatter. These are the pieces
//! that know about the proxy's behavior; `system` only knows how to accept
//! sockets and write output.
pub mod relay;
pub mod substitute;
pub mod transcript;
