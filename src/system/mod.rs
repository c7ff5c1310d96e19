//! # System Module
//!
//! Low-level process plumbing: the TCP accept loop and the transcript
//! output sink. Neither module knows anything about substitution rules or
//! display-mode formatting; that belongs to `app`.
pub mod acceptor;
pub mod writer;
