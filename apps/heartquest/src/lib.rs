//! # HeartQuest
//!
//! Server and CLI around `heartquest-core`.
//!
//! The binary in `main.rs` only sets up logging and hands off to [`cli`];
//! everything else lives here so integration tests can build the router
//! without a socket.

pub mod api;
pub mod cli;
pub mod config;
