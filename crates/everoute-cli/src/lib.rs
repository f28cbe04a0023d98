//! everoute CLI library.
//!
//! Argument handling lives in `main.rs`; everything that can be tested without
//! spawning the binary lives here.

pub mod commands;
pub mod config;
pub mod logging;
pub mod output;
pub mod terminal;
