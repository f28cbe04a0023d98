//! Subcommand handlers. Each returns the rendered output; `main.rs` prints it.

pub mod capital;
pub mod jumps;
pub mod route;
