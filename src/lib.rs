//! Versioned, self-healing configuration store for the `lai` CLI.
//!
//! The document lives at `~/.lai/config.toml`. Every load checks its schema
//! version; an older file is backed up, merged with the current defaults
//! (user values always win) and rewritten. Backups can be listed, restored
//! and rotated.

pub mod cli;
pub mod config;
pub mod logging;
