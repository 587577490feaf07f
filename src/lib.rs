//! tengok installer.
//!
//! Resolves the pre-built tengok release asset for this machine, downloads it
//! into a scoped staging directory and installs it into `~/.local/bin` or
//! `/usr/local/bin`, asking the operator through the controlling terminal
//! whenever a decision is needed.

pub mod logger;

pub mod cli;
pub mod commands;
pub mod libs;
pub mod schemas;
