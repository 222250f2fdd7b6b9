//! File-backed inputs for the CLI.

pub mod config;
pub mod document;
