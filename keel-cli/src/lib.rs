//! Keel CLI - Command-line interface for Keel schema migrations.
//!
//! This crate provides the `keel` binary: configuration discovery, terminal
//! confirmation and progress, and mapping migration outcomes to exit codes.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
