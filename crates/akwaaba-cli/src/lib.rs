//! Akwaaba CLI library.
//!
//! Runs the HTTP server and provides operator commands for user accounts.

pub mod cli;
pub mod commands;
