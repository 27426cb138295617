//! Command-line interface for retroview.
//!
//! This module provides CLI commands for resolving soundtracks, picking
//! movies for genre discs and running a TV session from the terminal.

mod commands;

pub use commands::{Cli, Commands, CredentialArgs, run_command};
