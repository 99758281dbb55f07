//! # Gradebook CLI Module
//!
//! This module implements the CLI interface for Gradebook.
//!
//! ## Available Commands
//!
//! - `serve` - Start the HTTP server
//! - `init` - Create the data directory and bootstrap records
//! - `status` - Show store counts
//! - `change-password` - Rotate the admin password

mod commands;

use clap::{Parser, Subcommand};
use gradebook_core::GradebookError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Gradebook - flat-file student records server
///
/// Students, subjects and per-stage grades in plain JSON files, gated by a
/// single-admin credential and short-lived session tokens.
#[derive(Parser, Debug)]
#[command(name = "gradebook")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Directory holding the store files (students.json, admin.json, tokens.json)
    #[arg(short = 'D', long, global = true, default_value = "gradebook-data")]
    pub data_dir: PathBuf,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Create the data directory and bootstrap records
    Init,

    /// Show store counts
    Status,

    /// Rotate the admin password
    ChangePassword {
        /// Current password
        #[arg(long)]
        old: String,

        /// New password (minimum 4 characters)
        #[arg(long)]
        new: String,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), GradebookError> {
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Serve { host, port }) => cmd_serve(&cli.data_dir, &host, port).await,
        Some(Commands::Init) => cmd_init(&cli.data_dir),
        Some(Commands::ChangePassword { old, new }) => {
            cmd_change_password(&cli.data_dir, &old, &new)
        }
        // No subcommand - show status by default
        Some(Commands::Status) | None => cmd_status(&cli.data_dir, json_mode),
    }
}
