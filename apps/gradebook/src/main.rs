//! # Gradebook - Student Records Server
//!
//! The main binary for the Gradebook flat-file student records system.
//!
//! This application provides:
//! - HTTP REST API server (axum-based)
//! - CLI interface for store management
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │              apps/gradebook (THE BINARY)             │
//! │                                                      │
//! │   ┌─────────────┐          ┌─────────────┐          │
//! │   │   CLI       │          │   HTTP API  │          │
//! │   │  (clap)     │          │   (axum)    │          │
//! │   └──────┬──────┘          └──────┬──────┘          │
//! │          │                        │                 │
//! │          └───────────┬────────────┘                 │
//! │                      ▼                              │
//! │             ┌────────────────┐                      │
//! │             │ gradebook-core │                      │
//! │             │  (THE LOGIC)   │                      │
//! │             └────────────────┘                      │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! gradebook serve --host 0.0.0.0 --port 8080
//!
//! # Store management
//! gradebook init
//! gradebook status
//! gradebook change-password --old 1234 --new "s3cret"
//! ```

use clap::Parser;
use gradebook::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Initialize tracing — GRADEBOOK_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("GRADEBOOK_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gradebook=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Display startup banner
    if !cli.quiet {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Gradebook startup banner.
fn print_banner() {
    println!(
        r#"
  ┌─────────────────────────────────┐
  │  GRADEBOOK  v{:<18} │
  │  students · subjects · grades   │
  └─────────────────────────────────┘
"#,
        env!("CARGO_PKG_VERSION")
    );
}
