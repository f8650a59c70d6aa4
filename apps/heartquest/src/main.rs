//! # HeartQuest
//!
//! The main binary for the HeartQuest puzzle server.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────┐
//! │             apps/heartquest (THE BINARY)          │
//! │                                                   │
//! │   ┌─────────────┐            ┌─────────────┐      │
//! │   │    CLI      │            │  HTTP API   │      │
//! │   │   (clap)    │            │   (axum)    │      │
//! │   └──────┬──────┘            └──────┬──────┘      │
//! │          └──────────────┬───────────┘             │
//! │                         ▼                         │
//! │                ┌─────────────────┐                │
//! │                │ heartquest-core │                │
//! │                │   (THE LOGIC)   │                │
//! │                └─────────────────┘                │
//! └───────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! heartquest server --host 0.0.0.0 --port 8080
//! heartquest --config heartquest.toml server
//! heartquest stages
//! heartquest check --stage bitwise --answer 6 --operands 12,10
//! ```

use clap::Parser;
use heartquest::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // HEARTQUEST_LOG_FORMAT=json enables machine-parseable output.
    let log_format =
        std::env::var("HEARTQUEST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "heartquest=debug,heartquest_core=debug,tower_http=debug"
    } else {
        "heartquest=info,tower_http=debug"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

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

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the HeartQuest startup banner.
fn print_banner() {
    println!(
        r#"
    ♥ ♥   ♥ ♥
   ♥    ♥    ♥     H E A R T Q U E S T
    ♥       ♥
      ♥   ♥        v{}
        ♥
                   Bitwise • Binary • ASCII • Connect
"#,
        env!("CARGO_PKG_VERSION")
    );
}
