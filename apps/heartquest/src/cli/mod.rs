//! # HeartQuest CLI Module
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `stages` - List the stages in quest order
//! - `check` - Validate an answer offline through the engine

mod commands;

use clap::{Parser, Subcommand};
use heartquest_core::QuestError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// HeartQuest - a linear puzzle quest
///
/// Four puzzles stand between the visitor and the reward. Each one opens
/// only after the one before it is solved.
#[derive(Parser, Debug)]
#[command(name = "heartquest")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

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
    Server {
        /// Host to bind to (overrides config)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List the stages in quest order
    Stages,

    /// Check an answer against a stage's rule
    Check {
        /// Stage slug (bitwise, base64, ascii, api-connect)
        #[arg(short, long)]
        stage: String,

        /// The answer to check
        #[arg(short, long)]
        answer: Option<String>,

        /// Bitwise operands as "a,b"
        #[arg(short, long)]
        operands: Option<String>,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), QuestError> {
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { host, port }) => {
            cmd_server(cli.config.as_deref(), host, port).await
        }
        Some(Commands::Check {
            stage,
            answer,
            operands,
        }) => cmd_check(json_mode, &stage, answer.as_deref(), operands.as_deref()),
        Some(Commands::Stages) | None => cmd_stages(json_mode),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_check_command() {
        let cli = Cli::parse_from([
            "heartquest",
            "--json-mode",
            "check",
            "--stage",
            "bitwise",
            "--answer",
            "6",
            "--operands",
            "12,10",
        ]);
        assert!(cli.json_mode);
        assert!(matches!(
            cli.command,
            Some(Commands::Check { ref stage, .. }) if stage == "bitwise"
        ));
    }

    #[test]
    fn server_flags_are_optional() {
        let cli = Cli::parse_from(["heartquest", "server", "-p", "9000"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Server { host: None, port: Some(9000) })
        ));
    }
}
