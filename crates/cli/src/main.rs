//! Sheger Market CLI - Demo and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Walk a scripted checkout with the simulated gateway
//! sheger-cli demo --method bank_transfer
//!
//! # Same, with express shipping and mobile money
//! sheger-cli demo --method telebirr --express
//! ```
//!
//! # Commands
//!
//! - `demo` - Run a scripted checkout against the simulated gateway

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "sheger-cli")]
#[command(author, version, about = "Sheger Market CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted checkout against the simulated gateway
    Demo {
        /// Payment method: telebirr, bank_transfer, mastercard, or
        /// cash_on_delivery
        #[arg(short, long, default_value = "telebirr")]
        method: String,
        /// Use express shipping instead of standard
        #[arg(long)]
        express: bool,
    },
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sheger_market_checkout=info,sheger_market_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Demo { method, express } => commands::demo::run(&method, express).await,
    };

    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            std::process::ExitCode::FAILURE
        }
    }
}
