//! Tee Storefront CLI - inspect and reset the page's persistent state.
//!
//! # Usage
//!
//! ```bash
//! # Show the cached product and how old it is
//! tee-cli cache show
//!
//! # Drop the cached product so the next page load refetches
//! tee-cli cache clear
//!
//! # Show calls made in the current rate window
//! tee-cli rate-limit show
//!
//! # Start a fresh rate window
//! tee-cli rate-limit reset
//!
//! # Operate on a specific store file
//! tee-cli --store /tmp/store.json cache show
//! ```
//!
//! # Commands
//!
//! - `cache` - Product cache entry
//! - `rate-limit` - Remote fetch window

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tee_storefront::config::StorefrontConfig;

mod commands;

use commands::CommandError;

#[derive(Parser)]
#[command(name = "tee-cli")]
#[command(author, version, about = "Tee Storefront CLI tools")]
struct Cli {
    /// Store file (default: `STOREFRONT_STORE_PATH` or `.tee-storefront/store.json`)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or clear the product cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
    /// Inspect or reset the remote fetch limit
    RateLimit {
        #[command(subcommand)]
        action: RateLimitAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Show the cached product, its age and freshness
    Show,
    /// Remove the cached product
    Clear,
}

#[derive(Subcommand)]
enum RateLimitAction {
    /// Show the call count and window
    Show,
    /// Remove the call count and window start
    Reset,
}

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => {
            #[allow(clippy::print_stdout)]
            {
                println!("{output}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<String, CommandError> {
    let store_path = match cli.store {
        Some(path) => path,
        None => StorefrontConfig::from_env()?.store_path,
    };
    let store = commands::open_store(&store_path)?;
    let now = chrono::Utc::now().timestamp_millis();

    let output = match cli.command {
        Commands::Cache { action } => match action {
            CacheAction::Show => commands::cache::show(store, now)?,
            CacheAction::Clear => commands::cache::clear(store)?,
        },
        Commands::RateLimit { action } => match action {
            RateLimitAction::Show => commands::rate_limit::show(store, now)?,
            RateLimitAction::Reset => commands::rate_limit::reset(store)?,
        },
    };
    Ok(output)
}
