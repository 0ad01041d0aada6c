//! Trip CLI - Command line client for the activity booking cart.
//!
//! Commands:
//! - `trip login` - Store an API token
//! - `trip logout` - Forget the stored token
//! - `trip cart` - List, add, remove and adjust cart items
//! - `trip book` - Book an activity for given dates
//! - `trip config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use trip_cart::CartError;

use commands::{BookArgs, CartArgs, ConfigArgs, LoginArgs};

/// Trip CLI - Manage your activity bookings from the terminal
#[derive(Parser)]
#[command(name = "trip")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Named environment from the config file
    #[arg(short, long, global = true)]
    env: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store an API token
    Login(LoginArgs),

    /// Forget the stored token
    Logout,

    /// Work with the cart
    Cart(CartArgs),

    /// Book an activity
    Book(BookArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "warn,trip_cart=debug,trip_data=debug,trip_cache=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let ctx = context::Context::load(cli.config.as_deref(), cli.env.as_deref(), output)?;

    // Execute command
    let result = match cli.command {
        Commands::Login(args) => commands::login::run(args, &ctx).await,
        Commands::Logout => commands::login::logout(&ctx).await,
        Commands::Cart(args) => commands::cart::run(args, &ctx).await,
        Commands::Book(args) => commands::book::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        if matches!(e.downcast_ref::<CartError>(), Some(CartError::SessionExpired)) {
            // Let the delayed login redirect print before exiting.
            let delay = ctx.config.session_config().login_redirect_delay;
            tokio::time::sleep(delay + Duration::from_millis(50)).await;
        } else {
            ctx.output.error(&format!("{:#}", e));
        }
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_add_dates_come_in_pairs() {
        let parse = |args: &[&str]| {
            Cli::try_parse_from([&["trip", "cart", "add", "A1"][..], args].concat())
        };

        assert!(parse(&["--check-in", "2025-05-10"]).is_err());
        assert!(parse(&["--check-out", "2025-05-11"]).is_err());
        assert!(parse(&["--check-in", "2025-05-10", "--check-out", "2025-05-11"]).is_ok());
        assert!(parse(&["--quantity", "2"]).is_ok());
    }
}
