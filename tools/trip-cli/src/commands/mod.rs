//! CLI command implementations.

pub mod book;
pub mod cart;
pub mod config;
pub mod login;

use chrono::NaiveDate;
use clap::{Args, Subcommand};

/// Arguments for the login command.
#[derive(Args)]
pub struct LoginArgs {
    /// Bearer token (prompted for when omitted).
    #[arg(short, long)]
    pub token: Option<String>,
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: CartCommand,
}

/// Cart subcommands.
#[derive(Subcommand)]
pub enum CartCommand {
    /// List the cart.
    List {
        /// Group line items of the same activity into one row.
        #[arg(short, long)]
        merged: bool,
    },

    /// Add units of an activity to the cart.
    Add {
        /// Activity ID.
        activity: String,

        /// Number of units.
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        /// Check-in date (YYYY-MM-DD).
        #[arg(long, requires = "check_out")]
        check_in: Option<NaiveDate>,

        /// Check-out date (YYYY-MM-DD).
        #[arg(long, requires = "check_in")]
        check_out: Option<NaiveDate>,
    },

    /// Remove line items.
    Remove {
        /// Line item IDs.
        #[arg(required = true)]
        ids: Vec<String>,

        /// Skip confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },

    /// Increase a line item's quantity by one.
    Inc {
        /// Line item ID.
        id: String,
    },

    /// Decrease a line item's quantity by one (removes it at one).
    Dec {
        /// Line item ID.
        id: String,
    },

    /// Set a line item's quantity.
    Update {
        /// Line item ID.
        id: String,

        /// New quantity.
        quantity: u32,
    },

    /// Show the cart total, or the total of selected activities.
    Total {
        /// Activity IDs to include (default: the whole cart).
        #[arg(short, long)]
        select: Vec<String>,
    },
}

/// Arguments for the book command.
#[derive(Args)]
pub struct BookArgs {
    /// Activity ID.
    pub activity: String,

    /// Number of units.
    #[arg(short, long, default_value_t = 1)]
    pub quantity: u32,

    /// Check-in date (YYYY-MM-DD).
    #[arg(long)]
    pub check_in: NaiveDate,

    /// Check-out date (default: the day after check-in).
    #[arg(long)]
    pub check_out: Option<NaiveDate>,

    /// Book now and continue to checkout.
    #[arg(long)]
    pub now: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,

    /// Initialize a new config file.
    Init {
        /// Overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}
