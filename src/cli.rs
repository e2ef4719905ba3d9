use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// PIMS - keep track of projects, their sector, budget and schedule
#[derive(Parser, Debug)]
#[command(name = "pims")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Use a throwaway in-memory store instead of PostgreSQL
    #[arg(long, global = true)]
    pub memory: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the interactive project browser (default)
    Tui,

    /// Apply pending database migrations
    Migrate,

    /// List all projects ordered by name
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show a single project
    Show {
        id: i32,

        #[arg(long)]
        json: bool,
    },

    /// Create a project and print its id
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        sector: String,

        /// Decimal amount, at most 15 digits with 2 decimal places
        #[arg(long)]
        budget: BigDecimal,

        /// YYYY-MM-DD
        #[arg(long)]
        start_date: NaiveDate,

        /// YYYY-MM-DD
        #[arg(long)]
        end_date: NaiveDate,
    },

    /// Delete a project
    Delete { id: i32 },
}
