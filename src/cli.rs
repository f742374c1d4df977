use crate::error::ErrorPolicy;
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "td")]
#[command(about = "Named todo lists kept in a single JSON file")]
#[command(version)]
pub struct Cli {
    /// Store file (defaults to $TD_FILE, then ~/.td.json)
    #[arg(long, global = true, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Show item details and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show every list and its items
    Show {
        /// Show priority, urgency, deadline and description
        #[arg(long)]
        all: bool,
    },

    /// Add an item to a list
    Add {
        /// List name
        list: String,
        /// Item name
        name: String,
        /// Tags, repeated or comma separated
        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,
        /// Priority, 1-5
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=5))]
        priority: u8,
        /// Urgency, 1-5
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=5))]
        urgency: u8,
        /// Deadline as YYYY-MM-DD
        #[arg(long, value_parser = parse_deadline)]
        deadline: Option<DateTime<Utc>>,
        /// Description, the rest of the command line
        #[arg(trailing_var_arg = true)]
        description: Vec<String>,
    },

    /// Delete an item after confirmation
    Delete {
        /// List name
        list: String,
        /// Item name
        name: String,
    },

    /// Update an item (not supported yet)
    Update {
        /// List name
        list: String,
        /// Item name
        name: String,
    },

    /// Mark an item as completed (not supported yet)
    Tick {
        /// List name
        list: String,
        /// Item name
        name: String,
    },

    /// Create or delete a list, or print list names
    List {
        /// List name (omit to print all list names)
        name: Option<String>,
        /// Delete the list instead of creating it
        #[arg(short, long, requires = "name")]
        delete: bool,
    },
}

impl Commands {
    /// Delete reports lookup failures and carries on; everything else aborts.
    pub fn error_policy(&self) -> ErrorPolicy {
        match self {
            Commands::Delete { .. } => ErrorPolicy::Reported,
            _ => ErrorPolicy::Fatal,
        }
    }
}

/// Parse `YYYY-MM-DD` as midnight UTC
fn parse_deadline(s: &str) -> Result<DateTime<Utc>, String> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD: {e}"))?;
    date.and_hms_opt(0, 0, 0)
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| format!("{s} has no midnight"))
}
