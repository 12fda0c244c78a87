mod categories;
mod check;
mod config;
mod write;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "regsync")]
#[command(about = "Atomic export writes and sync error classification", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Atomically replace a file with lines read from stdin
    Write {
        /// Destination file
        path: PathBuf,

        /// Read lines from this file instead of stdin
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Refuse the write if the size changes by more than this percentage
        #[arg(long, value_name = "PCT")]
        max_change: Option<u32>,

        /// Skip the durability sync before renaming
        #[arg(long)]
        no_sync: bool,

        /// Leave the destination alone if the content is identical
        #[arg(long)]
        skip_equal: bool,

        /// Create missing parent directories
        #[arg(long)]
        create_dirs: bool,
    },

    /// List sync error categories
    Categories {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Exit 0 if CATEGORY is-a ANCESTOR, 1 otherwise
    Check {
        /// Category name (e.g., LoginError)
        category: String,
        /// Ancestor category name (e.g., SyncError)
        ancestor: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the config file location
    Path,
    /// Print the effective configuration
    Show,
    /// Get a config value
    Get {
        /// Config key (e.g., "writer.sync_data")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key (e.g., "writer.max_change_percent")
        key: String,
        /// New value
        value: String,
    },
}

impl Cli {
    pub fn run(&self) -> Result<ExitCode> {
        match &self.command {
            Commands::Write {
                path,
                input,
                max_change,
                no_sync,
                skip_equal,
                create_dirs,
            } => write::run(
                path,
                input.as_deref(),
                write::Overrides {
                    max_change: *max_change,
                    no_sync: *no_sync,
                    skip_equal: *skip_equal,
                    create_dirs: *create_dirs,
                },
            )?,
            Commands::Categories { json } => categories::run(*json)?,
            Commands::Check { category, ancestor } => return check::run(category, ancestor),
            Commands::Config { action } => match action {
                ConfigAction::Path => config::path()?,
                ConfigAction::Show => config::show()?,
                ConfigAction::Get { key } => config::get(key)?,
                ConfigAction::Set { key, value } => config::set(key, value)?,
            },
        }
        Ok(ExitCode::SUCCESS)
    }
}
