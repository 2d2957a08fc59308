//! Command-line interface definitions for aurora

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI structure for the aurora application
#[derive(Parser)]
#[command(name = "aurora")]
#[command(version)]
#[command(about = "Rich-text editing core for novel writing", long_about = None)]
pub struct Cli {
    /// Editor configuration file (defaults to ./aurora.toml when present)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for aurora
#[derive(Subcommand)]
pub enum Commands {
    /// Import a Markdown manuscript and print its status bar
    Stats {
        /// Markdown file to measure
        file: PathBuf,
    },

    /// Import a Markdown manuscript and write the document snapshot as JSON
    Snapshot {
        /// Markdown file to import
        file: PathBuf,

        /// Output file (defaults to standard output)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a default aurora.toml
    Init {
        /// Directory to initialize (defaults to current directory)
        path: Option<PathBuf>,

        /// Overwrite an existing aurora.toml
        #[arg(short, long)]
        force: bool,
    },
}
