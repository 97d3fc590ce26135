//! CLI module for Tycho.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tycho - NASA Innovation Q&A
///
/// A CLI tool for retrieval-augmented question answering over NASA's
/// TechPort and TechTransfer datasets. The name "Tycho" comes from the
/// lunar crater.
#[derive(Parser, Debug)]
#[command(name = "tycho")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Embed a dataset into a persisted vector index
    Index {
        #[command(subcommand)]
        dataset: Dataset,
    },

    /// Ask a single question and get an answer with sources
    Ask {
        /// The question to ask
        question: String,
    },

    /// Start an interactive chat session with rolling history
    Chat,

    /// Search the indexes for relevant documents without generating an answer
    Search {
        /// Search query
        query: String,

        /// Maximum number of results per index
        #[arg(short, long, default_value = "3")]
        limit: usize,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum Dataset {
    /// Index TechPort R&D projects from a CSV export
    Techport {
        /// Path to the TechPort CSV file
        #[arg(long, default_value = "data/NASA_TechPort.csv")]
        csv: PathBuf,
    },

    /// Index TechTransfer patents fetched from the NASA API
    Techtransfer {
        /// Patent search query (defaults to the configured query)
        #[arg(long)]
        query: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}
