//! CLI module for cup-analyst.

pub mod commands;
mod output;
pub mod preflight;

pub use output::{format_size, Output};

use clap::{Parser, Subcommand};

/// cup-analyst - FIFA World Cup match analyst
///
/// Index the World Cup matches CSV into a local vector store and ask
/// questions about it with a local Ollama model.
#[derive(Parser, Debug)]
#[command(name = "cup-analyst")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
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
    /// Show whether Ollama is online and the match database is ready
    Status,

    /// Build the match database from the CSV file
    Index {
        /// CSV file to index (defaults to dataset.csv_path)
        #[arg(long)]
        csv: Option<String>,

        /// Index even if the collection already has documents (creates duplicates)
        #[arg(long, conflicts_with = "rebuild")]
        append: bool,

        /// Delete the existing collection before indexing
        #[arg(long)]
        rebuild: bool,
    },

    /// Ask a single question about World Cup matches
    Ask {
        /// The question to ask
        question: String,
    },

    /// Start an interactive chat session
    Chat,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_index_flags() {
        let cli = Cli::parse_from(["cup-analyst", "-vv", "index", "--csv", "m.csv", "--rebuild"]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Index { csv, append, rebuild } => {
                assert_eq!(csv.as_deref(), Some("m.csv"));
                assert!(!append);
                assert!(rebuild);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_append_conflicts_with_rebuild() {
        let result = Cli::try_parse_from(["cup-analyst", "index", "--append", "--rebuild"]);
        assert!(result.is_err());
    }
}
