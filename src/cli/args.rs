//! Command line argument parsing for the symsearch CLI using clap.

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// symsearch - fuzzy probabilistic stock symbol search
#[derive(Parser, Debug, Clone)]
#[command(name = "symsearch")]
#[command(about = "Resolve free-text queries to the most probable stock symbols")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct SymSearchArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl SymSearchArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train a model from a symbol records file
    Train(TrainArgs),

    /// Search a trained model
    Search(SearchArgs),
}

/// Arguments for training a model
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Path to the symbol records file (JSON array of {symbol, description})
    #[arg(value_name = "RECORDS_FILE")]
    pub records_file: PathBuf,

    /// Path to the model directory (created if absent)
    #[arg(value_name = "MODEL_DIR")]
    pub model_dir: PathBuf,

    /// Alpha for Laplace smoothing
    #[arg(long, default_value = "1.0")]
    pub alpha: f64,

    /// Gamma for fuzzy match decay
    #[arg(long, default_value = "0.75")]
    pub gamma: f64,
}

/// Arguments for searching a model
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Path to the model directory
    #[arg(value_name = "MODEL_DIR")]
    pub model_dir: PathBuf,

    /// Number of symbols to display
    #[arg(long, default_value = "5")]
    pub topn: usize,

    /// Maximum edit distance allowed (0 disables fuzzy matching)
    #[arg(long, default_value = "1")]
    pub maxedit: usize,

    /// One-shot query; without it an interactive prompt is started
    #[arg(short = 'Q', long)]
    pub query: Option<String>,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_train_command() {
        let args = SymSearchArgs::parse_from([
            "symsearch", "train", "symbols.json", "model", "--alpha", "0.5", "--gamma", "0.9",
        ]);

        match args.command {
            Command::Train(train_args) => {
                assert_eq!(train_args.records_file, PathBuf::from("symbols.json"));
                assert_eq!(train_args.model_dir, PathBuf::from("model"));
                assert_eq!(train_args.alpha, 0.5);
                assert_eq!(train_args.gamma, 0.9);
            }
            _ => panic!("Expected train command"),
        }
    }

    #[test]
    fn test_parse_search_defaults() {
        let args = SymSearchArgs::parse_from(["symsearch", "search", "model"]);

        match args.command {
            Command::Search(search_args) => {
                assert_eq!(search_args.topn, 5);
                assert_eq!(search_args.maxedit, 1);
                assert!(search_args.query.is_none());
            }
            _ => panic!("Expected search command"),
        }
    }

    #[test]
    fn test_verbosity() {
        let args = SymSearchArgs::parse_from(["symsearch", "-q", "search", "model"]);
        assert_eq!(args.verbosity(), 0);

        let args = SymSearchArgs::parse_from(["symsearch", "-vv", "search", "model"]);
        assert_eq!(args.verbosity(), 2);

        let args = SymSearchArgs::parse_from(["symsearch", "search", "model"]);
        assert_eq!(args.verbosity(), 1);
    }

    #[test]
    fn test_output_format_selection() {
        let args = SymSearchArgs::parse_from(["symsearch", "-f", "json", "search", "model"]);
        assert!(matches!(args.output_format, OutputFormat::Json));
    }
}
