//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, SymSearchArgs};
use crate::document::SymbolHit;
use crate::error::Result;

/// Result structure for model training.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainingResult {
    pub model_dir: String,
    pub num_symbols: usize,
    pub vocabulary_size: usize,
    pub duration_ms: u64,
}

/// Result structure for search operations.
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResults {
    pub query: String,
    pub hits: Vec<SymbolHit>,
}

/// Print a training result in the selected format.
pub fn output_training_result(result: &TrainingResult, args: &SymSearchArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 0 {
                println!(
                    "Trained {} symbols over {} features in {} ms",
                    result.num_symbols, result.vocabulary_size, result.duration_ms
                );
                println!("Model saved to: {}", result.model_dir);
            }
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

/// Print search hits in the selected format.
///
/// Human output is one tab-separated `symbol<TAB>probability` line per hit.
pub fn output_search_results(results: &SearchResults, args: &SymSearchArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            for hit in &results.hits {
                println!("{}\t{}", hit.symbol, hit.score);
            }
            Ok(())
        }
        OutputFormat::Json => output_json(results, args),
    }
}

fn output_json<T: Serialize>(result: &T, args: &SymSearchArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}
