//! Command implementations for the symsearch CLI.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::time::Instant;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::document::SymbolRecord;
use crate::engine::SymbolExtractor;
use crate::error::{Result, SymSearchError};

/// Execute a CLI command.
pub fn execute_command(args: SymSearchArgs) -> Result<()> {
    match &args.command {
        Command::Train(train_args) => train_model(train_args.clone(), &args),
        Command::Search(search_args) => search_model(search_args.clone(), &args),
    }
}

/// Train a model from a records file and persist it.
fn train_model(args: TrainArgs, cli_args: &SymSearchArgs) -> Result<()> {
    if cli_args.verbosity() > 0 {
        println!("Loading symbol records from: {}", args.records_file.display());
    }

    let file = File::open(&args.records_file)?;
    let records: Vec<SymbolRecord> = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| SymSearchError::invalid_input(format!("failed to parse records file: {e}")))?;

    if cli_args.verbosity() > 1 {
        println!("Read {} records", records.len());
    }

    let mut extractor = SymbolExtractor::with_hyperparameters(args.alpha, args.gamma)?;
    for record in &records {
        extractor.ingest_record(record)?;
    }

    let start = Instant::now();
    extractor.train()?;
    extractor.save(&args.model_dir)?;

    output_training_result(
        &TrainingResult {
            model_dir: args.model_dir.to_string_lossy().to_string(),
            num_symbols: extractor.num_symbols(),
            vocabulary_size: extractor.vocabulary_size()?,
            duration_ms: start.elapsed().as_millis() as u64,
        },
        cli_args,
    )
}

/// Search a trained model, either one-shot or interactively.
fn search_model(args: SearchArgs, cli_args: &SymSearchArgs) -> Result<()> {
    if cli_args.verbosity() > 1 {
        println!("Loading model from: {}", args.model_dir.display());
    }

    let extractor = SymbolExtractor::load(&args.model_dir)?;

    if let Some(query) = &args.query {
        let hits = extractor.search(query, args.topn, args.maxedit)?;
        return output_search_results(
            &SearchResults {
                query: query.clone(),
                hits,
            },
            cli_args,
        );
    }

    // Interactive loop: prompt until an empty line is entered.
    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("Search> ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let query = line.trim();
        if query.is_empty() {
            break;
        }

        let hits = extractor.search(query, args.topn, args.maxedit)?;
        output_search_results(
            &SearchResults {
                query: query.to_string(),
                hits,
            },
            cli_args,
        )?;
    }

    if cli_args.verbosity() > 0 {
        println!("--DONE--");
    }
    Ok(())
}
