//! Text analysis module for symsearch.
//!
//! This module provides the tokenization used both when ingesting symbol
//! metadata and when encoding queries. The analysis rules are intentionally
//! minimal: the feature space is built from raw lowercase tokens so that a
//! query string and a stored description land in the same space.

pub mod tokenizer;

// Re-export commonly used types
pub use tokenizer::*;
