//! Fuzzy string matching for query encoding.
//!
//! Queries are matched against the learned vocabulary with bounded
//! Damerau-Levenshtein distance, and near-miss tokens contribute decayed
//! feature weights instead of being dropped.

pub mod levenshtein;
pub mod matcher;

// Re-export commonly used types
pub use levenshtein::*;
pub use matcher::*;
