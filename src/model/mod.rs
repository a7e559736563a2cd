//! Model artifact persistence.
//!
//! A trained model is persisted as a directory of independent JSON
//! documents so each logical piece (vocabulary, symbol weights,
//! hyperparameters, classifier parameters) can be inspected on its own.
//! Writes go through temporary names and a final rename pass so a reader
//! never observes a partially written artifact set.

pub mod store;

// Re-export commonly used types
pub use store::*;
