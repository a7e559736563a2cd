//! # symsearch
//!
//! Fuzzy probabilistic stock symbol search.
//!
//! Resolves a free-text query (a partially-typed or misspelled company name
//! or ticker) to the most probable stock symbols, tolerating typos and
//! partial matches. Symbol metadata is turned into a weighted token feature
//! space, a multinomial naive Bayes classifier is trained over it, and
//! queries are encoded into the same space with bounded-edit-distance fuzzy
//! matching.
//!
//! ## Example
//!
//! ```
//! use symsearch::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut extractor = SymbolExtractor::new();
//!     extractor.ingest_record(&SymbolRecord::new("AAPL", "apple inc"))?;
//!     extractor.ingest_record(&SymbolRecord::new("GOOG", "alphabet inc"))?;
//!     extractor.train()?;
//!
//!     let hits = extractor.search("aple", 5, 1)?;
//!     assert_eq!(hits[0].symbol, "AAPL");
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod classifier;
pub mod cli;
pub mod document;
pub mod engine;
pub mod error;
pub mod feature;
pub mod model;
pub mod spelling;

pub mod prelude {
    //! Commonly used types, re-exported.
    pub use crate::document::{SymbolHit, SymbolRecord};
    pub use crate::engine::SymbolExtractor;
    pub use crate::error::{Result, SymSearchError};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
