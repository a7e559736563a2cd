//! Input and output document types for symbol search.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SymSearchError};

/// Metadata for one tradable symbol: the class label and its free-text
/// description. One record per distinct symbol; re-ingesting the same
/// symbol replaces its previous token weights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRecord {
    /// Symbol code, e.g. "AAPL". Used as the class label.
    pub symbol: String,
    /// Free-text description, e.g. "Apple Inc. Common Stock".
    pub description: String,
}

impl SymbolRecord {
    /// Create a new symbol record.
    pub fn new<S: Into<String>, D: Into<String>>(symbol: S, description: D) -> Self {
        SymbolRecord {
            symbol: symbol.into(),
            description: description.into(),
        }
    }

    /// Check that both required fields carry non-blank text.
    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(SymSearchError::invalid_input(
                "symbol record has an empty symbol field",
            ));
        }
        if self.description.trim().is_empty() {
            return Err(SymSearchError::invalid_input(format!(
                "symbol record '{}' has an empty description field",
                self.symbol
            )));
        }
        Ok(())
    }
}

/// A ranked search result: a symbol with its posterior probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolHit {
    /// The matched symbol code.
    pub symbol: String,
    /// Posterior probability of the symbol given the query.
    pub score: f64,
}

impl SymbolHit {
    /// Create a new hit.
    pub fn new<S: Into<String>>(symbol: S, score: f64) -> Self {
        SymbolHit {
            symbol: symbol.into(),
            score,
        }
    }
}

impl Eq for SymbolHit {}

impl Ord for SymbolHit {
    fn cmp(&self, other: &Self) -> Ordering {
        // Higher scores come first
        other
            .score
            .partial_cmp(&self.score)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for SymbolHit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_validation() {
        assert!(SymbolRecord::new("AAPL", "apple inc").validate().is_ok());
        assert!(SymbolRecord::new("", "apple inc").validate().is_err());
        assert!(SymbolRecord::new("   ", "apple inc").validate().is_err());
        assert!(SymbolRecord::new("AAPL", "").validate().is_err());
    }

    #[test]
    fn test_hit_ordering() {
        let mut hits = vec![
            SymbolHit::new("GOOG", 0.2),
            SymbolHit::new("AAPL", 0.7),
            SymbolHit::new("MSFT", 0.1),
        ];
        hits.sort();

        assert_eq!(hits[0].symbol, "AAPL");
        assert_eq!(hits[1].symbol, "GOOG");
        assert_eq!(hits[2].symbol, "MSFT");
    }
}
