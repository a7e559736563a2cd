//! The symbol extractor: ingest, train, search, persist.

use std::path::Path;

use crate::classifier::{Classifier, MultinomialNaiveBayes, DEFAULT_ALPHA};
use crate::document::{SymbolHit, SymbolRecord};
use crate::error::{Result, SymSearchError};
use crate::feature::FeatureEngineer;
use crate::model::{Hyperparameters, ModelArtifact, ModelStore};
use crate::spelling::DEFAULT_GAMMA;

/// Default number of results returned by a search.
pub const DEFAULT_TOP_N: usize = 5;

/// Default maximum edit distance for fuzzy query matching.
pub const DEFAULT_MAX_EDIT_DISTANCE: usize = 1;

/// Resolves free-text queries to ranked stock symbols.
///
/// Records are ingested one at a time, [`train`](Self::train) freezes the
/// vocabulary and fits the classifier, and [`search`](Self::search) scores
/// queries against the trained model. Serving methods take `&self` only, so
/// a trained extractor can be shared across threads without locking.
#[derive(Debug)]
pub struct SymbolExtractor {
    engineer: FeatureEngineer,
    classifier: MultinomialNaiveBayes,
}

impl SymbolExtractor {
    /// Create an extractor with default hyperparameters.
    pub fn new() -> Self {
        SymbolExtractor {
            engineer: FeatureEngineer::new(DEFAULT_GAMMA),
            classifier: MultinomialNaiveBayes::new(DEFAULT_ALPHA),
        }
    }

    /// Create an extractor with explicit hyperparameters.
    ///
    /// `alpha` is the Laplace smoothing constant (> 0); `gamma` is the
    /// fuzzy-match decay factor (strictly between 0 and 1).
    pub fn with_hyperparameters(alpha: f64, gamma: f64) -> Result<Self> {
        if !alpha.is_finite() || alpha <= 0.0 {
            return Err(SymSearchError::invalid_input(format!(
                "alpha must be a positive finite number, got {alpha}"
            )));
        }
        if !gamma.is_finite() || gamma <= 0.0 || gamma >= 1.0 {
            return Err(SymSearchError::invalid_input(format!(
                "gamma must lie strictly between 0 and 1, got {gamma}"
            )));
        }

        Ok(SymbolExtractor {
            engineer: FeatureEngineer::new(gamma),
            classifier: MultinomialNaiveBayes::new(alpha),
        })
    }

    /// Ingest one symbol record.
    ///
    /// Ingesting after training is allowed but the new symbol only becomes
    /// searchable after a full retrain; there is no incremental update path.
    pub fn ingest_record(&mut self, record: &SymbolRecord) -> Result<()> {
        self.engineer.ingest_record(record)
    }

    /// Number of ingested symbols.
    pub fn num_symbols(&self) -> usize {
        self.engineer.num_symbols()
    }

    /// Vocabulary size, once trained.
    pub fn vocabulary_size(&self) -> Result<usize> {
        Ok(self.engineer.vocabulary()?.len())
    }

    /// Whether the classifier has been trained.
    pub fn is_trained(&self) -> bool {
        self.classifier.is_trained()
    }

    /// Finalize the vocabulary over everything ingested and fit the
    /// classifier. Replaces any previously trained state wholesale.
    pub fn train(&mut self) -> Result<()> {
        if self.engineer.num_symbols() == 0 {
            return Err(SymSearchError::invalid_input(
                "no symbol records have been ingested",
            ));
        }

        self.engineer.finalize_vocabulary();
        let (matrix, labels) = self.engineer.build_training_matrix()?;
        self.classifier.train(&matrix, &labels)
    }

    /// Posterior probability per symbol for a query string, in class order.
    ///
    /// `max_edit_distance = 0` disables fuzzy matching (exact-token-only
    /// features). Empty or whitespace-only queries are rejected.
    pub fn predict_proba(
        &self,
        query: &str,
        max_edit_distance: usize,
    ) -> Result<Vec<(String, f64)>> {
        if query.trim().is_empty() {
            return Err(SymSearchError::invalid_input(
                "query must not be empty or whitespace-only",
            ));
        }
        if !self.classifier.is_trained() {
            return Err(SymSearchError::not_trained(
                "train or load a model before querying",
            ));
        }

        let features = self.engineer.build_query_vector(query, max_edit_distance)?;
        let probabilities = self.classifier.predict_proba(&features)?;

        Ok(self
            .classifier
            .classes()?
            .iter()
            .cloned()
            .zip(probabilities)
            .collect())
    }

    /// Rank symbols for a query, descending by probability, truncated to
    /// `top_n`.
    pub fn search(
        &self,
        query: &str,
        top_n: usize,
        max_edit_distance: usize,
    ) -> Result<Vec<SymbolHit>> {
        let mut hits: Vec<SymbolHit> = self
            .predict_proba(query, max_edit_distance)?
            .into_iter()
            .map(|(symbol, probability)| SymbolHit::new(symbol, probability))
            .collect();

        hits.sort();
        hits.truncate(top_n);
        Ok(hits)
    }

    /// Persist the trained model as an artifact directory.
    pub fn save(&self, directory: &Path) -> Result<()> {
        let artifact = ModelArtifact {
            vocabulary: self.engineer.vocabulary()?.clone(),
            symbol_weights: self.engineer.symbol_weights().clone(),
            hyperparameters: Hyperparameters {
                alpha: self.classifier.alpha(),
                gamma: self.engineer.gamma(),
            },
            parameters: self.classifier.parameters()?.clone(),
        };
        ModelStore::save(&artifact, directory)
    }

    /// Load a trained model from an artifact directory.
    pub fn load(directory: &Path) -> Result<Self> {
        let artifact = ModelStore::load(directory)?;

        Ok(SymbolExtractor {
            engineer: FeatureEngineer::restore(
                artifact.hyperparameters.gamma,
                artifact.symbol_weights,
                artifact.vocabulary,
            ),
            classifier: MultinomialNaiveBayes::from_parameters(
                artifact.hyperparameters.alpha,
                artifact.parameters,
            )?,
        })
    }
}

impl Default for SymbolExtractor {
    fn default() -> Self {
        SymbolExtractor::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trained_extractor() -> SymbolExtractor {
        let mut extractor = SymbolExtractor::new();
        extractor
            .ingest_record(&SymbolRecord::new("AAPL", "apple inc"))
            .unwrap();
        extractor
            .ingest_record(&SymbolRecord::new("GOOG", "alphabet inc"))
            .unwrap();
        extractor.train().unwrap();
        extractor
    }

    #[test]
    fn test_hyperparameter_validation() {
        assert!(SymbolExtractor::with_hyperparameters(1.0, 0.75).is_ok());
        assert!(SymbolExtractor::with_hyperparameters(0.0, 0.75).is_err());
        assert!(SymbolExtractor::with_hyperparameters(1.0, 1.0).is_err());
        assert!(SymbolExtractor::with_hyperparameters(1.0, 0.0).is_err());
        assert!(SymbolExtractor::with_hyperparameters(f64::NAN, 0.75).is_err());
    }

    #[test]
    fn test_search_before_training_fails() {
        let extractor = SymbolExtractor::new();
        let result = extractor.search("apple", 5, 1);

        assert!(matches!(result, Err(SymSearchError::NotTrained(_))));
    }

    #[test]
    fn test_train_without_records_fails() {
        let mut extractor = SymbolExtractor::new();
        assert!(matches!(
            extractor.train(),
            Err(SymSearchError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_blank_queries_are_rejected() {
        let extractor = trained_extractor();

        assert!(matches!(
            extractor.search("", 5, 1),
            Err(SymSearchError::InvalidInput(_))
        ));
        assert!(matches!(
            extractor.search("   ", 5, 1),
            Err(SymSearchError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_exact_query_ranks_its_symbol_first() {
        let extractor = trained_extractor();

        let hits = extractor.search("apple", 5, 1).unwrap();
        assert_eq!(hits[0].symbol, "AAPL");
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn test_top_n_truncation() {
        let extractor = trained_extractor();

        let hits = extractor.search("inc", 1, 0).unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_retrain_after_new_ingestion() {
        let mut extractor = trained_extractor();
        extractor
            .ingest_record(&SymbolRecord::new("TSLA", "tesla inc"))
            .unwrap();
        extractor.train().unwrap();

        let hits = extractor.search("tesla", 5, 1).unwrap();
        assert_eq!(hits[0].symbol, "TSLA");
        assert_eq!(extractor.num_symbols(), 3);
    }
}
