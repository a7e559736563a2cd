//! Probabilistic classifiers over the symbol feature space.
//!
//! The classifier seam is a capability trait rather than a base type, so an
//! alternative model can be substituted behind the same contract.

pub mod multinomial;

// Re-export commonly used types
pub use multinomial::*;

use crate::error::Result;
use crate::feature::{SparseVector, TrainingMatrix};

/// Trait for classifiers that fit a labeled sparse matrix and score feature
/// vectors against every class.
pub trait Classifier: Send + Sync {
    /// Fit the classifier, replacing any previously trained parameters
    /// wholesale. `labels[i]` is the class of `matrix` row `i`.
    fn train(&mut self, matrix: &TrainingMatrix, labels: &[String]) -> Result<()>;

    /// Posterior probability per class for a feature vector, aligned with
    /// [`classes`](Self::classes). Fails with a not-trained error before
    /// [`train`](Self::train) has completed successfully.
    fn predict_proba(&self, features: &SparseVector) -> Result<Vec<f64>>;

    /// Class labels in training order.
    fn classes(&self) -> Result<&[String]>;

    /// Whether the classifier has been trained.
    fn is_trained(&self) -> bool;
}
