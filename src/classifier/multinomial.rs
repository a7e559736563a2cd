//! Multinomial naive Bayes with Laplace smoothing.

use serde::{Deserialize, Serialize};

use crate::classifier::Classifier;
use crate::error::{Result, SymSearchError};
use crate::feature::{SparseVector, TrainingMatrix};

/// Default Laplace smoothing constant.
pub const DEFAULT_ALPHA: f64 = 1.0;

/// Parameters produced by a completed training pass.
///
/// `classes` holds labels in first-appearance order of the training labels;
/// that order governs tie-breaking in ambiguous outputs and is persisted
/// verbatim. `feature_log_probs[c][f]` is the smoothed conditional
/// log-probability of feature `f` under class `c`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedParameters {
    /// Class labels in training order.
    pub classes: Vec<String>,
    /// Log prior probability per class.
    pub class_log_priors: Vec<f64>,
    /// (classes x vocabulary) smoothed conditional log-probability matrix.
    pub feature_log_probs: Vec<Vec<f64>>,
}

impl TrainedParameters {
    /// Check internal shape consistency: one prior and one probability row
    /// per class, all rows of equal width.
    pub fn validate(&self) -> Result<()> {
        if self.class_log_priors.len() != self.classes.len()
            || self.feature_log_probs.len() != self.classes.len()
        {
            return Err(SymSearchError::corrupt_artifact(format!(
                "classifier parameters disagree on class count: {} labels, {} priors, {} probability rows",
                self.classes.len(),
                self.class_log_priors.len(),
                self.feature_log_probs.len()
            )));
        }

        let width = self.num_features();
        if self.feature_log_probs.iter().any(|row| row.len() != width) {
            return Err(SymSearchError::corrupt_artifact(
                "classifier probability rows have inconsistent widths",
            ));
        }

        Ok(())
    }

    /// Number of classes.
    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    /// Width of the probability matrix (vocabulary size at training time).
    pub fn num_features(&self) -> usize {
        self.feature_log_probs.first().map_or(0, Vec::len)
    }
}

/// A multinomial event-count naive Bayes classifier.
///
/// Training derives class priors from label counts and per-feature
/// conditional log-probabilities with Laplace/Lidstone smoothing; scoring
/// combines them into a posterior via a numerically stable softmax.
/// The classifier moves one way from untrained to trained; retraining
/// replaces the parameters wholesale.
#[derive(Debug, Clone)]
pub struct MultinomialNaiveBayes {
    alpha: f64,
    parameters: Option<TrainedParameters>,
}

impl MultinomialNaiveBayes {
    /// Create an untrained classifier with the given smoothing constant.
    pub fn new(alpha: f64) -> Self {
        MultinomialNaiveBayes {
            alpha,
            parameters: None,
        }
    }

    /// Rebuild a trained classifier from persisted parameters.
    pub fn from_parameters(alpha: f64, parameters: TrainedParameters) -> Result<Self> {
        parameters.validate()?;
        Ok(MultinomialNaiveBayes {
            alpha,
            parameters: Some(parameters),
        })
    }

    /// The smoothing constant.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// The trained parameters.
    pub fn parameters(&self) -> Result<&TrainedParameters> {
        self.parameters
            .as_ref()
            .ok_or_else(|| SymSearchError::not_trained("classifier has not been trained"))
    }
}

impl Classifier for MultinomialNaiveBayes {
    fn train(&mut self, matrix: &TrainingMatrix, labels: &[String]) -> Result<()> {
        if labels.len() != matrix.num_rows() {
            return Err(SymSearchError::invalid_input(format!(
                "label count {} does not match matrix row count {}",
                labels.len(),
                matrix.num_rows()
            )));
        }
        if labels.is_empty() {
            return Err(SymSearchError::invalid_input(
                "cannot train on an empty matrix",
            ));
        }

        let num_features = matrix.num_cols();

        // Classes in first-appearance order of the labels.
        let mut classes: Vec<String> = Vec::new();
        let mut class_index: ahash::AHashMap<&str, usize> = ahash::AHashMap::new();
        for label in labels {
            if !class_index.contains_key(label.as_str()) {
                class_index.insert(label.as_str(), classes.len());
                classes.push(label.clone());
            }
        }

        // Per-class row counts and per-class feature weight sums.
        let mut row_counts = vec![0usize; classes.len()];
        let mut feature_sums = vec![vec![0.0f64; num_features]; classes.len()];
        for (row, label) in matrix.iter_rows().zip(labels) {
            let class = class_index[label.as_str()];
            row_counts[class] += 1;
            for (feature, weight) in row.iter() {
                feature_sums[class][feature] += weight;
            }
        }

        let total_rows = labels.len() as f64;
        let class_log_priors: Vec<f64> = row_counts
            .iter()
            .map(|count| (*count as f64 / total_rows).ln())
            .collect();

        // Laplace-smoothed conditional log-probabilities:
        // ln((sum_cf + alpha) / (sum_c + alpha * |V|)).
        let feature_log_probs: Vec<Vec<f64>> = feature_sums
            .into_iter()
            .map(|sums| {
                let class_total: f64 = sums.iter().sum();
                let denominator = (class_total + self.alpha * num_features as f64).ln();
                sums.into_iter()
                    .map(|sum| (sum + self.alpha).ln() - denominator)
                    .collect()
            })
            .collect();

        self.parameters = Some(TrainedParameters {
            classes,
            class_log_priors,
            feature_log_probs,
        });
        Ok(())
    }

    fn predict_proba(&self, features: &SparseVector) -> Result<Vec<f64>> {
        let parameters = self.parameters()?;
        if features.dims() != parameters.num_features() {
            return Err(SymSearchError::vocabulary_mismatch(format!(
                "feature vector width {} does not match trained width {}",
                features.dims(),
                parameters.num_features()
            )));
        }

        // Unnormalized log posterior per class.
        let log_scores: Vec<f64> = parameters
            .classes
            .iter()
            .enumerate()
            .map(|(class, _)| {
                let log_probs = &parameters.feature_log_probs[class];
                let likelihood: f64 = features
                    .iter()
                    .map(|(feature, weight)| weight * log_probs[feature])
                    .sum();
                parameters.class_log_priors[class] + likelihood
            })
            .collect();

        // Numerically stable softmax: subtract the max before exponentiating.
        let max_score = log_scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exp_scores: Vec<f64> = log_scores
            .iter()
            .map(|score| (score - max_score).exp())
            .collect();
        let normalizer: f64 = exp_scores.iter().sum();

        Ok(exp_scores.into_iter().map(|s| s / normalizer).collect())
    }

    fn classes(&self) -> Result<&[String]> {
        Ok(&self.parameters()?.classes)
    }

    fn is_trained(&self) -> bool {
        self.parameters.is_some()
    }
}
