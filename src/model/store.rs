//! Saving and loading model artifacts as a directory of JSON documents.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::classifier::TrainedParameters;
use crate::error::{Result, SymSearchError};
use crate::feature::{SymbolWeightStore, Vocabulary};

/// Artifact format version written to `meta.json`.
pub const FORMAT_VERSION: u32 = 1;

const VOCABULARY_FILE: &str = "vocabulary.json";
const SYMBOL_WEIGHTS_FILE: &str = "symbol_weights.json";
const HYPERPARAMETERS_FILE: &str = "hyperparameters.json";
const CLASSIFIER_FILE: &str = "classifier.json";
const META_FILE: &str = "meta.json";

/// Training-time hyperparameters, persisted alongside the model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    /// Laplace smoothing constant.
    pub alpha: f64,
    /// Fuzzy-match decay factor.
    pub gamma: f64,
}

impl Hyperparameters {
    /// Check that both values are in their valid ranges.
    pub fn validate(&self) -> Result<()> {
        if !self.alpha.is_finite() || self.alpha <= 0.0 {
            return Err(SymSearchError::corrupt_artifact(format!(
                "alpha must be a positive finite number, got {}",
                self.alpha
            )));
        }
        if !self.gamma.is_finite() || self.gamma <= 0.0 || self.gamma >= 1.0 {
            return Err(SymSearchError::corrupt_artifact(format!(
                "gamma must lie strictly between 0 and 1, got {}",
                self.gamma
            )));
        }
        Ok(())
    }
}

/// Descriptive metadata written with every artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMeta {
    /// Artifact format version.
    pub format_version: u32,
    /// When the model was trained.
    pub trained_at: DateTime<Utc>,
    /// Number of trained symbols.
    pub num_symbols: usize,
    /// Vocabulary size at training time.
    pub vocabulary_size: usize,
}

/// The full persisted state of a trained model.
#[derive(Debug, Clone)]
pub struct ModelArtifact {
    /// The frozen token -> index mapping.
    pub vocabulary: Vocabulary,
    /// Per-symbol token weights, kept for future retraining.
    pub symbol_weights: SymbolWeightStore,
    /// Training hyperparameters.
    pub hyperparameters: Hyperparameters,
    /// Trained classifier parameters.
    pub parameters: TrainedParameters,
}

impl ModelArtifact {
    /// Check cross-document consistency: parameter shapes must be internally
    /// consistent and the probability matrix width must equal the vocabulary
    /// size. Performed eagerly at load time, never deferred to first query.
    pub fn validate(&self) -> Result<()> {
        self.hyperparameters.validate()?;
        self.parameters.validate()?;

        if self.parameters.num_features() != self.vocabulary.len() {
            return Err(SymSearchError::vocabulary_mismatch(format!(
                "classifier was trained over {} features but the vocabulary has {} tokens",
                self.parameters.num_features(),
                self.vocabulary.len()
            )));
        }
        Ok(())
    }
}

/// Reads and writes [`ModelArtifact`]s under a model directory.
#[derive(Debug, Clone, Default)]
pub struct ModelStore;

impl ModelStore {
    /// Persist an artifact to `directory`, creating it if needed.
    ///
    /// Every document is first written under a temporary name; only after
    /// all writes succeed are the documents renamed into place.
    pub fn save(artifact: &ModelArtifact, directory: &Path) -> Result<()> {
        artifact.validate()?;
        fs::create_dir_all(directory)?;

        let meta = ModelMeta {
            format_version: FORMAT_VERSION,
            trained_at: Utc::now(),
            num_symbols: artifact.symbol_weights.len(),
            vocabulary_size: artifact.vocabulary.len(),
        };

        let mut staged: Vec<(PathBuf, PathBuf)> = Vec::new();
        let mut stage = |name: &str, json: String| -> Result<()> {
            let final_path = directory.join(name);
            let temp_path = directory.join(format!("{name}.tmp"));
            fs::write(&temp_path, json)?;
            staged.push((temp_path, final_path));
            Ok(())
        };

        stage(
            VOCABULARY_FILE,
            serde_json::to_string_pretty(&artifact.vocabulary.to_index_map())?,
        )?;
        stage(
            SYMBOL_WEIGHTS_FILE,
            serde_json::to_string_pretty(&artifact.symbol_weights)?,
        )?;
        stage(
            HYPERPARAMETERS_FILE,
            serde_json::to_string_pretty(&artifact.hyperparameters)?,
        )?;
        stage(
            CLASSIFIER_FILE,
            serde_json::to_string_pretty(&artifact.parameters)?,
        )?;
        stage(META_FILE, serde_json::to_string_pretty(&meta)?)?;

        for (temp_path, final_path) in staged {
            fs::rename(temp_path, final_path)?;
        }
        Ok(())
    }

    /// Load an artifact from `directory`, validating it eagerly.
    pub fn load(directory: &Path) -> Result<ModelArtifact> {
        let index_map: BTreeMap<String, usize> = read_document(directory, VOCABULARY_FILE)?;
        let symbol_weights: SymbolWeightStore = read_document(directory, SYMBOL_WEIGHTS_FILE)?;
        let hyperparameters: Hyperparameters = read_document(directory, HYPERPARAMETERS_FILE)?;
        let parameters: TrainedParameters = read_document(directory, CLASSIFIER_FILE)?;
        let meta: ModelMeta = read_document(directory, META_FILE)?;

        if meta.format_version != FORMAT_VERSION {
            return Err(SymSearchError::corrupt_artifact(format!(
                "unsupported artifact format version {}",
                meta.format_version
            )));
        }

        let artifact = ModelArtifact {
            vocabulary: Vocabulary::from_index_map(index_map)?,
            symbol_weights,
            hyperparameters,
            parameters,
        };
        artifact.validate()?;
        Ok(artifact)
    }
}

fn read_document<T: DeserializeOwned>(directory: &Path, name: &str) -> Result<T> {
    let path = directory.join(name);
    if !path.is_file() {
        return Err(SymSearchError::missing_artifact(format!(
            "expected resource '{}' at {}",
            name,
            path.display()
        )));
    }

    let content = fs::read_to_string(&path)?;
    serde_json::from_str(&content).map_err(|e| {
        SymSearchError::corrupt_artifact(format!("failed to parse '{name}': {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn toy_artifact() -> ModelArtifact {
        let tokens: BTreeSet<String> = ["alphabet", "apple", "inc"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let vocabulary = Vocabulary::from_token_set(tokens);

        let mut symbol_weights = SymbolWeightStore::new();
        let mut apple = crate::feature::TokenWeightMap::default();
        apple.insert("apple".to_string(), 1.0);
        apple.insert("inc".to_string(), 1.0);
        symbol_weights.insert("AAPL".to_string(), apple);
        let mut alphabet = crate::feature::TokenWeightMap::default();
        alphabet.insert("alphabet".to_string(), 1.0);
        alphabet.insert("inc".to_string(), 1.0);
        symbol_weights.insert("GOOG".to_string(), alphabet);

        ModelArtifact {
            vocabulary,
            symbol_weights,
            hyperparameters: Hyperparameters {
                alpha: 1.0,
                gamma: 0.75,
            },
            parameters: TrainedParameters {
                classes: vec!["AAPL".to_string(), "GOOG".to_string()],
                class_log_priors: vec![0.5f64.ln(), 0.5f64.ln()],
                feature_log_probs: vec![vec![-1.0, -0.5, -0.5], vec![-0.5, -1.0, -0.5]],
            },
        }
    }

    #[test]
    fn test_save_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let artifact = toy_artifact();

        ModelStore::save(&artifact, temp_dir.path()).unwrap();
        let loaded = ModelStore::load(temp_dir.path()).unwrap();

        assert_eq!(loaded.vocabulary.tokens(), artifact.vocabulary.tokens());
        assert_eq!(loaded.symbol_weights.symbols(), &["AAPL", "GOOG"]);
        assert_eq!(loaded.hyperparameters, artifact.hyperparameters);
        // Parameters must round-trip bit-for-bit.
        assert_eq!(loaded.parameters, artifact.parameters);
    }

    #[test]
    fn test_no_temporary_files_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        ModelStore::save(&toy_artifact(), temp_dir.path()).unwrap();

        for entry in fs::read_dir(temp_dir.path()).unwrap() {
            let name = entry.unwrap().file_name();
            assert!(
                !name.to_string_lossy().ends_with(".tmp"),
                "leftover temporary file: {name:?}"
            );
        }
    }

    #[test]
    fn test_missing_resource_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        ModelStore::save(&toy_artifact(), temp_dir.path()).unwrap();
        fs::remove_file(temp_dir.path().join(CLASSIFIER_FILE)).unwrap();

        let result = ModelStore::load(temp_dir.path());
        assert!(matches!(result, Err(SymSearchError::MissingArtifact(_))));
    }

    #[test]
    fn test_unparseable_resource_is_corrupt() {
        let temp_dir = TempDir::new().unwrap();
        ModelStore::save(&toy_artifact(), temp_dir.path()).unwrap();
        fs::write(temp_dir.path().join(HYPERPARAMETERS_FILE), "{\"alpha\": \"one\"}").unwrap();

        let result = ModelStore::load(temp_dir.path());
        assert!(matches!(result, Err(SymSearchError::CorruptArtifact(_))));
    }

    #[test]
    fn test_dimension_mismatch_is_detected_at_load() {
        let temp_dir = TempDir::new().unwrap();
        let mut artifact = toy_artifact();
        ModelStore::save(&artifact, temp_dir.path()).unwrap();

        // Rewrite the classifier document with a narrower probability matrix.
        artifact.parameters.feature_log_probs = vec![vec![-1.0, -0.5], vec![-0.5, -1.0]];
        fs::write(
            temp_dir.path().join(CLASSIFIER_FILE),
            serde_json::to_string_pretty(&artifact.parameters).unwrap(),
        )
        .unwrap();

        let result = ModelStore::load(temp_dir.path());
        assert!(matches!(result, Err(SymSearchError::VocabularyMismatch(_))));
    }

    #[test]
    fn test_out_of_range_hyperparameters_are_corrupt() {
        let temp_dir = TempDir::new().unwrap();
        ModelStore::save(&toy_artifact(), temp_dir.path()).unwrap();
        fs::write(
            temp_dir.path().join(HYPERPARAMETERS_FILE),
            "{\"alpha\": 1.0, \"gamma\": 1.5}",
        )
        .unwrap();

        let result = ModelStore::load(temp_dir.path());
        assert!(matches!(result, Err(SymSearchError::CorruptArtifact(_))));
    }
}
