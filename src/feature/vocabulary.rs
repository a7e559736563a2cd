//! The learned token vocabulary and its dense index mapping.

use std::collections::{BTreeMap, BTreeSet};

use ahash::AHashMap;

use crate::error::{Result, SymSearchError};

/// Bidirectional mapping between tokens and dense feature indices.
///
/// Indices are assigned by lexicographic token order, so the mapping is
/// reproducible for identical inputs regardless of ingestion order. The
/// vocabulary is frozen once built; queries look tokens up but never add
/// entries.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    token_to_index: AHashMap<String, usize>,
    index_to_token: Vec<String>,
}

impl Vocabulary {
    /// Build a vocabulary from a set of tokens, assigning each token its
    /// position in lexicographic order.
    pub fn from_token_set(tokens: BTreeSet<String>) -> Self {
        let index_to_token: Vec<String> = tokens.into_iter().collect();
        let token_to_index = index_to_token
            .iter()
            .enumerate()
            .map(|(idx, token)| (token.clone(), idx))
            .collect();

        Vocabulary {
            token_to_index,
            index_to_token,
        }
    }

    /// Rebuild a vocabulary from a persisted token -> index map.
    ///
    /// The indices must form a dense range `[0, len)` with no duplicates;
    /// anything else means the artifact was corrupted or hand-edited.
    pub fn from_index_map(map: BTreeMap<String, usize>) -> Result<Self> {
        let len = map.len();
        let mut index_to_token = vec![None; len];

        for (token, idx) in &map {
            if *idx >= len {
                return Err(SymSearchError::corrupt_artifact(format!(
                    "vocabulary index {idx} out of range for {len} tokens"
                )));
            }
            if index_to_token[*idx].is_some() {
                return Err(SymSearchError::corrupt_artifact(format!(
                    "vocabulary index {idx} assigned to more than one token"
                )));
            }
            index_to_token[*idx] = Some(token.clone());
        }

        let index_to_token: Vec<String> = index_to_token.into_iter().flatten().collect();
        let token_to_index = map.into_iter().collect();

        Ok(Vocabulary {
            token_to_index,
            index_to_token,
        })
    }

    /// Export the token -> index map for persistence.
    pub fn to_index_map(&self) -> BTreeMap<String, usize> {
        self.token_to_index
            .iter()
            .map(|(token, idx)| (token.clone(), *idx))
            .collect()
    }

    /// Look up the feature index of a token.
    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.token_to_index.get(token).copied()
    }

    /// Look up the token at a feature index.
    pub fn token_at(&self, index: usize) -> Option<&str> {
        self.index_to_token.get(index).map(String::as_str)
    }

    /// All tokens, ordered by feature index.
    pub fn tokens(&self) -> &[String] {
        &self.index_to_token
    }

    /// Number of tokens in the vocabulary.
    pub fn len(&self) -> usize {
        self.index_to_token.len()
    }

    /// Whether the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.index_to_token.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexicographic_index_assignment() {
        let tokens: BTreeSet<String> = ["inc", "apple", "alphabet"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let vocab = Vocabulary::from_token_set(tokens);

        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab.index_of("alphabet"), Some(0));
        assert_eq!(vocab.index_of("apple"), Some(1));
        assert_eq!(vocab.index_of("inc"), Some(2));
        assert_eq!(vocab.token_at(1), Some("apple"));
        assert_eq!(vocab.index_of("missing"), None);
    }

    #[test]
    fn test_index_map_round_trip() {
        let tokens: BTreeSet<String> =
            ["aapl", "apple", "inc"].iter().map(|s| s.to_string()).collect();
        let vocab = Vocabulary::from_token_set(tokens);

        let restored = Vocabulary::from_index_map(vocab.to_index_map()).unwrap();
        assert_eq!(restored.tokens(), vocab.tokens());
    }

    #[test]
    fn test_rejects_sparse_index_map() {
        let mut map = BTreeMap::new();
        map.insert("apple".to_string(), 0);
        map.insert("inc".to_string(), 2);

        assert!(Vocabulary::from_index_map(map).is_err());
    }

    #[test]
    fn test_rejects_duplicate_indices() {
        let mut map = BTreeMap::new();
        map.insert("apple".to_string(), 0);
        map.insert("inc".to_string(), 0);

        assert!(Vocabulary::from_index_map(map).is_err());
    }
}
