//! Per-symbol token weight accumulation and feature matrix construction.

use std::collections::{BTreeMap, BTreeSet};

use ahash::AHashMap;
use rayon::prelude::*;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::analysis::{SymbolTokenizer, Tokenizer};
use crate::document::SymbolRecord;
use crate::error::{Result, SymSearchError};
use crate::feature::sparse::{SparseVector, TrainingMatrix};
use crate::feature::vocabulary::Vocabulary;
use crate::spelling::DecayMatcher;

/// Token -> weight mapping owned by a single symbol's ingestion result.
pub type TokenWeightMap = AHashMap<String, f64>;

/// Per-symbol token weight maps, in symbol insertion order.
///
/// Insertion order is load-bearing: training matrix rows and therefore
/// classifier class order follow it. Re-inserting a symbol replaces its
/// weights but keeps its original position.
#[derive(Debug, Clone, Default)]
pub struct SymbolWeightStore {
    order: Vec<String>,
    weights: AHashMap<String, TokenWeightMap>,
}

impl SymbolWeightStore {
    /// Create an empty store.
    pub fn new() -> Self {
        SymbolWeightStore::default()
    }

    /// Store (or replace) the token weights for a symbol.
    pub fn insert(&mut self, symbol: String, token_weights: TokenWeightMap) {
        if !self.weights.contains_key(&symbol) {
            self.order.push(symbol.clone());
        }
        self.weights.insert(symbol, token_weights);
    }

    /// Token weights for a symbol.
    pub fn get(&self, symbol: &str) -> Option<&TokenWeightMap> {
        self.weights.get(symbol)
    }

    /// Symbols in insertion order.
    pub fn symbols(&self) -> &[String] {
        &self.order
    }

    /// Iterate (symbol, token weights) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TokenWeightMap)> {
        self.order
            .iter()
            .map(|symbol| (symbol.as_str(), &self.weights[symbol]))
    }

    /// Number of stored symbols.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Serialize for SymbolWeightStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        // JSON object keys carry the insertion order; inner maps are sorted
        // so identical models serialize to identical bytes.
        let mut map = serializer.serialize_map(Some(self.order.len()))?;
        for (symbol, token_weights) in self.iter() {
            let sorted: BTreeMap<&str, f64> = token_weights
                .iter()
                .map(|(token, weight)| (token.as_str(), *weight))
                .collect();
            map.serialize_entry(symbol, &sorted)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SymbolWeightStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct StoreVisitor;

        impl<'de> Visitor<'de> for StoreVisitor {
            type Value = SymbolWeightStore;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a map of symbol to token weight maps")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut store = SymbolWeightStore::new();
                while let Some((symbol, token_weights)) =
                    access.next_entry::<String, TokenWeightMap>()?
                {
                    store.insert(symbol, token_weights);
                }
                Ok(store)
            }
        }

        deserializer.deserialize_map(StoreVisitor)
    }
}

/// Builds the weighted token feature space from symbol records and encodes
/// training data and queries into it.
///
/// Usage follows three phases: [`ingest_record`](Self::ingest_record) for
/// every symbol, [`finalize_vocabulary`](Self::finalize_vocabulary) exactly
/// once afterwards, then matrix/vector construction. Finalizing again after
/// further ingestion re-derives the index space, which invalidates any
/// classifier trained on the previous one; callers must retrain.
#[derive(Debug, Clone)]
pub struct FeatureEngineer {
    tokenizer: SymbolTokenizer,
    gamma: f64,
    symbol_weights: SymbolWeightStore,
    vocabulary: Option<Vocabulary>,
}

impl FeatureEngineer {
    /// Create a new engineer with the given fuzzy decay factor.
    pub fn new(gamma: f64) -> Self {
        FeatureEngineer {
            tokenizer: SymbolTokenizer::new(),
            gamma,
            symbol_weights: SymbolWeightStore::new(),
            vocabulary: None,
        }
    }

    /// Rebuild an engineer from persisted state.
    pub fn restore(gamma: f64, symbol_weights: SymbolWeightStore, vocabulary: Vocabulary) -> Self {
        FeatureEngineer {
            tokenizer: SymbolTokenizer::new(),
            gamma,
            symbol_weights,
            vocabulary: Some(vocabulary),
        }
    }

    /// The fuzzy decay factor.
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// The per-symbol token weights accumulated so far.
    pub fn symbol_weights(&self) -> &SymbolWeightStore {
        &self.symbol_weights
    }

    /// Number of ingested symbols.
    pub fn num_symbols(&self) -> usize {
        self.symbol_weights.len()
    }

    /// Whether the vocabulary has been finalized.
    pub fn is_finalized(&self) -> bool {
        self.vocabulary.is_some()
    }

    /// The frozen vocabulary.
    pub fn vocabulary(&self) -> Result<&Vocabulary> {
        self.vocabulary.as_ref().ok_or_else(|| {
            SymSearchError::invalid_operation(
                "vocabulary has not been finalized; call finalize_vocabulary after ingestion",
            )
        })
    }

    /// Ingest one symbol record, storing its token weight map.
    ///
    /// Every token of `description` and `symbol` gets weight 1.0. A token
    /// appearing more than once (including in both fields) is overwritten to
    /// 1.0, not accumulated. Re-ingesting a symbol replaces its weights.
    pub fn ingest_record(&mut self, record: &SymbolRecord) -> Result<()> {
        record.validate()?;

        let mut token_weights = TokenWeightMap::default();
        for token in self
            .tokenizer
            .tokenize(&record.description)
            .into_iter()
            .chain(self.tokenizer.tokenize(&record.symbol))
        {
            token_weights.insert(token, 1.0);
        }

        self.symbol_weights.insert(record.symbol.clone(), token_weights);
        Ok(())
    }

    /// Derive the frozen token -> index mapping from everything ingested.
    ///
    /// The union of all observed tokens is sorted lexicographically and
    /// indexed by sorted position, so the mapping is reproducible for
    /// identical inputs.
    pub fn finalize_vocabulary(&mut self) {
        let mut token_set = BTreeSet::new();
        for (_, token_weights) in self.symbol_weights.iter() {
            for token in token_weights.keys() {
                token_set.insert(token.clone());
            }
        }
        self.vocabulary = Some(Vocabulary::from_token_set(token_set));
    }

    /// Build the sparse (symbols x vocabulary) training matrix and its
    /// row-aligned label list, in symbol insertion order.
    pub fn build_training_matrix(&self) -> Result<(TrainingMatrix, Vec<String>)> {
        let vocabulary = self.vocabulary()?;

        let mut rows = Vec::with_capacity(self.symbol_weights.len());
        let mut labels = Vec::with_capacity(self.symbol_weights.len());
        for (symbol, token_weights) in self.symbol_weights.iter() {
            let mut entries = Vec::with_capacity(token_weights.len());
            for (token, weight) in token_weights.iter() {
                let index = vocabulary.index_of(token).ok_or_else(|| {
                    SymSearchError::internal(format!(
                        "token '{token}' of symbol '{symbol}' is missing from the finalized vocabulary"
                    ))
                })?;
                entries.push((index, *weight));
            }
            rows.push(SparseVector::from_entries(vocabulary.len(), entries));
            labels.push(symbol.to_string());
        }

        Ok((TrainingMatrix::new(rows, vocabulary.len()), labels))
    }

    /// Encode a query string as a sparse row over the frozen vocabulary.
    ///
    /// Exact vocabulary hits weigh 1.0. With `max_edit_distance > 0`, every
    /// vocabulary token within that Damerau-Levenshtein distance of a query
    /// token weighs `gamma^distance`, and the largest weight ever proposed
    /// for a feature wins, so a fuzzy hit can never regress an exact one.
    /// `max_edit_distance = 0` skips the vocabulary scan entirely.
    pub fn build_query_vector(
        &self,
        query: &str,
        max_edit_distance: usize,
    ) -> Result<SparseVector> {
        let vocabulary = self.vocabulary()?;
        let tokens = self.tokenizer.tokenize(query);

        let mut weights: AHashMap<usize, f64> = AHashMap::new();
        for token in &tokens {
            if let Some(index) = vocabulary.index_of(token) {
                weights.insert(index, 1.0);
            }
        }

        if max_edit_distance > 0 {
            let matcher = DecayMatcher::new(self.gamma, max_edit_distance);
            let fuzzy: Vec<(usize, f64)> = vocabulary
                .tokens()
                .par_iter()
                .enumerate()
                .filter_map(|(index, feature)| {
                    let mut best: Option<f64> = None;
                    for token in &tokens {
                        if token == feature {
                            continue;
                        }
                        if let Some(weight) = matcher.match_weight(token, feature) {
                            if best.is_none_or(|current| weight > current) {
                                best = Some(weight);
                            }
                        }
                    }
                    best.map(|weight| (index, weight))
                })
                .collect();

            for (index, weight) in fuzzy {
                let entry = weights.entry(index).or_insert(0.0);
                // Closest match wins: never overwrite with a smaller weight.
                if weight > *entry {
                    *entry = weight;
                }
            }
        }

        Ok(SparseVector::from_entries(
            vocabulary.len(),
            weights.into_iter().collect(),
        ))
    }
}
