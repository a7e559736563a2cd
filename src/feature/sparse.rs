//! Sparse vector and matrix types for the training and query feature space.

/// A sparse row vector over the feature space.
///
/// Entries are kept sorted by feature index with no duplicates. The
/// vocabulary is typically orders of magnitude larger than the tokens of a
/// single symbol or query, so only non-zero entries are stored.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseVector {
    dims: usize,
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl SparseVector {
    /// Create an empty vector with the given dimensionality.
    pub fn new(dims: usize) -> Self {
        SparseVector {
            dims,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Build a vector from unordered (index, value) entries.
    ///
    /// Entries are sorted by index. Indices must be unique and within
    /// `[0, dims)`; the feature builders guarantee both.
    pub fn from_entries(dims: usize, mut entries: Vec<(usize, f64)>) -> Self {
        entries.sort_unstable_by_key(|(idx, _)| *idx);
        debug_assert!(entries.windows(2).all(|w| w[0].0 < w[1].0));
        debug_assert!(entries.iter().all(|(idx, _)| *idx < dims));

        let (indices, values) = entries.into_iter().unzip();
        SparseVector {
            dims,
            indices,
            values,
        }
    }

    /// Dimensionality of the full feature space.
    pub fn dims(&self) -> usize {
        self.dims
    }

    /// Number of stored (non-zero) entries.
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Whether the vector has no stored entries.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate over (feature index, value) pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Value at a feature index (0.0 if not stored).
    pub fn get(&self, index: usize) -> f64 {
        match self.indices.binary_search(&index) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    /// Sum of all stored values.
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// A sparse (symbols x vocabulary) training matrix.
///
/// Row `i` holds the token weights of the symbol at position `i` of the
/// label list produced alongside the matrix.
#[derive(Debug, Clone)]
pub struct TrainingMatrix {
    rows: Vec<SparseVector>,
    cols: usize,
}

impl TrainingMatrix {
    /// Create a matrix from rows that all share the given dimensionality.
    pub fn new(rows: Vec<SparseVector>, cols: usize) -> Self {
        debug_assert!(rows.iter().all(|row| row.dims() == cols));
        TrainingMatrix { rows, cols }
    }

    /// Number of rows (training examples).
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns (vocabulary size).
    pub fn num_cols(&self) -> usize {
        self.cols
    }

    /// The row at the given position.
    pub fn row(&self, index: usize) -> &SparseVector {
        &self.rows[index]
    }

    /// Iterate over rows in order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &SparseVector> {
        self.rows.iter()
    }
}
