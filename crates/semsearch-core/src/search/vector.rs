// Exact (brute-force) L2 nearest-neighbor index

use super::types::{validate_dimension, SearchError};
use std::cmp::Ordering;

/// A scored neighbor: corpus position plus squared L2 distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Row in the index (equals the document's corpus position)
    pub index: usize,
    /// Squared Euclidean distance to the query
    pub distance: f32,
}

/// Converts a squared L2 distance into a similarity score.
///
/// `1 / (1 + d)`: equals 1.0 at `d = 0`, decreases monotonically, and stays
/// in (0, 1] for any `d >= 0`. Display thresholds are tuned to this exact
/// transform.
pub fn distance_to_similarity(distance: f32) -> f32 {
    1.0 / (1.0 + distance)
}

/// Squared Euclidean distance between two equal-length vectors.
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Flat index for exact L2 search.
///
/// Vectors are stored row-major in one contiguous buffer, in insertion order.
/// Every query scans all rows, which is the right trade-off for small
/// corpora and gives exact, deterministic results.
#[derive(Debug, Clone)]
pub struct FlatL2Index {
    /// Row-major vector storage, `len * dimension` floats
    data: Vec<f32>,
    /// Width of every vector
    dimension: usize,
}

impl FlatL2Index {
    /// Creates an empty index for vectors of `dimension` floats.
    pub fn new(dimension: usize) -> Self {
        Self {
            data: Vec::new(),
            dimension,
        }
    }

    /// Appends all vectors in order. Row `i` of the index is `vectors[i]`.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::DimensionMismatch` for the first vector with the
    /// wrong width; the index is left unchanged in that case.
    pub fn add_all<V: AsRef<[f32]>>(&mut self, vectors: &[V]) -> Result<(), SearchError> {
        for vector in vectors {
            validate_dimension(self.dimension, vector.as_ref().len())?;
        }

        self.data.reserve(vectors.len() * self.dimension);
        for vector in vectors {
            self.data.extend_from_slice(vector.as_ref());
        }
        Ok(())
    }

    /// Returns the `k` nearest rows to `query`, closest first.
    ///
    /// Ties are broken by row index ascending. Returns `min(k, len)` neighbors.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::DimensionMismatch` if `query` has the wrong width.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, SearchError> {
        validate_dimension(self.dimension, query.len())?;

        if k == 0 || self.is_empty() {
            return Ok(vec![]);
        }

        let mut neighbors: Vec<Neighbor> = self
            .rows()
            .enumerate()
            .map(|(index, row)| Neighbor {
                index,
                distance: squared_l2(row, query),
            })
            .collect();

        neighbors.sort_by(neighbor_order);
        neighbors.truncate(k);
        Ok(neighbors)
    }

    /// Returns the vector stored at `index`.
    pub fn get(&self, index: usize) -> Option<&[f32]> {
        let start = index.checked_mul(self.dimension)?;
        self.data.get(start..start + self.dimension)
    }

    fn rows(&self) -> impl Iterator<Item = &[f32]> {
        // chunks_exact panics on 0; a zero-width index has no rows to scan.
        self.data.chunks_exact(self.dimension.max(1))
    }

    /// Number of stored vectors.
    pub fn len(&self) -> usize {
        if self.dimension == 0 {
            0
        } else {
            self.data.len() / self.dimension
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Orders neighbors as the index does: distance ascending, then index.
pub fn neighbor_order(a: &Neighbor, b: &Neighbor) -> Ordering {
    a.distance
        .total_cmp(&b.distance)
        .then_with(|| a.index.cmp(&b.index))
}
