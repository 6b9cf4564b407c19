//! Square, symmetric movie×movie similarity matrix.
//!
//! Only the upper triangle (diagonal included) is stored, row by row, so
//! `get(a, b)` and `get(b, a)` read the same cell and symmetry holds by
//! construction. A 10k movie universe takes ~400 MB instead of ~800 MB.

use data_loader::MovieId;
use std::collections::HashMap;

/// Immutable similarity matrix indexed by movie id on both axes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimilarityMatrix {
    /// Universe in axis order
    ids: Vec<MovieId>,
    /// MovieId -> axis position
    positions: HashMap<MovieId, usize>,
    /// Packed upper triangle, row i holds columns i..n
    values: Vec<f64>,
    /// Number of movies whose feature vector had zero norm
    zero_vectors: usize,
}

/// Offset of cell (i, j) with i <= j in the packed upper triangle
fn packed_index(n: usize, i: usize, j: usize) -> usize {
    i * (2 * n - i + 1) / 2 + (j - i)
}

impl SimilarityMatrix {
    /// Assemble a matrix from per-row upper-triangle slices.
    ///
    /// `rows[i]` must hold the similarities of `ids[i]` with `ids[i..]`.
    pub(crate) fn from_upper_rows(ids: Vec<MovieId>, rows: Vec<Vec<f64>>, zero_vectors: usize) -> Self {
        debug_assert_eq!(ids.len(), rows.len());
        let n = ids.len();
        let mut values = Vec::with_capacity(n * (n + 1) / 2);
        for (i, row) in rows.into_iter().enumerate() {
            debug_assert_eq!(row.len(), n - i);
            values.extend(row);
        }
        let positions = ids.iter().enumerate().map(|(pos, &id)| (id, pos)).collect();

        Self {
            ids,
            positions,
            values,
            zero_vectors,
        }
    }

    /// Number of movies on each axis
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Movie ids in axis order
    pub fn ids(&self) -> &[MovieId] {
        &self.ids
    }

    pub fn contains(&self, id: MovieId) -> bool {
        self.positions.contains_key(&id)
    }

    /// Axis position of a movie
    pub fn position(&self, id: MovieId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// How many movies had an all-zero feature vector.
    ///
    /// Those movies score 0 against everything, themselves included.
    pub fn zero_vectors(&self) -> usize {
        self.zero_vectors
    }

    /// Similarity between two axis positions
    pub fn value_at(&self, i: usize, j: usize) -> f64 {
        let (lo, hi) = if i <= j { (i, j) } else { (j, i) };
        self.values[packed_index(self.ids.len(), lo, hi)]
    }

    /// Similarity between two movies, None if either is outside the universe
    pub fn get(&self, a: MovieId, b: MovieId) -> Option<f64> {
        let i = self.position(a)?;
        let j = self.position(b)?;
        Some(self.value_at(i, j))
    }

    /// Similarities of one movie with every movie, in axis order
    pub fn row(&self, id: MovieId) -> Option<Vec<f64>> {
        let i = self.position(id)?;
        Some((0..self.len()).map(|j| self.value_at(i, j)).collect())
    }

    /// Add the row of `id` into `scores` (axis order, length `len()`).
    ///
    /// Returns false and leaves `scores` untouched when `id` is unknown.
    pub fn accumulate_row(&self, id: MovieId, scores: &mut [f64]) -> bool {
        let Some(i) = self.position(id) else {
            return false;
        };
        debug_assert_eq!(scores.len(), self.len());
        for (j, score) in scores.iter_mut().enumerate() {
            *score += self.value_at(i, j);
        }
        true
    }

    /// The `limit` movies most similar to `id`, itself excluded.
    ///
    /// Sorted by similarity descending; equal similarities keep axis order.
    pub fn most_similar(&self, id: MovieId, limit: usize) -> Vec<(MovieId, f64)> {
        let Some(i) = self.position(id) else {
            return Vec::new();
        };
        let mut neighbours: Vec<(MovieId, f64)> = self
            .ids
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(j, &other)| (other, self.value_at(i, j)))
            .collect();

        neighbours.sort_by(|a, b| b.1.total_cmp(&a.1));
        neighbours.truncate(limit);
        neighbours
    }
}
