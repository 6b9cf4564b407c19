//! Cosine similarity kernel shared by the genre and collaborative builders.
//!
//! ## Algorithm
//! 1. Compute the norm of every item vector
//! 2. Invert the vectors: feature -> [(item, value)] in item order
//! 3. For each item i (rows run in parallel with Rayon):
//!    - accumulate dot products with every j > i through the inverted lists
//!    - divide by the norms, 0 when either norm is 0
//! 4. Pack the rows into a SimilarityMatrix
//!
//! Each row's sums are taken in a fixed order (features ascending, then
//! items ascending), so rebuilding from the same input is bit-reproducible
//! whatever the thread count.

use crate::matrix::SimilarityMatrix;
use data_loader::MovieId;
use rayon::prelude::*;
use tracing::debug;

/// Sparse feature vector, entries sorted by feature index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Build from (feature, value) pairs in any order; values for a repeated
    /// feature are summed.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (usize, f64)>) -> Self {
        let mut entries: Vec<(usize, f64)> = pairs.into_iter().collect();
        entries.sort_by_key(|&(feature, _)| feature);
        entries.dedup_by(|later, kept| {
            if later.0 == kept.0 {
                kept.1 += later.1;
                true
            } else {
                false
            }
        });
        Self { entries }
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|&(_, v)| v * v).sum::<f64>().sqrt()
    }

    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (a, b) = (&self.entries, &other.entries);
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < a.len() && j < b.len() {
            match a[i].0.cmp(&b[j].0) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a[i].1 * b[j].1;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Cosine of two vectors given their dot product and norms.
///
/// A zero norm makes the cosine undefined; it is defined as 0 here.
pub fn cosine(dot: f64, norm_a: f64, norm_b: f64) -> f64 {
    let denom = norm_a * norm_b;
    if denom == 0.0 {
        0.0
    } else {
        (dot / denom).clamp(-1.0, 1.0)
    }
}

/// Pairwise cosine similarity of `vectors`, axis labelled by `ids`.
///
/// The diagonal is exactly 1.0 for non-zero vectors and 0.0 for zero vectors.
pub fn pairwise_cosine(ids: Vec<MovieId>, vectors: &[SparseVector], num_features: usize) -> SimilarityMatrix {
    let n = vectors.len();
    let norms: Vec<f64> = vectors.iter().map(SparseVector::norm).collect();
    let zero_vectors = norms.iter().filter(|&&norm| norm == 0.0).count();

    // feature -> [(item, value)], items ascending
    let mut inverted: Vec<Vec<(usize, f64)>> = vec![Vec::new(); num_features];
    for (item, vector) in vectors.iter().enumerate() {
        for &(feature, value) in vector.entries() {
            inverted[feature].push((item, value));
        }
    }

    let rows: Vec<Vec<f64>> = (0..n)
        .into_par_iter()
        .map(|i| {
            // dots[k] holds the dot product of i with item i + k
            let mut dots = vec![0.0_f64; n - i];
            for &(feature, value) in vectors[i].entries() {
                let postings = &inverted[feature];
                let start = postings.partition_point(|&(item, _)| item <= i);
                for &(j, other) in &postings[start..] {
                    dots[j - i] += value * other;
                }
            }

            dots[0] = if norms[i] == 0.0 { 0.0 } else { 1.0 };
            for k in 1..dots.len() {
                dots[k] = cosine(dots[k], norms[i], norms[i + k]);
            }
            dots
        })
        .collect();

    debug!(
        "Computed pairwise cosine over {} items ({} zero vectors)",
        n, zero_vectors
    );
    SimilarityMatrix::from_upper_rows(ids, rows, zero_vectors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs_sorts_and_sums() {
        let v = SparseVector::from_pairs([(3, 1.0), (1, 2.0), (3, 0.5)]);
        assert_eq!(v.entries(), &[(1, 2.0), (3, 1.5)]);
    }

    #[test]
    fn test_dot_and_norm() {
        let a = SparseVector::from_pairs([(0, 3.0), (2, 4.0)]);
        let b = SparseVector::from_pairs([(1, 7.0), (2, 2.0)]);
        assert_eq!(a.norm(), 5.0);
        assert_eq!(a.dot(&b), 8.0);
    }

    #[test]
    fn test_cosine_zero_norm() {
        assert_eq!(cosine(0.0, 0.0, 3.0), 0.0);
        assert_eq!(cosine(4.0, 2.0, 2.0), 1.0);
    }

    #[test]
    fn test_pairwise_matches_direct_cosine() {
        let vectors = vec![
            SparseVector::from_pairs([(0, 5.0)]),
            SparseVector::from_pairs([(0, 4.0), (1, 5.0)]),
            SparseVector::from_pairs([(1, 5.0)]),
            SparseVector::default(),
        ];
        let m = pairwise_cosine(vec![1, 2, 3, 4], &vectors, 2);

        for i in 0..4 {
            for j in 0..4 {
                let expected = if i == j {
                    if vectors[i].norm() == 0.0 { 0.0 } else { 1.0 }
                } else {
                    cosine(vectors[i].dot(&vectors[j]), vectors[i].norm(), vectors[j].norm())
                };
                assert!((m.value_at(i, j) - expected).abs() < 1e-12, "cell ({i}, {j})");
            }
        }
        assert_eq!(m.zero_vectors(), 1);
        assert_eq!(m.get(4, 4), Some(0.0));
    }
}
