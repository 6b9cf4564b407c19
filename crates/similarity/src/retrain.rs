//! Rebuilding the collaborative index when new ratings arrive.
//!
//! New ratings are appended to the base table (no upsert; a repeated
//! (user, movie) pair is averaged by the pivot) and the whole matrix is
//! rebuilt. The coordinator owns the active matrix behind an `Arc` and swaps
//! it in one step, so a reader holds either the old or the new matrix in
//! full, never a mix.

use crate::collaborative::build_collaborative_similarity;
use crate::error::Result;
use crate::matrix::SimilarityMatrix;
use data_loader::Rating;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{info, instrument};

/// Build a collaborative matrix from `base` followed by `new_ratings`.
pub fn retrain(base: &[Rating], new_ratings: &[Rating]) -> Result<SimilarityMatrix> {
    let mut combined = Vec::with_capacity(base.len() + new_ratings.len());
    combined.extend_from_slice(base);
    combined.extend_from_slice(new_ratings);
    build_collaborative_similarity(&combined)
}

struct Active {
    matrix: Arc<SimilarityMatrix>,
    generation: u64,
}

/// Owns the base rating table and the active collaborative matrix.
///
/// The lock is only held to clone or replace the `Arc`; the rebuild itself
/// runs without it, so readers are never blocked by a retrain in progress.
pub struct RetrainCoordinator {
    base: Vec<Rating>,
    active: RwLock<Active>,
}

impl RetrainCoordinator {
    /// Build the initial matrix from the base ratings
    pub fn new(base: Vec<Rating>) -> Result<Self> {
        let matrix = build_collaborative_similarity(&base)?;
        Ok(Self::with_matrix(base, matrix))
    }

    /// Wrap a matrix that was already built from `base`
    pub fn with_matrix(base: Vec<Rating>, matrix: SimilarityMatrix) -> Self {
        Self {
            base,
            active: RwLock::new(Active {
                matrix: Arc::new(matrix),
                generation: 0,
            }),
        }
    }

    /// The base table every retrain starts from
    pub fn base_ratings(&self) -> &[Rating] {
        &self.base
    }

    /// Snapshot of the active matrix
    pub fn current(&self) -> Arc<SimilarityMatrix> {
        Arc::clone(&self.active.read().matrix)
    }

    /// Number of completed swaps since construction
    pub fn generation(&self) -> u64 {
        self.active.read().generation
    }

    /// Rebuild from `base ++ new_ratings` and make the result active.
    ///
    /// Earlier retrains are not cumulative: each one starts again from the
    /// base table. On error the active matrix is left as it was.
    #[instrument(skip(self, new_ratings), fields(new_ratings = new_ratings.len()))]
    pub fn retrain(&self, new_ratings: &[Rating]) -> Result<Arc<SimilarityMatrix>> {
        let matrix = Arc::new(retrain(&self.base, new_ratings)?);

        let generation = {
            let mut active = self.active.write();
            active.matrix = Arc::clone(&matrix);
            active.generation += 1;
            active.generation
        };

        info!(
            "Collaborative index swapped (generation {}, {} movies)",
            generation,
            matrix.len()
        );
        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn base() -> Vec<Rating> {
        vec![
            Rating::new(1, 1, 5.0),
            Rating::new(1, 2, 4.0),
            Rating::new(2, 2, 5.0),
            Rating::new(2, 3, 5.0),
        ]
    }

    #[test]
    fn test_retrain_with_no_new_ratings_equals_build() {
        let rebuilt = retrain(&base(), &[]).unwrap();
        assert_eq!(rebuilt, build_collaborative_similarity(&base()).unwrap());
    }

    #[test]
    fn test_retrain_adds_new_movies() {
        let coordinator = RetrainCoordinator::new(base()).unwrap();
        assert!(!coordinator.current().contains(4));

        coordinator.retrain(&[Rating::new(3, 4, 3.0), Rating::new(3, 1, 2.0)]).unwrap();

        let current = coordinator.current();
        assert!(current.contains(4));
        assert!(current.get(1, 4).unwrap() > 0.0);
        assert_eq!(coordinator.generation(), 1);
    }

    #[test]
    fn test_retrains_are_not_cumulative() {
        let coordinator = RetrainCoordinator::new(base()).unwrap();
        coordinator.retrain(&[Rating::new(3, 4, 3.0)]).unwrap();
        coordinator.retrain(&[]).unwrap();

        assert!(!coordinator.current().contains(4));
        assert_eq!(coordinator.base_ratings().len(), 4);
    }

    #[test]
    fn test_old_snapshot_survives_swap() {
        let coordinator = RetrainCoordinator::new(base()).unwrap();
        let before = coordinator.current();

        coordinator.retrain(&[Rating::new(3, 4, 3.0)]).unwrap();

        // The reader keeps the complete pre-retrain matrix
        assert_eq!(before.len(), 3);
        assert_eq!(coordinator.current().len(), 4);
    }

    #[test]
    fn test_concurrent_readers_see_whole_matrices() {
        let coordinator = Arc::new(RetrainCoordinator::new(base()).unwrap());
        let old_len = coordinator.current().len();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let coordinator = Arc::clone(&coordinator);
                thread::spawn(move || {
                    for _ in 0..200 {
                        let snapshot = coordinator.current();
                        assert!(snapshot.len() == old_len || snapshot.len() == old_len + 1);
                        // Every movie in a snapshot has a full row in that snapshot
                        for &id in snapshot.ids() {
                            assert_eq!(snapshot.row(id).unwrap().len(), snapshot.len());
                        }
                    }
                })
            })
            .collect();

        for _ in 0..5 {
            coordinator.retrain(&[Rating::new(3, 4, 3.0)]).unwrap();
        }
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(coordinator.generation(), 5);
    }
}
