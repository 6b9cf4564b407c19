//! Where the engine gets its collaborative matrix from.
//!
//! The engine asks for one snapshot per request and scores against that
//! snapshot only, so a retrain finishing mid-request cannot mix two
//! matrices into one answer.

use similarity::{RetrainCoordinator, SimilarityMatrix};
use std::sync::Arc;

/// Provider of the active collaborative similarity matrix
pub trait SimilaritySource: Send + Sync {
    /// The matrix to use for one whole request
    fn snapshot(&self) -> Arc<SimilarityMatrix>;
}

/// A fixed matrix that never changes
impl SimilaritySource for Arc<SimilarityMatrix> {
    fn snapshot(&self) -> Arc<SimilarityMatrix> {
        Arc::clone(self)
    }
}

/// The matrix currently swapped in by the coordinator
impl SimilaritySource for RetrainCoordinator {
    fn snapshot(&self) -> Arc<SimilarityMatrix> {
        self.current()
    }
}
