use crate::{Array, Batch, Result};
use core::future::Future;

/// A way of sorting every array in a batch.
///
/// Implementations must:
/// - sort each array ascending (duplicates allowed),
/// - keep output position `i` paired with input position `i`,
/// - never mutate the caller's batch, and
/// - return either the complete batch or an error, never a partial result.
pub trait SortStrategy: Send + Sync {
    /// A short, stable label for logs and metrics.
    fn name(&self) -> &'static str;

    /// Sorts a copy of every array in `batch`.
    fn sort(&self, batch: &[Array]) -> impl Future<Output = Result<Batch>> + Send;
}
