/// Result alias used by every fallible `sortbench` API.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All possible errors that `sortbench` can produce.
///
/// Sorting itself is pure and cannot fail; the only failure mode is a worker
/// that never reports its array back to the orchestrator. Any such failure
/// fails the whole batch.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The worker responsible for the array at `index` did not complete.
    ///
    /// `reason` carries the panic payload when one was available.
    #[error("Sort worker for array {index} failed: {reason}")]
    WorkerFailed { index: usize, reason: String },
}
