//! Fan-out sorting with an index-stable aggregate.
//!
//! [`fan_out`] spawns one task per array onto the global `rayon` pool, which
//! runs one thread per core by default. Every task owns a private copy of its
//! array and the index it came from, and reports `(index, outcome)` over a
//! completion channel. The orchestrator owns the result slots, so each slot
//! is written exactly once, by index, without a lock.
//!
//! The completion channel is the barrier: every task sends exactly once, after
//! its kernel has returned or panicked, and the orchestrator drains exactly
//! `N` messages. No task is still running when the caller observes a result
//! or an error.

use crate::{Array, Batch, Error, Result, SortStrategy, sort_array};
use core::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use tokio::sync::mpsc;

/// Parallel strategy: one pooled task per array. See [`sort_concurrent`].
///
/// The pool is rayon's global pool; size it with
/// `rayon::ThreadPoolBuilder::build_global` before the first sort.
#[derive(Clone, Copy, Debug, Default)]
pub struct Concurrent;

impl SortStrategy for Concurrent {
    fn name(&self) -> &'static str {
        "concurrent"
    }

    async fn sort(&self, batch: &[Array]) -> Result<Batch> {
        sort_concurrent(batch).await
    }
}

/// Sorts every array in `batch` in parallel and returns them in input order.
///
/// # Errors
///
/// Returns [`Error::WorkerFailed`] if any worker fails to report its sorted
/// array. No partial batch is returned in that case.
pub async fn sort_concurrent(batch: &[Array]) -> Result<Batch> {
    fan_out(batch, sort_array).await
}

/// Applies `kernel` to a private copy of every array in `batch`, one pooled
/// task per array, and returns the results in input order.
///
/// Returns only after every spawned task has reported, whether it succeeded
/// or not. An empty batch returns immediately without spawning. The
/// orchestrator only awaits the completion channel, so it can be driven by any
/// executor.
///
/// # Errors
///
/// Returns [`Error::WorkerFailed`] for the lowest index whose kernel panicked
/// or whose task exited without reporting.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "debug", skip_all, fields(arrays = batch.len()))
)]
pub async fn fan_out<F>(batch: &[Array], kernel: F) -> Result<Batch>
where
    F: Fn(&mut Array) + Clone + Send + 'static,
{
    let total = batch.len();
    if total == 0 {
        return Ok(Batch::new());
    }

    // Capacity `total` means a task's send never waits on the orchestrator.
    let (done_tx, mut done_rx) = mpsc::channel::<(usize, Result<Array, String>)>(total);

    for (index, array) in batch.iter().enumerate() {
        let mut owned = array.clone();
        let done_tx = done_tx.clone();
        let kernel = kernel.clone();

        // A panic must not unwind out of a rayon task: without a pool panic
        // handler it aborts the process.
        rayon::spawn(move || {
            let outcome = catch_unwind(AssertUnwindSafe(|| kernel(&mut owned)))
                .map(|()| owned)
                .map_err(panic_reason);
            let _ = done_tx.try_send((index, outcome));
        });
    }

    // Only the tasks hold senders now; `recv` yields `None` once all of them
    // have been dropped.
    drop(done_tx);

    let mut slots: Vec<Option<Array>> = vec![None; total];
    let mut failure: Option<Error> = None;
    let mut outstanding = total;

    while outstanding > 0 {
        let Some((index, outcome)) = done_rx.recv().await else {
            break;
        };
        outstanding -= 1;

        match outcome {
            Ok(sorted) => {
                debug_assert!(slots[index].is_none(), "slot {index} written twice");
                slots[index] = Some(sorted);
            }
            Err(reason) => {
                #[cfg(feature = "tracing")]
                tracing::error!("Sort worker {index} failed: {reason}");

                if failure.as_ref().is_none_or(|e| failed_index(e) > index) {
                    failure = Some(Error::WorkerFailed { index, reason });
                }
            }
        }
    }

    if let Some(e) = failure {
        return Err(e);
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.ok_or_else(|| Error::WorkerFailed {
                index,
                reason: "worker exited without reporting a result".to_string(),
            })
        })
        .collect()
}

const fn failed_index(err: &Error) -> usize {
    match err {
        Error::WorkerFailed { index, .. } => *index,
    }
}

fn panic_reason(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}
