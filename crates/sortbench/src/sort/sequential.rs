use crate::{Array, Batch, Result, SortStrategy};

/// Single-threaded baseline strategy. See [`sort_sequential`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Sequential;

impl SortStrategy for Sequential {
    fn name(&self) -> &'static str {
        "sequential"
    }

    async fn sort(&self, batch: &[Array]) -> Result<Batch> {
        Ok(sort_sequential(batch))
    }
}

/// Sorts every array in `batch`, one after another, on the calling thread.
///
/// Each array is copied before sorting so `batch` is left untouched. The
/// result is in input order.
pub fn sort_sequential(batch: &[Array]) -> Batch {
    batch
        .iter()
        .map(|array| {
            let mut sorted = array.clone();
            sort_array(&mut sorted);
            sorted
        })
        .collect()
}

/// The per-array kernel shared by both strategies.
pub fn sort_array(array: &mut Array) {
    array.sort_unstable();
}
