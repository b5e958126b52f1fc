//! Handlers for `POST /process-single` and `POST /process-concurrent`.
//!
//! Both endpoints share [`process`]; they differ only in the
//! [`SortStrategy`] they pass in. The body is read as raw bytes and parsed as
//! JSON regardless of `Content-Type`, so shape errors are reported as
//! `400 Bad Request` instead of axum's extractor rejections.

use crate::server::{
    service::error::AppError,
    telemetry::{SortEvent, record},
};
use axum::{Json, body::Bytes};
use sortbench::{Concurrent, Sequential, SortRequest, SortResponse, SortStrategy};
use std::time::Instant;

/// Sorts the batch with the [`Sequential`] strategy.
pub async fn process_single(body: Bytes) -> Result<Json<SortResponse>, AppError> {
    process(&Sequential, &body).await
}

/// Sorts the batch with the [`Concurrent`] strategy.
pub async fn process_concurrent(body: Bytes) -> Result<Json<SortResponse>, AppError> {
    process(&Concurrent, &body).await
}

/// Parses `body`, sorts it with `strategy` and reports the sort time.
///
/// The timer starts after parsing and stops before the response is built, so
/// `time_ns` measures the strategy alone. A failed sort produces no partial
/// result. Every call counts as a request before anything can fail, so the
/// `errors` metric is always a subset of `requests`.
#[tracing::instrument(skip_all, fields(strategy = strategy.name()))]
pub async fn process<S: SortStrategy>(
    strategy: &S,
    body: &[u8],
) -> Result<Json<SortResponse>, AppError> {
    let name = strategy.name();
    record(name, SortEvent::Request);

    let request: SortRequest = serde_json::from_slice(body).map_err(|e| {
        record(name, SortEvent::Error);
        tracing::debug!("Rejected malformed body: {e}");
        AppError::BadRequest(e.to_string())
    })?;

    let arrays = request.to_sort.len();

    let start = Instant::now();
    let sorted = strategy.sort(&request.to_sort).await;
    let elapsed = start.elapsed();

    let sorted_arrays = sorted.map_err(|e| {
        record(name, SortEvent::Error);
        tracing::error!("Sort failed after {elapsed:?}: {e}");
        AppError::from(e)
    })?;

    let time_ns = i64::try_from(elapsed.as_nanos()).unwrap_or(i64::MAX);
    record(
        name,
        SortEvent::Sorted {
            arrays: arrays as u64,
            duration_ns: time_ns as f64,
        },
    );
    tracing::debug!(arrays, time_ns, "Sorted batch");

    Ok(Json(SortResponse {
        sorted_arrays,
        time_ns,
    }))
}
