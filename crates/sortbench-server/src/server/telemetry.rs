//! # Telemetry
//!
//! Console logging through `tracing_subscriber::fmt` is always on. Two
//! optional features export to stdout through OpenTelemetry:
//!
//! - `tracing`: spans. Each HTTP request gets a span from
//!   `tower_http::trace::TraceLayer`, and the sort inside it gets a child
//!   span from the handler. Events inside a span become span events.
//! - `metrics`: per-strategy `requests`, `errors` and `arrays_sorted`
//!   counters plus a `sort_duration` histogram. Without the feature,
//!   [`record`] is a no-op.
//!
//! ```bash
//! cargo run --features tracing,metrics
//! ```

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(any(feature = "metrics", feature = "tracing"))]
use opentelemetry::{InstrumentationScope, KeyValue};
#[cfg(feature = "metrics")]
use opentelemetry::metrics::{Counter, Histogram, MeterProvider};
#[cfg(feature = "tracing")]
use opentelemetry::trace::TracerProvider;
#[cfg(any(feature = "metrics", feature = "tracing"))]
use opentelemetry_sdk::Resource;
#[cfg(feature = "metrics")]
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
#[cfg(feature = "tracing")]
use opentelemetry_sdk::trace::SdkTracerProvider;
#[cfg(feature = "metrics")]
use std::sync::OnceLock;

/// Something worth counting about one request to a sort endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(not(feature = "metrics"), allow(dead_code))]
pub enum SortEvent {
    /// A request arrived. Recorded before the body is parsed.
    Request,
    /// The request was rejected or the sort failed.
    Error,
    /// A batch of `arrays` arrays was sorted in `duration_ns`.
    Sorted { arrays: u64, duration_ns: f64 },
}

pub struct TelemetryProviders {
    #[cfg(feature = "tracing")]
    tracer_provider: SdkTracerProvider,
    #[cfg(feature = "metrics")]
    meter_provider: SdkMeterProvider,
}

impl TelemetryProviders {
    /// Flushes and shuts down every enabled exporter.
    ///
    /// Errors are printed rather than logged: the subscriber may already be
    /// gone by the time this runs.
    pub fn shutdown(self) {
        #[cfg(feature = "tracing")]
        if let Err(err) = self.tracer_provider.shutdown() {
            eprintln!("Error shutting down tracer: {err:#?}");
        }

        #[cfg(feature = "metrics")]
        if let Err(err) = self.meter_provider.shutdown() {
            eprintln!("Error shutting down meter: {err:#?}");
        }

        #[cfg(not(any(feature = "tracing", feature = "metrics")))]
        let _ = self;
    }
}

pub fn init_telemetry() -> anyhow::Result<TelemetryProviders> {
    #[cfg(any(feature = "metrics", feature = "tracing"))]
    let scope = InstrumentationScope::builder("sortbench")
        .with_version(env!("CARGO_PKG_VERSION"))
        .build();

    let registry = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_thread_ids(true)
                .with_line_number(true)
                .with_target(false)
                .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
                .with_file(true)
                .pretty(),
        );

    #[cfg(feature = "tracing")]
    let tracer_provider = SdkTracerProvider::builder()
        .with_resource(resource())
        .with_batch_exporter(opentelemetry_stdout::SpanExporter::default())
        .build();

    #[cfg(feature = "tracing")]
    let registry = {
        let tracer = tracer_provider.tracer_with_scope(scope.clone());
        registry.with(tracing_opentelemetry::layer().with_tracer(tracer))
    };

    #[cfg(feature = "metrics")]
    let meter_provider = {
        let reader = PeriodicReader::builder(opentelemetry_stdout::MetricExporter::default())
            .with_interval(core::time::Duration::from_secs(5))
            .build();
        let provider = SdkMeterProvider::builder()
            .with_resource(resource())
            .with_reader(reader)
            .build();
        let _ = INSTRUMENTS.set(Instruments::new(&provider, scope));
        provider
    };

    registry.try_init()?;

    Ok(TelemetryProviders {
        #[cfg(feature = "tracing")]
        tracer_provider,
        #[cfg(feature = "metrics")]
        meter_provider,
    })
}

#[cfg(any(feature = "metrics", feature = "tracing"))]
fn resource() -> Resource {
    Resource::builder()
        .with_service_name("sortbench")
        .with_attribute(KeyValue::new(
            opentelemetry_semantic_conventions::resource::SERVICE_VERSION,
            env!("CARGO_PKG_VERSION"),
        ))
        .build()
}

#[cfg(feature = "metrics")]
static INSTRUMENTS: OnceLock<Instruments> = OnceLock::new();

#[cfg(feature = "metrics")]
struct Instruments {
    requests: Counter<u64>,
    errors: Counter<u64>,
    arrays_sorted: Counter<u64>,
    sort_duration: Histogram<f64>,
}

#[cfg(feature = "metrics")]
impl Instruments {
    fn new(provider: &SdkMeterProvider, scope: InstrumentationScope) -> Self {
        let meter = provider.meter_with_scope(scope);
        Self {
            requests: meter
                .u64_counter("requests")
                .with_description("Sort requests received")
                .build(),
            errors: meter
                .u64_counter("errors")
                .with_description("Rejected or failed sort requests")
                .build(),
            arrays_sorted: meter
                .u64_counter("arrays_sorted")
                .with_description("Arrays sorted")
                .build(),
            sort_duration: meter
                .f64_histogram("sort_duration")
                .with_unit("ns")
                .with_description("Time spent sorting a batch")
                .build(),
        }
    }
}

/// Records `event` against the metrics of `strategy`.
pub fn record(strategy: &'static str, event: SortEvent) {
    #[cfg(test)]
    tally::push(strategy, event);

    #[cfg(feature = "metrics")]
    if let Some(m) = INSTRUMENTS.get() {
        let attrs = [KeyValue::new("strategy", strategy)];
        match event {
            SortEvent::Request => m.requests.add(1, &attrs),
            SortEvent::Error => m.errors.add(1, &attrs),
            SortEvent::Sorted {
                arrays,
                duration_ns,
            } => {
                m.arrays_sorted.add(arrays, &attrs);
                m.sort_duration.record(duration_ns, &attrs);
            }
        }
    }

    #[cfg(not(any(test, feature = "metrics")))]
    let _ = (strategy, event);
}

/// Every recorded event, in order, so tests can check what a request counted.
#[cfg(test)]
pub(crate) mod tally {
    use super::SortEvent;
    use std::sync::{Mutex, PoisonError};

    static EVENTS: Mutex<Vec<(&'static str, SortEvent)>> = Mutex::new(Vec::new());

    pub(crate) fn push(strategy: &'static str, event: SortEvent) {
        EVENTS
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((strategy, event));
    }

    pub(crate) fn events(strategy: &str) -> Vec<SortEvent> {
        EVENTS
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(s, _)| *s == strategy)
            .map(|(_, e)| *e)
            .collect()
    }
}
