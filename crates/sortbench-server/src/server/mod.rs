//! HTTP boundary for the sort service.
//!
//! - [`config`] - CLI/environment configuration.
//! - [`service`] - Routing, request handling and error mapping.
//! - [`telemetry`] - Logging and optional OpenTelemetry export.

pub mod config;
pub mod service;
pub mod telemetry;
