//! Prometheus metrics backend for the relay pipeline.
//!
//! Provides [`PrometheusMetrics`], an implementation of [`relay_core::MetricsBackend`].
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use relay_core::StageContext;
//! use relay_prometheus::{Encoder, PrometheusMetrics, TextEncoder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = PrometheusMetrics::new()?;
//! let ctx = StageContext::default().with_metrics(Arc::new(metrics.clone()));
//!
//! // after the pipeline drained
//! let mut buffer = Vec::new();
//! TextEncoder::new().encode(&metrics.gather(), &mut buffer)?;
//! # let _ = ctx;
//! # Ok(())
//! # }
//! ```
//!
//! ## Metrics
//! - `relay_generations_total{outcome}` - Counter
//! - `relay_units_enqueued_total` - Counter
//! - `relay_generation_duration_seconds{outcome}` - Histogram
//! - `relay_units_total{outcome}` - Counter
//! - `relay_unit_slack_seconds` - Histogram
//!
//! This crate does NOT serve `/metrics`; expose [`PrometheusMetrics::gather`] through whatever
//! HTTP stack the application already runs.
mod backend;
pub use backend::PrometheusMetrics;

pub use prometheus::{Encoder, Registry, TextEncoder};
