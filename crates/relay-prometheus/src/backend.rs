use std::sync::Arc;

use prometheus::{
    Counter, CounterVec, Histogram, HistogramOpts, HistogramVec, Opts, Registry,
    proto::MetricFamily,
};

use relay_core::{GenerationOutcome, MetricsBackend, UnitOutcome};

const NAMESPACE: &str = "relay";

/// Prometheus metrics backend.
///
/// ## Label cardinality
/// All labels are bounded:
/// - generation `outcome`: "complete", "expired", "failed"
/// - unit `outcome`: "completed", "expired"
#[derive(Clone)]
pub struct PrometheusMetrics {
    generations: CounterVec,
    generation_duration: HistogramVec,
    units_enqueued: Counter,
    units: CounterVec,
    unit_slack: Histogram,
    registry: Arc<Registry>,
}

impl PrometheusMetrics {
    /// Create a backend registering its collectors in `registry`.
    pub fn new_with_registry(registry: Arc<Registry>) -> Result<Self, prometheus::Error> {
        let generations = CounterVec::new(
            Opts::new("generations_total", "Requests whose generation step ended, by outcome")
                .namespace(NAMESPACE),
            &["outcome"],
        )?;
        registry.register(Box::new(generations.clone()))?;

        let generation_duration = HistogramVec::new(
            HistogramOpts::new(
                "generation_duration_seconds",
                "Time from deadline computation to the end of generation",
            )
            .namespace(NAMESPACE)
            .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]),
            &["outcome"],
        )?;
        registry.register(Box::new(generation_duration.clone()))?;

        let units_enqueued = Counter::with_opts(
            Opts::new("units_enqueued_total", "Units pushed onto the hand-off queue")
                .namespace(NAMESPACE),
        )?;
        registry.register(Box::new(units_enqueued.clone()))?;

        let units = CounterVec::new(
            Opts::new("units_total", "Units examined by the executor, by outcome")
                .namespace(NAMESPACE),
            &["outcome"],
        )?;
        registry.register(Box::new(units.clone()))?;

        let unit_slack = Histogram::with_opts(
            HistogramOpts::new(
                "unit_slack_seconds",
                "Time left before the deadline when the executor examined a unit",
            )
            .namespace(NAMESPACE)
            .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 1.0]),
        )?;
        registry.register(Box::new(unit_slack.clone()))?;

        Ok(Self {
            generations,
            generation_duration,
            units_enqueued,
            units,
            unit_slack,
            registry,
        })
    }

    /// Create a backend with its own registry.
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::new_with_registry(Arc::new(Registry::new()))
    }

    /// Gather all metrics for exposition.
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    /// Underlying registry, for registering application metrics alongside.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn record_generation(&self, outcome: GenerationOutcome, units: usize, duration_ms: u64) {
        let label = outcome.as_label();
        self.generations.with_label_values(&[label]).inc();
        self.generation_duration
            .with_label_values(&[label])
            .observe(duration_ms as f64 / 1000.0);
        if units > 0 {
            self.units_enqueued.inc_by(units as f64);
        }
    }

    fn record_unit(&self, outcome: UnitOutcome, slack_ms: u64) {
        self.units.with_label_values(&[outcome.as_label()]).inc();
        self.unit_slack.observe(slack_ms as f64 / 1000.0);
    }
}

#[cfg(test)]
mod tests {
    use prometheus::{Encoder, TextEncoder};

    use super::*;

    fn exposition(metrics: &PrometheusMetrics) -> String {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&metrics.gather(), &mut buffer)
            .unwrap();
        String::from_utf8(buffer).unwrap()
    }

    fn family<'a>(families: &'a [MetricFamily], name: &str) -> &'a MetricFamily {
        families
            .iter()
            .find(|f| f.name() == name)
            .unwrap_or_else(|| panic!("metric {name} not found"))
    }

    #[test]
    fn can_create_prometheus_metrics() {
        let _metrics = PrometheusMetrics::new().expect("failed to create metrics");
    }

    #[test]
    fn generation_outcomes_are_labelled() {
        let metrics = PrometheusMetrics::new().unwrap();

        metrics.record_generation(GenerationOutcome::Complete, 5, 10);
        metrics.record_generation(GenerationOutcome::Expired, 0, 100);
        metrics.record_generation(GenerationOutcome::Complete, 2, 3);

        let families = metrics.gather();
        assert_eq!(family(&families, "relay_generations_total").get_metric().len(), 2);
        assert_eq!(
            family(&families, "relay_generation_duration_seconds")
                .get_metric()
                .len(),
            2
        );
        assert!(exposition(&metrics).contains("relay_units_enqueued_total 7"));
    }

    #[test]
    fn unit_outcomes_are_counted() {
        let metrics = PrometheusMetrics::new().unwrap();

        metrics.record_unit(UnitOutcome::Completed, 40);
        metrics.record_unit(UnitOutcome::Completed, 20);
        metrics.record_unit(UnitOutcome::Expired, 0);

        let families = metrics.gather();
        assert_eq!(family(&families, "relay_units_total").get_metric().len(), 2);
        assert!(exposition(&metrics).contains("relay_unit_slack_seconds_count 3"));
    }

    #[test]
    fn can_use_custom_registry() {
        let registry = Arc::new(Registry::new());
        let metrics = PrometheusMetrics::new_with_registry(registry.clone()).unwrap();

        metrics.record_unit(UnitOutcome::Expired, 0);
        assert!(!registry.gather().is_empty());
    }
}
