use prometheus::{
    Encoder, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub assignments_total: IntCounterVec,
    pub assignment_latency_seconds: HistogramVec,
    pub deliveries_recorded_total: IntCounter,
    pub deliveries_by_city_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let assignments_total = IntCounterVec::new(
            Opts::new("assignments_total", "Total driver assignments by outcome"),
            &["outcome"],
        )
        .expect("valid assignments_total metric");

        let assignment_latency_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "assignment_latency_seconds",
                "Latency of driver assignment in seconds",
            ),
            &["outcome"],
        )
        .expect("valid assignment_latency_seconds metric");

        let deliveries_recorded_total = IntCounter::new(
            "deliveries_recorded_total",
            "Deliveries persisted since startup",
        )
        .expect("valid deliveries_recorded_total metric");

        let deliveries_by_city_total = IntCounterVec::new(
            Opts::new("deliveries_by_city_total", "Deliveries created per city"),
            &["city"],
        )
        .expect("valid deliveries_by_city_total metric");

        registry
            .register(Box::new(assignments_total.clone()))
            .expect("register assignments_total");
        registry
            .register(Box::new(assignment_latency_seconds.clone()))
            .expect("register assignment_latency_seconds");
        registry
            .register(Box::new(deliveries_recorded_total.clone()))
            .expect("register deliveries_recorded_total");
        registry
            .register(Box::new(deliveries_by_city_total.clone()))
            .expect("register deliveries_by_city_total");

        Self {
            registry,
            assignments_total,
            assignment_latency_seconds,
            deliveries_recorded_total,
            deliveries_by_city_total,
        }
    }

    pub fn record_assignment(&self, outcome: &str, elapsed_seconds: f64) {
        self.assignment_latency_seconds
            .with_label_values(&[outcome])
            .observe(elapsed_seconds);
        self.assignments_total.with_label_values(&[outcome]).inc();
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
