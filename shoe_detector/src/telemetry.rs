use crate::analysis::AnalysisStatus;
use opentelemetry::{
    global,
    metrics::{Counter, Histogram, MeterProvider},
    KeyValue,
};
use opentelemetry_sdk::metrics::SdkMeterProvider;
use prometheus::Registry;

/// Upper bounds for remote inference latency, in milliseconds.
const INFERENCE_DURATION_BOUNDARIES: [f64; 12] = [
    50.0, 100.0, 200.0, 300.0, 500.0, 750.0, 1000.0, 1500.0, 2000.0, 5000.0, 10000.0, 30000.0,
];

pub struct Metrics {
    upload_counter: Counter<u64>,
    outcome_counter: Counter<u64>,
    inference_duration: Histogram<u64>,
    pub registry: Registry,
    // Dropping the last handle shuts the provider down and empties the registry.
    _provider: SdkMeterProvider,
}

impl Metrics {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();
        let exporter = opentelemetry_prometheus::exporter()
            .with_registry(registry.clone())
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build prometheus exporter: {}", e))?;

        let provider = SdkMeterProvider::builder().with_reader(exporter).build();

        let meter = provider.meter("shoe_detector");
        global::set_meter_provider(provider.clone());

        let upload_counter = meter
            .u64_counter("uploads")
            .with_description("Total number of accepted image uploads")
            .build();

        let outcome_counter = meter
            .u64_counter("analysis_outcomes")
            .with_description("Analyses by outcome")
            .build();

        let inference_duration = meter
            .u64_histogram("inference_duration_ms")
            .with_boundaries(INFERENCE_DURATION_BOUNDARIES.to_vec())
            .with_description("Duration of remote inference calls in milliseconds")
            .build();

        Ok(Metrics {
            upload_counter,
            outcome_counter,
            inference_duration,
            registry,
            _provider: provider,
        })
    }

    pub fn record_upload(&self, extension: &str) {
        let attributes = [KeyValue::new("extension", extension.to_string())];
        self.upload_counter.add(1, &attributes);
    }

    pub fn record_outcome(&self, status: AnalysisStatus) {
        let attributes = [KeyValue::new("status", status.as_str())];
        self.outcome_counter.add(1, &attributes);
    }

    pub fn record_inference_duration(&self, duration_ms: u64, status: AnalysisStatus) {
        let attributes = [KeyValue::new("status", status.as_str())];
        self.inference_duration.record(duration_ms, &attributes);
    }
}
