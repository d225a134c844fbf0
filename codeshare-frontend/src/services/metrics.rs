use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::OnceLock;
use std::time::Duration;

// Global registry
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

// Metrics
pub static API_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static API_REQUEST_DURATION_SECONDS: OnceLock<HistogramVec> = OnceLock::new();

pub fn init_metrics() -> Result<(), prometheus::Error> {
    if REGISTRY.get().is_some() {
        return Ok(());
    }

    let registry = Registry::new();

    let requests_total = IntCounterVec::new(
        Opts::new(
            "codeshare_api_requests_total",
            "Total number of requests sent to the file API",
        ),
        &["operation", "outcome"],
    )?;

    let request_duration = HistogramVec::new(
        HistogramOpts::new(
            "codeshare_api_request_duration_seconds",
            "File API request duration in seconds",
        ),
        &["operation"],
    )?;

    registry.register(Box::new(requests_total.clone()))?;
    registry.register(Box::new(request_duration.clone()))?;

    let _ = REGISTRY.set(registry);
    let _ = API_REQUESTS_TOTAL.set(requests_total);
    let _ = API_REQUEST_DURATION_SECONDS.set(request_duration);
    Ok(())
}

/// Record one finished API call. No-op before [`init_metrics`].
pub fn record_request(operation: &str, outcome: &str, elapsed: Duration) {
    if let Some(counter) = API_REQUESTS_TOTAL.get() {
        counter.with_label_values(&[operation, outcome]).inc();
    }
    if let Some(histogram) = API_REQUEST_DURATION_SECONDS.get() {
        histogram
            .with_label_values(&[operation])
            .observe(elapsed.as_secs_f64());
    }
}

pub fn get_metrics() -> String {
    let Some(registry) = REGISTRY.get() else {
        return String::new();
    };

    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    if let Err(e) = encoder.encode(&registry.gather(), &mut buffer) {
        tracing::warn!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
