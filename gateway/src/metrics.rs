use lazy_static::lazy_static;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

lazy_static! {
    // Evaluation metrics
    pub static ref EVALUATIONS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("evaluations_total", "Total checkout/login evaluations"),
        &["decision", "signature_status"]
    ).expect("metric can be created");

    pub static ref RISK_SCORE: Histogram = Histogram::with_opts(
        HistogramOpts::new("risk_score_distribution", "Distribution of total risk scores")
            .buckets(vec![0.0, 10.0, 20.0, 35.0, 50.0, 65.0, 80.0, 100.0, 150.0])
    ).expect("metric can be created");

    pub static ref EVALUATION_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new("evaluation_duration_seconds", "Risk evaluation duration")
            .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1])
    ).expect("metric can be created");

    // Event feed metrics
    pub static ref EVENT_LOG_SIZE: IntGauge = IntGauge::new(
        "event_log_size",
        "Number of records currently held in the event log"
    ).expect("metric can be created");
}

/// Register all metrics with the given registry
pub fn register_metrics(registry: &Registry) -> Result<(), Box<dyn std::error::Error>> {
    registry.register(Box::new(EVALUATIONS_TOTAL.clone()))?;
    registry.register(Box::new(RISK_SCORE.clone()))?;
    registry.register(Box::new(EVALUATION_DURATION.clone()))?;
    registry.register(Box::new(EVENT_LOG_SIZE.clone()))?;
    Ok(())
}

/// Generate metrics output in Prometheus text format
pub fn metrics_handler() -> Result<String, Box<dyn std::error::Error>> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = vec![];
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registration() {
        let registry = Registry::new();
        let result = register_metrics(&registry);
        assert!(result.is_ok());
    }

    #[test]
    fn test_metrics_handler() {
        EVALUATIONS_TOTAL
            .with_label_values(&["ALLOW", "SIGNED_OK"])
            .inc();
        let result = metrics_handler();
        assert!(result.is_ok());
    }
}
