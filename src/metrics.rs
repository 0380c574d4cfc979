use lazy_static::lazy_static;
use prometheus::{
    Counter, Encoder, Gauge, Histogram, TextEncoder, register_counter, register_gauge,
    register_histogram,
};

lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("boxe_requests_total", "Total number of API requests").unwrap();
    pub static ref REGISTRATIONS: Counter = register_counter!(
        "boxe_registrations_total",
        "Email registrations admitted by the rate limiter"
    )
    .unwrap();
    pub static ref REGISTRATIONS_LIMITED: Counter = register_counter!(
        "boxe_registrations_rate_limited_total",
        "Email registrations rejected by the rate limiter"
    )
    .unwrap();
    pub static ref INVITATION_FAILURES: Counter = register_counter!(
        "boxe_invitation_failures_total",
        "Invitation emails that could not be sent"
    )
    .unwrap();
    pub static ref SURVEY_SUBMISSIONS: Counter =
        register_counter!("boxe_survey_submissions_total", "Accepted survey submissions")
            .unwrap();
    pub static ref REQUEST_LATENCY: Histogram = register_histogram!(
        "boxe_request_latency_seconds",
        "Request latency in seconds"
    )
    .unwrap();
    pub static ref RATE_LIMIT_TRACKED: Gauge = register_gauge!(
        "boxe_rate_limit_tracked_entries",
        "Emails currently tracked by the rate limiter"
    )
    .unwrap();
}

// Render the default registry in the Prometheus text format
pub fn render() -> Result<String, String> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| e.to_string())?;
    String::from_utf8(buffer).map_err(|e| e.to_string())
}
