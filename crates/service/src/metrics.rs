use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static LOGINS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "booking_api_logins_total",
        "Login attempts by outcome",
        &["outcome"]
    )
    .expect("register logins_total")
});

pub static REGISTRATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "booking_api_registrations_total",
        "Registration attempts by outcome",
        &["outcome"]
    )
    .expect("register registrations_total")
});

pub static TOKEN_REFRESH_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "booking_api_token_refresh_total",
        "Refresh-token exchanges by outcome",
        &["outcome"]
    )
    .expect("register token_refresh_total")
});

/// Outcome label for a result: `ok` or the error kind.
pub fn outcome<T>(res: &Result<T, crate::errors::ServiceError>) -> &'static str {
    match res {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    }
}

/// Render the default registry in the Prometheus text format.
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
