use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, register_counter, register_counter_vec,
};

lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("gateway_requests_total", "Total number of requests").unwrap();
    pub static ref REGISTRATIONS_TOTAL: Counter = register_counter!(
        "gateway_registrations_total",
        "Registrations accepted and dispatched"
    )
    .unwrap();
    pub static ref RATE_LIMITED_TOTAL: Counter = register_counter!(
        "gateway_rate_limited_total",
        "Requests rejected by the rate limiter"
    )
    .unwrap();
    pub static ref HONEYPOT_HITS: Counter = register_counter!(
        "gateway_honeypot_hits_total",
        "Submissions dropped for a filled honeypot field"
    )
    .unwrap();
    pub static ref WEBHOOK_UPDATES_TOTAL: Counter = register_counter!(
        "gateway_webhook_updates_total",
        "Webhook updates carrying a message"
    )
    .unwrap();
    pub static ref DISPATCH_FAILURES: CounterVec = register_counter_vec!(
        "gateway_dispatch_failures_total",
        "Outbound dispatch failures by sink",
        &["sink"]
    )
    .unwrap();
}
