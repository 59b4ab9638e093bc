mod health;
mod metrics;
mod register;
mod webhook;

pub use health::health_handler;
pub use metrics::metrics_handler;
pub use register::register_handler;
pub use webhook::{MessageKind, webhook_handler};
