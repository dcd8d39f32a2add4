//! Detailing Core
//!
//! Domain core of a car-detailing booking platform: clients book service
//! time slots, detailers manage offerings, schedules, employees, orders
//! and invoices. Services are constructed over an abstract entity store;
//! the presentation layer forwards pre-authenticated actor ids and
//! primitive arguments in and serializes the structured results out.

pub mod config;
pub mod dates;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, AppResult, ErrorKind};
pub use services::Services;

/// Initialize tracing for an embedding application
pub fn init_tracing(config: &config::LoggingConfig) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("detailing_core={}", config.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
