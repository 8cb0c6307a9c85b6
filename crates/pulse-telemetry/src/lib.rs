//! pulse-telemetry - Structured logging bootstrap.

pub mod error;
pub mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
