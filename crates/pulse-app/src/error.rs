//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Gateway error: {0}")]
    Gateway(#[from] pulse_gateway::GatewayError),

    #[error("Server error: {0}")]
    Server(#[from] pulse_server::ServerError),
}

pub type AppResult<T> = Result<T, AppError>;
