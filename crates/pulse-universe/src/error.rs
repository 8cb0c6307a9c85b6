//! Universe error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UniverseError {
    #[error("gateway error: {0}")]
    Gateway(#[from] pulse_gateway::GatewayError),
}

pub type UniverseResult<T> = Result<T, UniverseError>;
