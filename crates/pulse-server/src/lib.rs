//! pulse-server - HTTP surface for the live universe.
//!
//! A small axum app over the universe manager's published snapshot:
//!
//! - `GET /api/health` - liveness and chain id
//! - `GET /api/live-universe` - the full snapshot JSON
//! - `GET /api/debug/candidates` - status, counts, and the top ten items
//!
//! Handlers only ever read the current `Arc` snapshot; they never touch
//! manager internals.

pub mod config;
pub mod error;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{create_router, run_server, AppState};
