//! pulse-gateway - Thin HTTP client over the market-data provider.
//!
//! Wraps the provider's discovery feeds, pair search, and batched token
//! lookups. Batched lookups are chunked to the provider's per-request
//! address limit and issued concurrently; a failed chunk is logged and
//! contributes an empty result instead of failing the call.
//!
//! The [`TokenSource`] trait is the seam the universe core consumes, so
//! cycles can be driven by an in-memory stub under test.

pub mod client;
pub mod error;
pub mod source;

pub use client::{GatewayConfig, ScreenerClient, PAIR_BATCH_LIMIT};
pub use error::{GatewayError, GatewayResult};
pub use source::{BoxFuture, TokenSource};
