//! Token source trait for the universe core.
//!
//! A dyn-compatible abstraction over the provider operations so the
//! refresh cycles can be exercised against an in-memory stub.

use std::pin::Pin;

use pulse_core::{DiscoveryItem, PairQuote};

use crate::error::GatewayResult;

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// Provider operations consumed by the universe manager.
///
/// All list results are already filtered to the configured chain.
pub trait TokenSource: Send + Sync {
    /// Latest token-profile feed.
    fn latest_token_profiles(&self) -> BoxFuture<'_, GatewayResult<Vec<DiscoveryItem>>>;

    /// Latest paid-boost feed.
    fn latest_boosts(&self) -> BoxFuture<'_, GatewayResult<Vec<DiscoveryItem>>>;

    /// Top paid-boost feed.
    fn top_boosts(&self) -> BoxFuture<'_, GatewayResult<Vec<DiscoveryItem>>>;

    /// Community-takeover feed.
    fn community_takeovers(&self) -> BoxFuture<'_, GatewayResult<Vec<DiscoveryItem>>>;

    /// Keyword search across pairs.
    fn search_pairs<'a>(&'a self, term: &'a str)
        -> BoxFuture<'a, GatewayResult<Vec<PairQuote>>>;

    /// Batched pair lookup by token address.
    fn pairs_by_addresses<'a>(
        &'a self,
        addresses: &'a [String],
    ) -> BoxFuture<'a, GatewayResult<Vec<PairQuote>>>;
}
