//! HTTP client for the DEX Screener REST API.
//!
//! Discovery feeds return either a bare array or a single object; both
//! decode to a list. Every result set is filtered to the configured chain
//! before it leaves this module.

use std::time::Duration;

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use pulse_core::{DiscoveryItem, PairQuote};

use crate::error::{GatewayError, GatewayResult};
use crate::source::{BoxFuture, TokenSource};

/// Provider limit on addresses per batched pair lookup.
pub const PAIR_BATCH_LIMIT: usize = 30;

/// Gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Provider API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Chain all results are filtered to.
    #[serde(default = "default_chain_id")]
    pub chain_id: String,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_base_url() -> String {
    "https://api.dexscreener.com".to_string()
}

fn default_chain_id() -> String {
    "solana".to_string()
}

fn default_request_timeout_ms() -> u64 {
    8_000
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            chain_id: default_chain_id(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

/// Envelope returned by the pair-search endpoint.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    pairs: Vec<PairQuote>,
}

/// Client for the provider REST endpoints.
pub struct ScreenerClient {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl ScreenerClient {
    /// Create a new client with the configured request timeout.
    pub fn new(config: GatewayConfig) -> GatewayResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| GatewayError::HttpClient(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    pub fn chain_id(&self) -> &str {
        &self.config.chain_id
    }

    async fn get_json(&self, request: reqwest::RequestBuilder) -> GatewayResult<serde_json::Value> {
        let response = request
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| GatewayError::HttpClient(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| GatewayError::HttpClient(format!("failed to read response body: {e}")))
    }

    /// Fetch one discovery feed and filter it to the configured chain.
    async fn fetch_feed(&self, path: &str) -> GatewayResult<Vec<DiscoveryItem>> {
        let url = format!("{}/{}", self.config.base_url, path);
        let payload = self.get_json(self.client.get(&url)).await?;
        let items = decode_list::<DiscoveryItem>(payload);
        let items: Vec<DiscoveryItem> = items
            .into_iter()
            .filter(|item| item.chain_id == self.config.chain_id)
            .collect();
        debug!(path, count = items.len(), "Fetched discovery feed");
        Ok(items)
    }

    /// Latest token-profile feed.
    pub async fn fetch_latest_token_profiles(&self) -> GatewayResult<Vec<DiscoveryItem>> {
        self.fetch_feed("token-profiles/latest/v1").await
    }

    /// Latest paid-boost feed.
    pub async fn fetch_latest_boosts(&self) -> GatewayResult<Vec<DiscoveryItem>> {
        self.fetch_feed("token-boosts/latest/v1").await
    }

    /// Top paid-boost feed.
    pub async fn fetch_top_boosts(&self) -> GatewayResult<Vec<DiscoveryItem>> {
        self.fetch_feed("token-boosts/top/v1").await
    }

    /// Community-takeover feed.
    pub async fn fetch_community_takeovers(&self) -> GatewayResult<Vec<DiscoveryItem>> {
        self.fetch_feed("community-takeovers/latest/v1").await
    }

    /// Search pairs by keyword, filtered to the configured chain.
    pub async fn search_pairs(&self, term: &str) -> GatewayResult<Vec<PairQuote>> {
        let url = format!("{}/latest/dex/search", self.config.base_url);
        let payload = self.get_json(self.client.get(&url).query(&[("q", term)])).await?;
        let response: SearchResponse = serde_json::from_value(payload)?;
        Ok(self.filter_chain(response.pairs))
    }

    /// Fetch pairs for a set of token addresses.
    ///
    /// Addresses are deduplicated, chunked to [`PAIR_BATCH_LIMIT`], and the
    /// chunks are issued concurrently. A failed chunk is logged and yields
    /// nothing; the remaining chunks still contribute.
    pub async fn fetch_pairs_by_addresses(
        &self,
        addresses: &[String],
    ) -> GatewayResult<Vec<PairQuote>> {
        let deduped = dedup_non_empty(addresses);
        if deduped.is_empty() {
            return Ok(Vec::new());
        }

        let fetches = deduped
            .chunks(PAIR_BATCH_LIMIT)
            .map(|chunk| self.fetch_pair_chunk(chunk))
            .collect::<Vec<_>>();

        let mut pairs = Vec::new();
        for result in join_all(fetches).await {
            match result {
                Ok(chunk_pairs) => pairs.extend(chunk_pairs),
                Err(error) => {
                    warn!(%error, "Pair lookup chunk failed, continuing without it");
                }
            }
        }

        Ok(pairs)
    }

    async fn fetch_pair_chunk(&self, chunk: &[String]) -> GatewayResult<Vec<PairQuote>> {
        let url = format!(
            "{}/tokens/v1/{}/{}",
            self.config.base_url,
            self.config.chain_id,
            chunk.join(",")
        );
        let payload = self.get_json(self.client.get(&url)).await?;
        Ok(self.filter_chain(decode_list::<PairQuote>(payload)))
    }

    fn filter_chain(&self, pairs: Vec<PairQuote>) -> Vec<PairQuote> {
        pairs
            .into_iter()
            .filter(|pair| pair.chain_id == self.config.chain_id)
            .collect()
    }
}

impl TokenSource for ScreenerClient {
    fn latest_token_profiles(&self) -> BoxFuture<'_, GatewayResult<Vec<DiscoveryItem>>> {
        Box::pin(self.fetch_latest_token_profiles())
    }

    fn latest_boosts(&self) -> BoxFuture<'_, GatewayResult<Vec<DiscoveryItem>>> {
        Box::pin(self.fetch_latest_boosts())
    }

    fn top_boosts(&self) -> BoxFuture<'_, GatewayResult<Vec<DiscoveryItem>>> {
        Box::pin(self.fetch_top_boosts())
    }

    fn community_takeovers(&self) -> BoxFuture<'_, GatewayResult<Vec<DiscoveryItem>>> {
        Box::pin(self.fetch_community_takeovers())
    }

    fn search_pairs<'a>(
        &'a self,
        term: &'a str,
    ) -> BoxFuture<'a, GatewayResult<Vec<PairQuote>>> {
        Box::pin(self.search_pairs(term))
    }

    fn pairs_by_addresses<'a>(
        &'a self,
        addresses: &'a [String],
    ) -> BoxFuture<'a, GatewayResult<Vec<PairQuote>>> {
        Box::pin(self.fetch_pairs_by_addresses(addresses))
    }
}

/// Decode a payload that may be a bare array, a single object, or null.
fn decode_list<T: serde::de::DeserializeOwned>(payload: serde_json::Value) -> Vec<T> {
    match payload {
        serde_json::Value::Array(values) => values
            .into_iter()
            .filter_map(|value| serde_json::from_value(value).ok())
            .collect(),
        serde_json::Value::Null => Vec::new(),
        value => serde_json::from_value(value).map(|v| vec![v]).unwrap_or_default(),
    }
}

/// Drop empty addresses and duplicates, preserving first-seen order.
fn dedup_non_empty(addresses: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    addresses
        .iter()
        .filter(|a| !a.is_empty())
        .filter(|a| seen.insert(a.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_list_from_array() {
        let items: Vec<DiscoveryItem> = decode_list(json!([
            {"chainId": "solana", "tokenAddress": "A"},
            {"chainId": "solana", "tokenAddress": "B"}
        ]));
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].token_address, "B");
    }

    #[test]
    fn test_decode_list_from_single_object() {
        let items: Vec<DiscoveryItem> =
            decode_list(json!({"chainId": "solana", "tokenAddress": "A"}));
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_decode_list_from_null() {
        let items: Vec<DiscoveryItem> = decode_list(serde_json::Value::Null);
        assert!(items.is_empty());
    }

    #[test]
    fn test_dedup_preserves_first_seen_order() {
        let input = vec![
            "B".to_string(),
            String::new(),
            "A".to_string(),
            "B".to_string(),
            "C".to_string(),
            "A".to_string(),
        ];
        assert_eq!(dedup_non_empty(&input), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_batch_chunking_arithmetic() {
        let addresses: Vec<String> = (0..75).map(|i| format!("addr{i}")).collect();
        let deduped = dedup_non_empty(&addresses);
        let chunks: Vec<_> = deduped.chunks(PAIR_BATCH_LIMIT).collect();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 30);
        assert_eq!(chunks[2].len(), 15);
    }

    #[test]
    fn test_search_response_defaults_to_empty() {
        let response: SearchResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.pairs.is_empty());
    }

    #[test]
    fn test_client_filters_foreign_chain() {
        let client = ScreenerClient::new(GatewayConfig::default()).unwrap();
        let pairs: Vec<PairQuote> = decode_list(json!([
            {"chainId": "solana", "pairAddress": "P1"},
            {"chainId": "ethereum", "pairAddress": "P2"}
        ]));
        let filtered = client.filter_chain(pairs);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].pair_address, "P1");
    }
}
