//! End-to-end cycle tests over an in-memory token source.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;

use pulse_core::{DiscoveryItem, PairQuote, SnapshotStatus};
use pulse_gateway::{BoxFuture, GatewayResult, TokenSource};
use pulse_universe::{UniverseConfig, UniverseManager};

/// Canned provider: fixed discovery feeds and a mutable pair book keyed by
/// token address, serving both searches and batched lookups.
#[derive(Default)]
struct StubSource {
    profiles: Mutex<Vec<DiscoveryItem>>,
    pairs: Mutex<HashMap<String, PairQuote>>,
}

impl StubSource {
    fn set_profiles(&self, addresses: &[&str]) {
        *self.profiles.lock().unwrap() = addresses
            .iter()
            .map(|a| DiscoveryItem {
                chain_id: "solana".to_string(),
                token_address: a.to_string(),
            })
            .collect();
    }

    fn put_pair(&self, pair: PairQuote) {
        let address = pair.base_address().unwrap().to_owned();
        self.pairs.lock().unwrap().insert(address, pair);
    }

    fn remove_pair(&self, address: &str) {
        self.pairs.lock().unwrap().remove(address);
    }
}

impl TokenSource for StubSource {
    fn latest_token_profiles(&self) -> BoxFuture<'_, GatewayResult<Vec<DiscoveryItem>>> {
        let items = self.profiles.lock().unwrap().clone();
        Box::pin(async move { Ok(items) })
    }

    fn latest_boosts(&self) -> BoxFuture<'_, GatewayResult<Vec<DiscoveryItem>>> {
        Box::pin(async move { Ok(Vec::new()) })
    }

    fn top_boosts(&self) -> BoxFuture<'_, GatewayResult<Vec<DiscoveryItem>>> {
        Box::pin(async move { Ok(Vec::new()) })
    }

    fn community_takeovers(&self) -> BoxFuture<'_, GatewayResult<Vec<DiscoveryItem>>> {
        Box::pin(async move { Ok(Vec::new()) })
    }

    fn search_pairs<'a>(&'a self, _term: &'a str) -> BoxFuture<'a, GatewayResult<Vec<PairQuote>>> {
        let pairs: Vec<PairQuote> = self.pairs.lock().unwrap().values().cloned().collect();
        Box::pin(async move { Ok(pairs) })
    }

    fn pairs_by_addresses<'a>(
        &'a self,
        addresses: &'a [String],
    ) -> BoxFuture<'a, GatewayResult<Vec<PairQuote>>> {
        let book = self.pairs.lock().unwrap();
        let pairs: Vec<PairQuote> = addresses
            .iter()
            .filter_map(|a| book.get(a).cloned())
            .collect();
        Box::pin(async move { Ok(pairs) })
    }
}

fn quote(token: &str, liquidity: f64, vol24: f64, vol1: f64, vol5: f64, age_minutes: i64) -> PairQuote {
    let now_ms = Utc::now().timestamp_millis();
    serde_json::from_value(serde_json::json!({
        "chainId": "solana",
        "dexId": "raydium",
        "url": format!("https://dexscreener.com/solana/{token}"),
        "pairAddress": format!("pool-{token}"),
        "baseToken": {"address": token, "name": format!("{token} Coin"), "symbol": token},
        "priceUsd": "0.05",
        "txns": {"m5": {"buys": 10, "sells": 10}, "h1": {"buys": 100, "sells": 100}},
        "volume": {"m5": vol5, "h1": vol1, "h24": vol24},
        "priceChange": {"m5": 1.0, "h1": 2.0, "h24": 3.0},
        "liquidity": {"usd": liquidity},
        "marketCap": 1_000_000,
        "pairCreatedAt": now_ms - age_minutes * 60_000,
    }))
    .unwrap()
}

/// A pair that fails both the entry and the keep filter but still decodes.
fn husk(token: &str) -> PairQuote {
    quote(token, 1_000.0, 0.0, 0.0, 0.0, 600)
}

fn test_config() -> UniverseConfig {
    UniverseConfig {
        search_terms: vec!["meme".to_string()],
        ..UniverseConfig::default()
    }
}

fn seeded_source() -> Arc<StubSource> {
    let source = Arc::new(StubSource::default());
    source.set_profiles(&["AAA"]);
    source.put_pair(quote("AAA", 80_000.0, 500_000.0, 100_000.0, 20_000.0, 600));
    source.put_pair(quote("BBB", 30_000.0, 150_000.0, 40_000.0, 6_000.0, 1_200));
    source
}

#[tokio::test]
async fn test_initialize_builds_live_ranked_universe() {
    let source = seeded_source();
    let manager = UniverseManager::new(source, test_config());

    manager.initialize().await.unwrap();

    let snapshot = manager.snapshot();
    assert_eq!(snapshot.status, SnapshotStatus::Live);
    assert_eq!(snapshot.counts.tracked, 2);
    assert_eq!(snapshot.counts.candidate_pool, 2);

    // Dense ranks, descending score.
    assert_eq!(snapshot.items[0].rank, 1);
    assert_eq!(snapshot.items[1].rank, 2);
    assert!(snapshot.items[0].live_score() >= snapshot.items[1].live_score());
    assert_eq!(snapshot.items[0].token_address(), "AAA");

    // The profile hint reached the scored candidate.
    let aaa = &snapshot.items[0].candidate;
    assert!(aaa.has_profile);
    assert!(aaa.score_breakdown.discovery >= 6.0);
}

#[tokio::test]
async fn test_fast_cycle_evicts_after_weak_threshold() {
    let source = seeded_source();
    let manager = UniverseManager::new(source.clone(), test_config());
    manager.initialize().await.unwrap();

    // BBB collapses: no longer produces a valid candidate.
    source.put_pair(husk("BBB"));

    // First weak cycle: counter at 1, still tracked with stale fields.
    manager.refresh_tracked().await.unwrap();
    let snapshot = manager.snapshot();
    assert!(snapshot.items.iter().any(|c| c.token_address() == "BBB"));

    // Second weak cycle reaches the threshold: evicted immediately.
    manager.refresh_tracked().await.unwrap();
    let snapshot = manager.snapshot();
    assert_eq!(snapshot.counts.tracked, 1);
    assert!(snapshot.items.iter().all(|c| c.token_address() != "BBB"));
}

#[tokio::test]
async fn test_absent_token_survives_fast_cycles_until_rebalance() {
    let source = seeded_source();
    let manager = UniverseManager::new(source.clone(), test_config());
    manager.initialize().await.unwrap();

    // BBB disappears from the provider entirely.
    source.remove_pair("BBB");

    // Absence only advances the counter; the fast cycle never removes a
    // token it could not refetch.
    manager.refresh_tracked().await.unwrap();
    manager.refresh_tracked().await.unwrap();
    assert!(manager
        .snapshot()
        .items
        .iter()
        .any(|c| c.token_address() == "BBB"));

    // A fresh discovery sweep no longer yields BBB, and the next rebalance
    // drops it from the universe.
    manager.refresh_candidate_pool().await.unwrap();
    manager.rebalance(true);
    let snapshot = manager.snapshot();
    assert_eq!(snapshot.counts.tracked, 1);
    assert_eq!(snapshot.items[0].token_address(), "AAA");
}

#[tokio::test]
async fn test_discovery_hints_are_sticky_across_sweeps() {
    let source = seeded_source();
    let manager = UniverseManager::new(source.clone(), test_config());
    manager.initialize().await.unwrap();

    // The profile feed dries up; the hint must persist.
    source.set_profiles(&[]);
    manager.refresh_candidate_pool().await.unwrap();
    manager.rebalance(true);

    let snapshot = manager.snapshot();
    let aaa = snapshot
        .items
        .iter()
        .find(|c| c.token_address() == "AAA")
        .unwrap();
    assert!(aaa.candidate.has_profile);
}

#[tokio::test]
async fn test_empty_provider_stays_warming_up() {
    let source = Arc::new(StubSource::default());
    let manager = UniverseManager::new(source, test_config());

    manager.initialize().await.unwrap();

    let snapshot = manager.snapshot();
    assert_eq!(snapshot.status, SnapshotStatus::WarmingUp);
    assert_eq!(snapshot.counts.tracked, 0);
    assert_eq!(snapshot.counts.candidate_pool, 0);
    assert!(snapshot.items.is_empty());
}

#[tokio::test]
async fn test_rebalance_respects_cadence_without_force() {
    let source = seeded_source();
    let manager = UniverseManager::new(source, test_config());
    manager.initialize().await.unwrap();

    // The forced rebalance during initialize just ran; a non-forced one
    // inside the cadence window is skipped.
    assert!(!manager.rebalance(false));
    assert!(manager.rebalance(true));
}
