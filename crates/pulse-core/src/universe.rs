//! Derived universe types: candidates, tracked coins, the published snapshot.
//!
//! Everything here serializes camelCase because the snapshot is the wire
//! format consumed by external dashboards.

use serde::Serialize;

/// Sticky per-token discovery signals.
///
/// Flags are only ever raised; a token that once appeared in a discovery
/// feed keeps the signal for the lifetime of the process, independent of
/// candidate pool replacement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscoveryHint {
    pub has_profile: bool,
    pub has_community_takeover: bool,
    pub has_boost: bool,
    pub has_top_boost: bool,
}

/// Selection category a tracked coin was admitted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Trending,
    Fresh,
    Persistence,
}

/// Per-term decomposition of a live score, rounded to 2 decimals for display.
#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub liquidity: f64,
    pub volume: f64,
    pub momentum: f64,
    pub freshness: f64,
    pub discovery: f64,
    pub hold_bonus: f64,
}

/// A scored token, recomputed from scratch every cycle.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub token_address: String,
    pub pair_address: String,
    pub symbol: String,
    pub name: String,
    pub chain_id: String,
    pub dex_id: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Raw composite score; ranking always uses this, not the rounded terms.
    pub live_score: f64,
    pub score_breakdown: ScoreBreakdown,
    pub price_usd: f64,
    pub market_cap: f64,
    pub liquidity_usd: f64,
    pub volume_m5_usd: f64,
    pub volume_h1_usd: f64,
    pub volume_h24_usd: f64,
    pub txns_m5: u64,
    pub txns_h1: u64,
    pub price_change_m5: f64,
    pub price_change_h1: f64,
    pub price_change_h24: f64,
    pub boosts_active: u64,
    pub has_profile: bool,
    pub has_community_takeover: bool,
    pub age_minutes: i64,
    pub pair_created_at: i64,
    pub updated_at: i64,
}

/// A candidate selected into the tracked universe.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedCoin {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub bucket: Bucket,
    /// Dense 1..N, strictly by descending live score.
    pub rank: u32,
}

impl TrackedCoin {
    pub fn token_address(&self) -> &str {
        &self.candidate.token_address
    }

    pub fn live_score(&self) -> f64 {
        self.candidate.live_score
    }
}

/// Snapshot lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotStatus {
    WarmingUp,
    Live,
}

/// Effective configuration echoed in every snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotConfig {
    pub chain_id: String,
    pub target_universe: usize,
    pub trending_slots: usize,
    pub fresh_slots: usize,
    pub persistence_slots: usize,
    pub fast_refresh_ms: u64,
    pub candidate_refresh_ms: u64,
    pub rebalance_ms: u64,
    pub min_liquidity_usd: f64,
    pub min_volume_h24_usd: f64,
}

/// Set sizes at snapshot time.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotCounts {
    pub tracked: usize,
    pub candidate_pool: usize,
}

/// Immutable read view of the universe.
///
/// Built whole after every state-mutating cycle; readers only ever hold a
/// fully-formed snapshot, never one under construction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UniverseSnapshot {
    /// Epoch milliseconds of the last rebuild.
    pub updated_at: i64,
    /// Same instant, RFC 3339.
    pub generated_at: String,
    pub status: SnapshotStatus,
    pub config: SnapshotConfig,
    pub counts: SnapshotCounts,
    /// Tracked coins, descending by live score.
    pub items: Vec<TrackedCoin>,
}
