//! Universe configuration: thresholds, quotas, cadences.

use serde::{Deserialize, Serialize};

/// Tunable policy for the universe manager.
///
/// Every field has a default so a partial TOML section works. Persistence
/// slots are derived from the other quotas unless set explicitly, and are
/// clamped to a valid range at read time; an inconsistent configuration is
/// never a runtime error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniverseConfig {
    /// Chain identifier echoed in snapshots.
    #[serde(default = "default_chain_id")]
    pub chain_id: String,
    /// Maximum size of the tracked universe.
    #[serde(default = "default_target_universe")]
    pub target_universe: usize,
    /// Slots filled purely by live score.
    #[serde(default = "default_trending_slots")]
    pub trending_slots: usize,
    /// Slots reserved for newly launched tokens.
    #[serde(default = "default_fresh_slots")]
    pub fresh_slots: usize,
    /// Slots reserved for already-tracked tokens. Derived from the other
    /// quotas when unset; see [`UniverseConfig::persistence_slots`].
    #[serde(default)]
    pub persistence_slots: Option<usize>,
    #[serde(default = "default_min_liquidity_usd")]
    pub min_liquidity_usd: f64,
    #[serde(default = "default_min_volume_m5_usd")]
    pub min_volume_m5_usd: f64,
    #[serde(default = "default_min_volume_h1_usd")]
    pub min_volume_h1_usd: f64,
    #[serde(default = "default_min_volume_h24_usd")]
    pub min_volume_h24_usd: f64,
    /// Minimum pool age before a token may enter the universe.
    #[serde(default = "default_min_age_minutes")]
    pub min_age_minutes: f64,
    /// Tracked-set refresh cadence.
    #[serde(default = "default_fast_refresh_ms")]
    pub fast_refresh_ms: u64,
    /// Discovery and candidate pool refresh cadence.
    #[serde(default = "default_candidate_refresh_ms")]
    pub candidate_refresh_ms: u64,
    /// Minimum interval between non-forced rebalances.
    #[serde(default = "default_rebalance_ms")]
    pub rebalance_ms: u64,
    /// Consecutive weak cycles before a tracked token is dropped.
    #[serde(default = "default_weak_cycles_before_drop")]
    pub weak_cycles_before_drop: u32,
    /// Maximum candidates kept from one discovery sweep.
    #[serde(default = "default_candidate_pool_size")]
    pub candidate_pool_size: usize,
    /// Age ceiling for the fresh bucket and the freshness score term.
    #[serde(default = "default_max_fresh_age_hours")]
    pub max_fresh_age_hours: f64,
    /// Keyword list for the discovery search sweep.
    #[serde(default = "default_search_terms")]
    pub search_terms: Vec<String>,
}

fn default_chain_id() -> String {
    "solana".to_string()
}

fn default_target_universe() -> usize {
    100
}

fn default_trending_slots() -> usize {
    60
}

fn default_fresh_slots() -> usize {
    25
}

fn default_min_liquidity_usd() -> f64 {
    25_000.0
}

fn default_min_volume_m5_usd() -> f64 {
    5_000.0
}

fn default_min_volume_h1_usd() -> f64 {
    25_000.0
}

fn default_min_volume_h24_usd() -> f64 {
    100_000.0
}

fn default_min_age_minutes() -> f64 {
    5.0
}

fn default_fast_refresh_ms() -> u64 {
    15_000
}

fn default_candidate_refresh_ms() -> u64 {
    60_000
}

fn default_rebalance_ms() -> u64 {
    300_000
}

fn default_weak_cycles_before_drop() -> u32 {
    2
}

fn default_candidate_pool_size() -> usize {
    250
}

fn default_max_fresh_age_hours() -> f64 {
    24.0
}

fn default_search_terms() -> Vec<String> {
    ["pump", "moon", "meme", "ai", "cat", "dog", "sol"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            chain_id: default_chain_id(),
            target_universe: default_target_universe(),
            trending_slots: default_trending_slots(),
            fresh_slots: default_fresh_slots(),
            persistence_slots: None,
            min_liquidity_usd: default_min_liquidity_usd(),
            min_volume_m5_usd: default_min_volume_m5_usd(),
            min_volume_h1_usd: default_min_volume_h1_usd(),
            min_volume_h24_usd: default_min_volume_h24_usd(),
            min_age_minutes: default_min_age_minutes(),
            fast_refresh_ms: default_fast_refresh_ms(),
            candidate_refresh_ms: default_candidate_refresh_ms(),
            rebalance_ms: default_rebalance_ms(),
            weak_cycles_before_drop: default_weak_cycles_before_drop(),
            candidate_pool_size: default_candidate_pool_size(),
            max_fresh_age_hours: default_max_fresh_age_hours(),
            search_terms: default_search_terms(),
        }
    }
}

impl UniverseConfig {
    /// Effective persistence quota: the configured value, or
    /// `target_universe - trending_slots - fresh_slots`, clamped to
    /// `[0, target_universe]`.
    pub fn persistence_slots(&self) -> usize {
        let derived = self
            .target_universe
            .saturating_sub(self.trending_slots)
            .saturating_sub(self.fresh_slots);
        self.persistence_slots.unwrap_or(derived).min(self.target_universe)
    }
}
