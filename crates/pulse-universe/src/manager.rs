//! Universe manager: state ownership and the three refresh cycles.
//!
//! All mutable state (tracked set, weak-cycle counters, discovery hints,
//! candidate pool) lives behind one lock that is only taken after network
//! I/O has completed, and each cycle replaces what it owns wholesale at
//! completion. The published snapshot is a separate `Arc` swap, so readers
//! always hold a fully-formed view.
//!
//! Cycles are not serialized against each other; a slow discovery sweep
//! can finish after a newer fast refresh and overwrite its snapshot. The
//! next tick self-heals, and readers never observe a torn state.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use futures_util::future::join_all;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use pulse_core::{
    Candidate, DiscoveryHint, DiscoveryItem, PairQuote, SnapshotConfig, SnapshotCounts,
    SnapshotStatus, TrackedCoin, UniverseSnapshot,
};
use pulse_gateway::{GatewayResult, TokenSource};

use crate::canonical::canonical_pairs;
use crate::config::UniverseConfig;
use crate::error::UniverseResult;
use crate::filters::passes_keep_filter;
use crate::rebalance::{by_score_desc, select_universe, settle_weak_cycles};
use crate::score::{score_pair, PriorTrackedState};

/// Maximum discovery addresses hydrated per round of batched lookups.
const HYDRATION_ROUND_LIMIT: usize = 120;

#[derive(Default)]
struct UniverseState {
    tracked: HashMap<String, TrackedCoin>,
    weak_cycles: HashMap<String, u32>,
    hints: HashMap<String, DiscoveryHint>,
    candidate_pool: Vec<Candidate>,
    last_rebalanced_at_ms: i64,
}

/// Owner of the live universe.
pub struct UniverseManager {
    source: Arc<dyn TokenSource>,
    config: UniverseConfig,
    state: RwLock<UniverseState>,
    snapshot: RwLock<Arc<UniverseSnapshot>>,
}

impl UniverseManager {
    pub fn new(source: Arc<dyn TokenSource>, config: UniverseConfig) -> Self {
        let state = UniverseState::default();
        let snapshot = Arc::new(build_snapshot(
            &state,
            &config,
            SnapshotStatus::WarmingUp,
            Utc::now().timestamp_millis(),
        ));
        Self {
            source,
            config,
            state: RwLock::new(state),
            snapshot: RwLock::new(snapshot),
        }
    }

    pub fn config(&self) -> &UniverseConfig {
        &self.config
    }

    /// Current published snapshot.
    pub fn snapshot(&self) -> Arc<UniverseSnapshot> {
        self.snapshot.read().clone()
    }

    fn publish(&self, snapshot: UniverseSnapshot) {
        *self.snapshot.write() = Arc::new(snapshot);
    }

    /// Warm the universe: one discovery sweep, a forced rebalance, and a
    /// first tracked refresh, then go live.
    pub async fn initialize(&self) -> UniverseResult<()> {
        self.refresh_candidate_pool().await?;
        self.rebalance(true);
        self.refresh_tracked().await?;

        let now_ms = Utc::now().timestamp_millis();
        let snapshot = {
            let state = self.state.read();
            info!(
                tracked = state.tracked.len(),
                pool = state.candidate_pool.len(),
                "Universe initialized"
            );
            let status = if state.tracked.is_empty() && state.candidate_pool.is_empty() {
                SnapshotStatus::WarmingUp
            } else {
                SnapshotStatus::Live
            };
            build_snapshot(&state, &self.config, status, now_ms)
        };
        self.publish(snapshot);
        Ok(())
    }

    /// Fast cycle: refetch only the tracked tokens and advance the
    /// weak-cycle state machine.
    pub async fn refresh_tracked(&self) -> UniverseResult<()> {
        let addresses: Vec<String> = self.state.read().tracked.keys().cloned().collect();
        if addresses.is_empty() {
            let now_ms = Utc::now().timestamp_millis();
            let snapshot = {
                let state = self.state.read();
                let status = if state.candidate_pool.is_empty() {
                    SnapshotStatus::WarmingUp
                } else {
                    SnapshotStatus::Live
                };
                build_snapshot(&state, &self.config, status, now_ms)
            };
            self.publish(snapshot);
            return Ok(());
        }

        let raw = self.source.pairs_by_addresses(&addresses).await?;
        let now_ms = Utc::now().timestamp_millis();
        let latest: HashMap<String, PairQuote> = canonical_pairs(raw)
            .into_iter()
            .filter_map(|pair| {
                let address = pair.base_address()?.to_owned();
                Some((address, pair))
            })
            .collect();

        let snapshot = {
            let mut state = self.state.write();
            self.advance_tracked(&mut state, &latest, now_ms);
            build_snapshot(&state, &self.config, SnapshotStatus::Live, now_ms)
        };
        self.publish(snapshot);
        Ok(())
    }

    /// Advance every tracked token one weak cycle and refresh its score
    /// fields in place, preserving bucket and rank until the next rebalance.
    fn advance_tracked(
        &self,
        state: &mut UniverseState,
        latest: &HashMap<String, PairQuote>,
        now_ms: i64,
    ) {
        let addresses: Vec<String> = state.tracked.keys().cloned().collect();
        for address in addresses {
            let Some(pair) = latest.get(&address) else {
                *state.weak_cycles.entry(address).or_insert(0) += 1;
                continue;
            };

            if passes_keep_filter(pair, &self.config) {
                state.weak_cycles.insert(address.clone(), 0);
            } else {
                *state.weak_cycles.entry(address.clone()).or_insert(0) += 1;
            }

            let weak = state.weak_cycles.get(&address).copied().unwrap_or(0);
            let hint = state.hints.get(&address).copied().unwrap_or_default();
            let prior = PriorTrackedState {
                is_tracked: true,
                weak_cycles: weak,
            };

            match score_pair(pair, hint, prior, &self.config, now_ms) {
                Some(update) => {
                    if let Some(coin) = state.tracked.get_mut(&address) {
                        coin.candidate = update;
                    }
                }
                None => {
                    // No valid update: keep the stale fields until the
                    // counter runs out, then drop immediately.
                    if weak >= self.config.weak_cycles_before_drop {
                        state.tracked.remove(&address);
                        state.weak_cycles.remove(&address);
                        debug!(token = %address, weak, "Evicted tracked token without a valid update");
                    }
                }
            }
        }
    }

    /// Discovery cycle: sweep all sources, update sticky hints, rebuild the
    /// candidate pool wholesale.
    pub async fn refresh_candidate_pool(&self) -> UniverseResult<()> {
        let tracked_addresses: Vec<String> =
            self.state.read().tracked.keys().cloned().collect();

        // Every source is fetched concurrently and fails alone: a dead feed
        // contributes nothing but never aborts the sweep.
        let searches = async {
            let results = join_all(
                self.config
                    .search_terms
                    .iter()
                    .map(|term| self.source.search_pairs(term)),
            )
            .await;
            let mut pairs = Vec::new();
            for (term, result) in self.config.search_terms.iter().zip(results) {
                match result {
                    Ok(found) => pairs.extend(found),
                    Err(error) => warn!(term = %term, %error, "Pair search failed"),
                }
            }
            pairs
        };

        let (profiles, boosts, top_boosts, takeovers, searched, tracked_pairs) = tokio::join!(
            self.source.latest_token_profiles(),
            self.source.latest_boosts(),
            self.source.top_boosts(),
            self.source.community_takeovers(),
            searches,
            self.source.pairs_by_addresses(&tracked_addresses),
        );

        let profiles = feed_or_empty("token-profiles", profiles);
        let boosts = feed_or_empty("latest-boosts", boosts);
        let top_boosts = feed_or_empty("top-boosts", top_boosts);
        let takeovers = feed_or_empty("community-takeovers", takeovers);

        let mut raw_pairs = searched;
        match tracked_pairs {
            Ok(pairs) => raw_pairs.extend(pairs),
            Err(error) => warn!(%error, "Tracked pair fetch failed during discovery"),
        }

        {
            let mut state = self.state.write();
            for item in &profiles {
                state.hints.entry(item.token_address.clone()).or_default().has_profile = true;
            }
            for item in &boosts {
                state.hints.entry(item.token_address.clone()).or_default().has_boost = true;
            }
            for item in &top_boosts {
                state.hints.entry(item.token_address.clone()).or_default().has_top_boost = true;
            }
            for item in &takeovers {
                state
                    .hints
                    .entry(item.token_address.clone())
                    .or_default()
                    .has_community_takeover = true;
            }
        }

        // Hydrate discovery tokens the pair fetches above did not cover.
        let pending = {
            let covered: HashSet<&str> =
                raw_pairs.iter().filter_map(|p| p.base_address()).collect();
            let mut seen: HashSet<&str> = HashSet::new();
            let mut pending: Vec<String> = Vec::new();
            for item in profiles
                .iter()
                .chain(&boosts)
                .chain(&top_boosts)
                .chain(&takeovers)
            {
                let address = item.token_address.as_str();
                if address.is_empty() || covered.contains(address) {
                    continue;
                }
                if seen.insert(address) {
                    pending.push(address.to_owned());
                }
            }
            pending
        };

        for round in pending.chunks(HYDRATION_ROUND_LIMIT) {
            match self.source.pairs_by_addresses(round).await {
                Ok(pairs) => raw_pairs.extend(pairs),
                Err(error) => warn!(%error, "Failed to hydrate discovery token list"),
            }
        }

        let now_ms = Utc::now().timestamp_millis();
        let canonical = canonical_pairs(raw_pairs);

        let snapshot = {
            let mut state = self.state.write();
            let mut candidates: Vec<Candidate> = canonical
                .iter()
                .filter_map(|pair| {
                    let address = pair.base_address()?;
                    let hint = state.hints.get(address).copied().unwrap_or_default();
                    let prior = PriorTrackedState {
                        is_tracked: state.tracked.contains_key(address),
                        weak_cycles: state.weak_cycles.get(address).copied().unwrap_or(0),
                    };
                    score_pair(pair, hint, prior, &self.config, now_ms)
                })
                .collect();
            candidates.sort_by(by_score_desc);
            candidates.truncate(self.config.candidate_pool_size);

            info!(pool = candidates.len(), "Candidate pool refreshed");
            state.candidate_pool = candidates;

            let status = if state.tracked.is_empty() {
                SnapshotStatus::WarmingUp
            } else {
                SnapshotStatus::Live
            };
            build_snapshot(&state, &self.config, status, now_ms)
        };
        self.publish(snapshot);
        Ok(())
    }

    /// Reconcile the candidate pool against the tracked set.
    ///
    /// Without `force`, runs only when the configured rebalance interval
    /// has elapsed; returns whether anything was published.
    pub fn rebalance(&self, force: bool) -> bool {
        let now_ms = Utc::now().timestamp_millis();
        let snapshot = {
            let mut state = self.state.write();
            if !force
                && now_ms - state.last_rebalanced_at_ms < self.config.rebalance_ms as i64
            {
                return false;
            }

            let state = &mut *state;
            if state.candidate_pool.is_empty() && state.tracked.is_empty() {
                build_snapshot(state, &self.config, SnapshotStatus::WarmingUp, now_ms)
            } else {
                let selected = select_universe(
                    &state.candidate_pool,
                    &state.tracked,
                    &state.weak_cycles,
                    &self.config,
                    now_ms,
                );
                let next: HashMap<String, TrackedCoin> = selected
                    .into_iter()
                    .map(|coin| (coin.token_address().to_owned(), coin))
                    .collect();
                settle_weak_cycles(
                    &state.tracked,
                    &next,
                    &mut state.weak_cycles,
                    self.config.weak_cycles_before_drop,
                );

                info!(tracked = next.len(), "Universe rebalanced");
                state.tracked = next;
                state.last_rebalanced_at_ms = now_ms;
                build_snapshot(state, &self.config, SnapshotStatus::Live, now_ms)
            }
        };
        self.publish(snapshot);
        true
    }
}

fn feed_or_empty(
    feed: &str,
    result: GatewayResult<Vec<DiscoveryItem>>,
) -> Vec<DiscoveryItem> {
    match result {
        Ok(items) => items,
        Err(error) => {
            warn!(feed, %error, "Discovery feed failed");
            Vec::new()
        }
    }
}

fn build_snapshot(
    state: &UniverseState,
    config: &UniverseConfig,
    status: SnapshotStatus,
    now_ms: i64,
) -> UniverseSnapshot {
    let mut items: Vec<TrackedCoin> = state.tracked.values().cloned().collect();
    items.sort_by(|a, b| by_score_desc(&a.candidate, &b.candidate));

    UniverseSnapshot {
        updated_at: now_ms,
        generated_at: rfc3339_ms(now_ms),
        status,
        config: SnapshotConfig {
            chain_id: config.chain_id.clone(),
            target_universe: config.target_universe,
            trending_slots: config.trending_slots,
            fresh_slots: config.fresh_slots,
            persistence_slots: config.persistence_slots(),
            fast_refresh_ms: config.fast_refresh_ms,
            candidate_refresh_ms: config.candidate_refresh_ms,
            rebalance_ms: config.rebalance_ms,
            min_liquidity_usd: config.min_liquidity_usd,
            min_volume_h24_usd: config.min_volume_h24_usd,
        },
        counts: SnapshotCounts {
            tracked: items.len(),
            candidate_pool: state.candidate_pool.len(),
        },
        items,
    }
}

fn rfc3339_ms(now_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(now_ms)
        .map(|dt| dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
        .unwrap_or_default()
}
