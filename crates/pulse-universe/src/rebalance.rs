//! Bucketed universe selection.
//!
//! Turns a scored candidate pool into the next tracked set in four ordered
//! passes, each skipping tokens already selected:
//!
//! 1. persistence - already-tracked, healthy tokens get first claim, so the
//!    set does not thrash cycle to cycle;
//! 2. fresh - newly launched tokens get a guaranteed path in regardless of
//!    raw score;
//! 3. trending - the remainder fills by pure score;
//! 4. backfill - one more score-ordered fill to use slots an earlier pass
//!    left idle.
//!
//! Ordering is total everywhere: descending live score with ascending token
//! address on ties, so repeated selection over unchanged inputs yields an
//! identical ranked list.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use pulse_core::{Bucket, Candidate, TrackedCoin};

use crate::config::UniverseConfig;

/// Descending live score; ties resolve by ascending token address.
pub fn by_score_desc(a: &Candidate, b: &Candidate) -> Ordering {
    b.live_score
        .total_cmp(&a.live_score)
        .then_with(|| a.token_address.cmp(&b.token_address))
}

fn fill<'a>(
    selected: &mut Vec<TrackedCoin>,
    seen: &mut HashSet<&'a str>,
    candidates: &[&'a Candidate],
    limit: usize,
    bucket: Bucket,
) {
    for candidate in candidates {
        if selected.len() >= limit {
            return;
        }
        if !seen.insert(candidate.token_address.as_str()) {
            continue;
        }
        selected.push(TrackedCoin {
            candidate: (*candidate).clone(),
            bucket,
            rank: 0,
        });
    }
}

/// Select the next tracked universe from the candidate pool.
///
/// The result is re-sorted by descending live score and carries dense ranks
/// `1..=N`; its size never exceeds `config.target_universe`.
pub fn select_universe(
    pool: &[Candidate],
    tracked: &HashMap<String, TrackedCoin>,
    weak_cycles: &HashMap<String, u32>,
    config: &UniverseConfig,
    now_ms: i64,
) -> Vec<TrackedCoin> {
    let mut selected: Vec<TrackedCoin> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    let mut by_score: Vec<&Candidate> = pool.iter().collect();
    by_score.sort_by(|a, b| by_score_desc(a, b));

    let persistence: Vec<&Candidate> = by_score
        .iter()
        .copied()
        .filter(|c| tracked.contains_key(&c.token_address))
        .filter(|c| {
            weak_cycles.get(&c.token_address).copied().unwrap_or(0)
                < config.weak_cycles_before_drop
        })
        .collect();
    fill(
        &mut selected,
        &mut seen,
        &persistence,
        config.persistence_slots(),
        Bucket::Persistence,
    );

    let max_fresh_minutes = config.max_fresh_age_hours * 60.0;
    let mut fresh: Vec<&Candidate> = pool
        .iter()
        .filter(|c| (c.age_minutes as f64) <= max_fresh_minutes)
        .collect();
    fresh.sort_by(|a, b| {
        let a_key = a.score_breakdown.freshness + a.live_score;
        let b_key = b.score_breakdown.freshness + b.live_score;
        b_key
            .total_cmp(&a_key)
            .then_with(|| a.token_address.cmp(&b.token_address))
    });
    let fresh_limit = selected.len() + config.fresh_slots;
    fill(&mut selected, &mut seen, &fresh, fresh_limit, Bucket::Fresh);

    let trending_limit = config
        .target_universe
        .min(selected.len() + config.trending_slots);
    fill(&mut selected, &mut seen, &by_score, trending_limit, Bucket::Trending);

    // Backfill slots an under-filled quota left idle.
    fill(
        &mut selected,
        &mut seen,
        &by_score,
        config.target_universe,
        Bucket::Trending,
    );

    selected.sort_by(|a, b| by_score_desc(&a.candidate, &b.candidate));
    for (i, coin) in selected.iter_mut().enumerate() {
        coin.rank = (i + 1) as u32;
        coin.candidate.updated_at = now_ms;
    }

    selected
}

/// Weak-cycle bookkeeping after a selection round.
///
/// Retained tokens reset to zero - selection this round means fully
/// healthy. Dropped tokens advance by one; a counter that reaches the
/// threshold is cleared rather than left at the evicted value.
pub fn settle_weak_cycles(
    previous: &HashMap<String, TrackedCoin>,
    next: &HashMap<String, TrackedCoin>,
    weak_cycles: &mut HashMap<String, u32>,
    threshold: u32,
) {
    for address in previous.keys() {
        if next.contains_key(address) {
            weak_cycles.insert(address.clone(), 0);
        } else {
            let advanced = weak_cycles.get(address).copied().unwrap_or(0) + 1;
            if advanced >= threshold {
                weak_cycles.remove(address);
            } else {
                weak_cycles.insert(address.clone(), advanced);
            }
        }
    }
}
