//! The scoring engine.
//!
//! A pure function from a canonical pair quote, its sticky discovery hint,
//! and its prior tracked state to a scored candidate. The composite live
//! score is the sum of six terms; the stored breakdown is rounded to two
//! decimals for display while ranking always uses the raw sum.

use pulse_core::{Candidate, DiscoveryHint, PairQuote, ScoreBreakdown};

use crate::config::UniverseConfig;
use crate::filters::passes_entry_filter;

/// Awarded to tokens already in the universe that are not on the way out.
const HOLD_BONUS: f64 = 14.0;

/// What the universe already knows about a token when it is rescored.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriorTrackedState {
    /// Token is currently in the tracked set.
    pub is_tracked: bool,
    /// Current weak-cycle counter.
    pub weak_cycles: u32,
}

fn log_score(value: f64, weight: f64) -> f64 {
    (value.max(1.0) + 1.0).log10() * weight
}

fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Score one canonical pair.
///
/// Returns `None` when the pair is missing its token identity (address,
/// name, or symbol) or fails the entry filter; such records never become
/// candidates.
pub fn score_pair(
    pair: &PairQuote,
    hint: DiscoveryHint,
    prior: PriorTrackedState,
    config: &UniverseConfig,
    now_ms: i64,
) -> Option<Candidate> {
    let token = pair.base_token.as_ref()?;
    if token.address.is_empty() || token.name.is_empty() || token.symbol.is_empty() {
        return None;
    }

    if !passes_entry_filter(pair, config, now_ms) {
        return None;
    }

    let liquidity_usd = pair.liquidity_usd();
    let volume_m5 = pair.volume_m5();
    let volume_h1 = pair.volume_h1();
    let volume_h24 = pair.volume_h24();
    let txns_m5 = pair.txns_m5();
    let txns_h1 = pair.txns_h1();

    let age_minutes = pair.age_minutes(now_ms);
    let age_hours = age_minutes / 60.0;

    // Extrapolate the 5-minute window to an hourly rate and compare it to
    // the actual hourly figure; > 1.0 means activity is accelerating.
    let volume_acceleration = (volume_m5 * 12.0) / volume_h1.max(1.0);
    let trade_acceleration = (txns_m5 as f64 * 12.0) / (txns_h1 as f64).max(1.0);

    let liquidity_score = log_score(liquidity_usd, 7.0);
    let volume_score =
        log_score(volume_m5, 11.0) + log_score(volume_h1, 9.0) + log_score(volume_h24, 5.0);

    let momentum_score = clamp(pair.price_change_m5(), 0.0, f64::INFINITY) * 1.6
        + clamp(pair.price_change_h1(), 0.0, f64::INFINITY)
        + clamp(volume_acceleration - 1.0, 0.0, 3.0) * 10.0
        + clamp(trade_acceleration - 1.0, 0.0, 3.0) * 8.0;

    let freshness_score = if age_hours <= config.max_fresh_age_hours {
        clamp(24.0 - age_hours, 0.0, 24.0)
    } else {
        0.0
    };

    let boosts_active = pair.boosts_active();
    let discovery_score = if hint.has_profile { 6.0 } else { 0.0 }
        + if hint.has_community_takeover { 10.0 } else { 0.0 }
        + if hint.has_boost { 8.0 } else { 0.0 }
        + if hint.has_top_boost { 10.0 } else { 0.0 }
        + boosts_active as f64 * 4.0;

    let hold_bonus = if prior.is_tracked && prior.weak_cycles < config.weak_cycles_before_drop {
        HOLD_BONUS
    } else {
        0.0
    };

    let live_score = liquidity_score
        + volume_score
        + momentum_score
        + freshness_score
        + discovery_score
        + hold_bonus;

    Some(Candidate {
        token_address: token.address.clone(),
        pair_address: pair.pair_address.clone(),
        symbol: token.symbol.clone(),
        name: token.name.clone(),
        chain_id: pair.chain_id.clone(),
        dex_id: pair.dex_id.clone(),
        url: pair.url.clone(),
        image_url: pair.info.as_ref().and_then(|i| i.image_url.clone()),
        live_score,
        score_breakdown: ScoreBreakdown {
            liquidity: round2(liquidity_score),
            volume: round2(volume_score),
            momentum: round2(momentum_score),
            freshness: round2(freshness_score),
            discovery: round2(discovery_score),
            hold_bonus: round2(hold_bonus),
        },
        price_usd: pair.price_usd_value(),
        market_cap: pair.market_cap_or_fdv(),
        liquidity_usd,
        volume_m5_usd: volume_m5,
        volume_h1_usd: volume_h1,
        volume_h24_usd: volume_h24,
        txns_m5,
        txns_h1,
        price_change_m5: pair.price_change_m5(),
        price_change_h1: pair.price_change_h1(),
        price_change_h24: pair.price_change_h24(),
        boosts_active,
        has_profile: hint.has_profile,
        has_community_takeover: hint.has_community_takeover,
        age_minutes: age_minutes.round() as i64,
        pair_created_at: pair.created_at_ms(now_ms),
        updated_at: now_ms,
    })
}
