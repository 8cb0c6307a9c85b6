//! Entry and keep threshold filters.
//!
//! Entering the universe is deliberately harder than staying in it: the
//! keep filter runs the same liquidity/volume checks at 0.6x and 0.4x of
//! the entry thresholds, and skips the age and short-window checks.

use pulse_core::PairQuote;

use crate::config::UniverseConfig;

/// Keep-filter floor on liquidity, relative to the entry threshold.
const KEEP_LIQUIDITY_FACTOR: f64 = 0.6;
/// Keep-filter floor on 24h volume, relative to the entry threshold.
const KEEP_VOLUME_H24_FACTOR: f64 = 0.4;

/// Gate for becoming a new candidate.
pub fn passes_entry_filter(pair: &PairQuote, config: &UniverseConfig, now_ms: i64) -> bool {
    pair.liquidity_usd() >= config.min_liquidity_usd
        && pair.volume_h24() >= config.min_volume_h24_usd
        && (pair.volume_h1() >= config.min_volume_h1_usd
            || pair.volume_m5() >= config.min_volume_m5_usd)
        && pair.age_minutes(now_ms) >= config.min_age_minutes
}

/// Gate for resetting a tracked token's weak-cycle counter.
pub fn passes_keep_filter(pair: &PairQuote, config: &UniverseConfig) -> bool {
    pair.liquidity_usd() >= config.min_liquidity_usd * KEEP_LIQUIDITY_FACTOR
        && pair.volume_h24() >= config.min_volume_h24_usd * KEEP_VOLUME_H24_FACTOR
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW_MS: i64 = 1_700_000_000_000;

    fn pair(liquidity: f64, vol24: f64, vol1: f64, vol5: f64, age_minutes: i64) -> PairQuote {
        serde_json::from_value(serde_json::json!({
            "chainId": "solana",
            "pairAddress": "pool",
            "baseToken": {"address": "A", "name": "A", "symbol": "A"},
            "liquidity": {"usd": liquidity},
            "volume": {"m5": vol5, "h1": vol1, "h24": vol24},
            "pairCreatedAt": NOW_MS - age_minutes * 60_000,
        }))
        .unwrap()
    }

    #[test]
    fn test_entry_filter_admits_on_m5_volume_alone() {
        let config = UniverseConfig::default();
        // 1h volume is zero but 5m volume clears its floor.
        let quote = pair(30_000.0, 150_000.0, 0.0, 6_000.0, 10);
        assert!(passes_entry_filter(&quote, &config, NOW_MS));
    }

    #[test]
    fn test_entry_filter_rejects_low_liquidity() {
        let config = UniverseConfig::default();
        let quote = pair(20_000.0, 150_000.0, 0.0, 6_000.0, 10);
        assert!(!passes_entry_filter(&quote, &config, NOW_MS));
    }

    #[test]
    fn test_entry_filter_rejects_too_young() {
        let config = UniverseConfig::default();
        let quote = pair(30_000.0, 150_000.0, 30_000.0, 6_000.0, 3);
        assert!(!passes_entry_filter(&quote, &config, NOW_MS));
    }

    #[test]
    fn test_entry_filter_rejects_when_both_short_windows_low() {
        let config = UniverseConfig::default();
        let quote = pair(30_000.0, 150_000.0, 20_000.0, 4_000.0, 10);
        assert!(!passes_entry_filter(&quote, &config, NOW_MS));
    }

    #[test]
    fn test_keep_filter_is_looser_than_entry() {
        let config = UniverseConfig::default();
        // Fails entry (liquidity below 25k) but passes keep (above 15k/40k floors).
        let quote = pair(16_000.0, 45_000.0, 0.0, 0.0, 10);
        assert!(!passes_entry_filter(&quote, &config, NOW_MS));
        assert!(passes_keep_filter(&quote, &config));
    }

    #[test]
    fn test_keep_filter_fails_below_volume_floor() {
        let config = UniverseConfig::default();
        // Liquidity at 0.64x clears the 0.6x floor; volume at 0.36x misses 0.4x.
        let quote = pair(16_000.0, 36_000.0, 0.0, 0.0, 10);
        assert!(!passes_keep_filter(&quote, &config));
    }
}
