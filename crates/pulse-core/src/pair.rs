//! Provider pair quotes and discovery feed rows.
//!
//! The provider returns loosely-typed JSON where almost every field may be
//! missing. Each record is modeled with explicit optionals, and every numeric
//! read goes through the `or_zero` conversion below so a missing or
//! non-finite value uniformly reads as zero.

use serde::Deserialize;

/// Missing or non-finite numbers read as zero.
fn or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Token identity attached to a pair (base or quote side).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRef {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
}

/// Buy/sell transaction counts for one window.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TxnCounts {
    #[serde(default)]
    pub buys: Option<u64>,
    #[serde(default)]
    pub sells: Option<u64>,
}

impl TxnCounts {
    /// Total transactions in the window.
    pub fn total(&self) -> u64 {
        self.buys.unwrap_or(0) + self.sells.unwrap_or(0)
    }
}

/// Transaction counts keyed by window.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TxnWindows {
    #[serde(default)]
    pub m5: Option<TxnCounts>,
    #[serde(default)]
    pub h1: Option<TxnCounts>,
    #[serde(default)]
    pub h24: Option<TxnCounts>,
}

/// A numeric value per window (volume in USD, price change in percent).
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Windows {
    #[serde(default)]
    pub m5: Option<f64>,
    #[serde(default)]
    pub h1: Option<f64>,
    #[serde(default)]
    pub h24: Option<f64>,
}

/// Pool liquidity.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Liquidity {
    #[serde(default)]
    pub usd: Option<f64>,
    #[serde(default)]
    pub base: Option<f64>,
    #[serde(default)]
    pub quote: Option<f64>,
}

/// Optional pair presentation metadata.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairInfo {
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Paid promotion state for a pair.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Boosts {
    #[serde(default)]
    pub active: Option<u64>,
}

/// One trading-pool quote as returned by the provider.
///
/// A token commonly has many pools; the canonicalizer reduces them to one
/// quote per base-token address before anything is scored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairQuote {
    #[serde(default)]
    pub chain_id: String,
    #[serde(default)]
    pub dex_id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub pair_address: String,
    #[serde(default)]
    pub base_token: Option<TokenRef>,
    #[serde(default)]
    pub quote_token: Option<TokenRef>,
    /// Quoted as a decimal string on the wire.
    #[serde(default)]
    pub price_usd: Option<String>,
    #[serde(default)]
    pub txns: TxnWindows,
    #[serde(default)]
    pub volume: Windows,
    #[serde(default)]
    pub price_change: Windows,
    #[serde(default)]
    pub liquidity: Option<Liquidity>,
    #[serde(default)]
    pub fdv: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    /// Pool creation time, epoch milliseconds.
    #[serde(default)]
    pub pair_created_at: Option<i64>,
    #[serde(default)]
    pub info: Option<PairInfo>,
    #[serde(default)]
    pub boosts: Option<Boosts>,
}

impl PairQuote {
    /// Base-token address, if present and non-empty.
    pub fn base_address(&self) -> Option<&str> {
        self.base_token
            .as_ref()
            .map(|t| t.address.as_str())
            .filter(|a| !a.is_empty())
    }

    pub fn liquidity_usd(&self) -> f64 {
        or_zero(self.liquidity.as_ref().and_then(|l| l.usd))
    }

    pub fn volume_m5(&self) -> f64 {
        or_zero(self.volume.m5)
    }

    pub fn volume_h1(&self) -> f64 {
        or_zero(self.volume.h1)
    }

    pub fn volume_h24(&self) -> f64 {
        or_zero(self.volume.h24)
    }

    pub fn price_change_m5(&self) -> f64 {
        or_zero(self.price_change.m5)
    }

    pub fn price_change_h1(&self) -> f64 {
        or_zero(self.price_change.h1)
    }

    pub fn price_change_h24(&self) -> f64 {
        or_zero(self.price_change.h24)
    }

    pub fn txns_m5(&self) -> u64 {
        self.txns.m5.map(|t| t.total()).unwrap_or(0)
    }

    pub fn txns_h1(&self) -> u64 {
        self.txns.h1.map(|t| t.total()).unwrap_or(0)
    }

    pub fn boosts_active(&self) -> u64 {
        self.boosts.and_then(|b| b.active).unwrap_or(0)
    }

    /// Price in USD, parsed from the wire string.
    pub fn price_usd_value(&self) -> f64 {
        or_zero(self.price_usd.as_deref().and_then(|p| p.parse().ok()))
    }

    /// Market cap, falling back to fully-diluted valuation.
    pub fn market_cap_or_fdv(&self) -> f64 {
        let cap = or_zero(self.market_cap);
        if cap > 0.0 {
            cap
        } else {
            or_zero(self.fdv)
        }
    }

    /// Creation timestamp; a pair without one reads as created just now.
    pub fn created_at_ms(&self, now_ms: i64) -> i64 {
        self.pair_created_at.unwrap_or(now_ms)
    }

    /// Pool age in minutes relative to `now_ms`, floored at zero.
    pub fn age_minutes(&self, now_ms: i64) -> f64 {
        let age = (now_ms - self.created_at_ms(now_ms)) as f64 / 60_000.0;
        age.max(0.0)
    }
}

/// One row from a discovery feed (profiles, boosts, takeovers).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryItem {
    #[serde(default)]
    pub chain_id: String,
    #[serde(default)]
    pub token_address: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "chainId": "solana",
        "dexId": "raydium",
        "url": "https://dexscreener.com/solana/abc",
        "pairAddress": "PairAbc",
        "baseToken": {"address": "TokenAbc", "name": "Abc Coin", "symbol": "ABC"},
        "quoteToken": {"address": "So111", "name": "Wrapped SOL", "symbol": "SOL"},
        "priceUsd": "0.0421",
        "txns": {"m5": {"buys": 12, "sells": 8}, "h1": {"buys": 90, "sells": 70}},
        "volume": {"m5": 6000, "h1": 41000, "h24": 150000},
        "priceChange": {"m5": 2.5, "h1": -1.2, "h24": 10.0},
        "liquidity": {"usd": 30000, "base": 1000, "quote": 150},
        "fdv": 420000,
        "marketCap": 400000,
        "pairCreatedAt": 1700000000000,
        "info": {"imageUrl": "https://img.example/abc.png"},
        "boosts": {"active": 2}
    }"#;

    #[test]
    fn test_decode_full_pair() {
        let pair: PairQuote = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(pair.chain_id, "solana");
        assert_eq!(pair.base_address(), Some("TokenAbc"));
        assert_eq!(pair.liquidity_usd(), 30_000.0);
        assert_eq!(pair.volume_h24(), 150_000.0);
        assert_eq!(pair.txns_m5(), 20);
        assert_eq!(pair.txns_h1(), 160);
        assert_eq!(pair.boosts_active(), 2);
        assert_eq!(pair.price_usd_value(), 0.0421);
        assert_eq!(pair.market_cap_or_fdv(), 400_000.0);
    }

    #[test]
    fn test_decode_sparse_pair() {
        let pair: PairQuote = serde_json::from_str(r#"{"chainId": "solana"}"#).unwrap();
        assert_eq!(pair.base_address(), None);
        assert_eq!(pair.liquidity_usd(), 0.0);
        assert_eq!(pair.volume_m5(), 0.0);
        assert_eq!(pair.txns_h1(), 0);
        assert_eq!(pair.price_usd_value(), 0.0);
        // A pair without a creation time reads as created just now.
        assert_eq!(pair.age_minutes(1_700_000_000_000), 0.0);
    }

    #[test]
    fn test_empty_base_address_is_none() {
        let pair: PairQuote =
            serde_json::from_str(r#"{"baseToken": {"address": ""}}"#).unwrap();
        assert_eq!(pair.base_address(), None);
    }

    #[test]
    fn test_fdv_fallback() {
        let pair: PairQuote = serde_json::from_str(r#"{"fdv": 5000}"#).unwrap();
        assert_eq!(pair.market_cap_or_fdv(), 5_000.0);
    }

    #[test]
    fn test_age_is_floored_at_zero() {
        let pair: PairQuote =
            serde_json::from_str(r#"{"pairCreatedAt": 2000000000000}"#).unwrap();
        assert_eq!(pair.age_minutes(1_700_000_000_000), 0.0);
        assert_eq!(pair.age_minutes(2_000_000_600_000), 10.0);
    }

    #[test]
    fn test_unparseable_price_reads_as_zero() {
        let pair: PairQuote = serde_json::from_str(r#"{"priceUsd": "n/a"}"#).unwrap();
        assert_eq!(pair.price_usd_value(), 0.0);
    }

    #[test]
    fn test_discovery_item_decode() {
        let item: DiscoveryItem = serde_json::from_str(
            r#"{"chainId": "solana", "tokenAddress": "TokenAbc", "extra": true}"#,
        )
        .unwrap();
        assert_eq!(item.chain_id, "solana");
        assert_eq!(item.token_address, "TokenAbc");
    }
}
