//! Canonical pair selection.
//!
//! A token commonly trades in several pools at once. Everything downstream
//! works on one quote per token: the pool with the greatest liquidity in
//! USD, with ties keeping the first-seen pair.

use std::collections::HashMap;

use pulse_core::PairQuote;

/// Reduce raw pair quotes to one canonical pair per base-token address.
///
/// Pairs without a base-token address are dropped silently. A later pair
/// replaces the held one only on strictly greater liquidity, so the result
/// is deterministic for a fixed input order. Output preserves first-seen
/// token order.
pub fn canonical_pairs(pairs: Vec<PairQuote>) -> Vec<PairQuote> {
    let mut chosen: Vec<PairQuote> = Vec::new();
    let mut index_by_token: HashMap<String, usize> = HashMap::new();

    for pair in pairs {
        let Some(address) = pair.base_address().map(str::to_owned) else {
            continue;
        };

        match index_by_token.get(&address) {
            Some(&i) => {
                if pair.liquidity_usd() > chosen[i].liquidity_usd() {
                    chosen[i] = pair;
                }
            }
            None => {
                index_by_token.insert(address, chosen.len());
                chosen.push(pair);
            }
        }
    }

    chosen
}
