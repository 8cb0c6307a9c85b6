//! pulse-core - Core domain types for the live token universe.
//!
//! Holds the strongly-typed provider records (pair quotes, discovery feed
//! rows) and the derived universe types (candidates, tracked coins, the
//! published snapshot). All numeric fields coming from the provider pass
//! through one safe-conversion layer in [`pair`]; nothing downstream
//! null-coalesces on its own.

pub mod pair;
pub mod universe;

pub use pair::{Boosts, DiscoveryItem, Liquidity, PairInfo, PairQuote, TokenRef, TxnCounts};
pub use universe::{
    Bucket, Candidate, DiscoveryHint, ScoreBreakdown, SnapshotConfig, SnapshotCounts,
    SnapshotStatus, TrackedCoin, UniverseSnapshot,
};
