//! pulse-universe - The universe-management core.
//!
//! Owns the ranked, size-bounded set of tracked tokens. Raw pair quotes
//! flow in from the gateway, are reduced to one canonical pair per token,
//! scored, and reconciled against the tracked set by a quota-based
//! rebalance with weak-cycle hysteresis:
//!
//! - [`canonical`] picks one representative pool per token;
//! - [`filters`] gate entry into and survival inside the universe;
//! - [`score`] turns a canonical pair into a scored candidate;
//! - [`rebalance`] allocates persistence/fresh/trending quota buckets;
//! - [`manager`] owns the state and runs the three refresh cycles.
//!
//! All state mutation happens behind the manager; consumers only ever see
//! the immutable [`pulse_core::UniverseSnapshot`].

pub mod canonical;
pub mod config;
pub mod error;
pub mod filters;
pub mod manager;
pub mod rebalance;
pub mod score;

pub use canonical::canonical_pairs;
pub use config::UniverseConfig;
pub use error::{UniverseError, UniverseResult};
pub use filters::{passes_entry_filter, passes_keep_filter};
pub use manager::UniverseManager;
pub use score::{score_pair, PriorTrackedState};
