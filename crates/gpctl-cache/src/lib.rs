//! Local caches of GridPane listings and the freshness gate in front of them
//!
//! Each cache is a JSON file whose age is derived from its modification time.
//! The gate decides whether a command may reuse it, should refresh it, or must
//! populate it first, asking the user when a human is present.

mod artifact;
mod cache_type;
mod gate;

pub use artifact::{CacheArtifact, Freshness};
pub use cache_type::CacheType;
pub use gate::{CacheAction, CacheOutcome, CachePopulator, FreshnessGate};
