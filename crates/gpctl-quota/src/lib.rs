//! Client-side hourly request quota
//!
//! Every outbound API call is charged against a per-account counter that lives
//! on disk, survives across invocations and resets when the wall-clock hour
//! rolls over. The read-check-increment-write runs under a cross-process lock,
//! so concurrent `gpctl` processes cannot overspend the budget.

mod state;
mod store;
mod tracker;

pub use state::{QuotaDecision, QuotaState};
pub use store::{FileQuotaStore, MemoryQuotaStore, QuotaStore};
pub use tracker::QuotaTracker;
