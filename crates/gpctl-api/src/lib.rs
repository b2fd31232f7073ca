//! GridPane REST API access for gpctl
//!
//! The [`ApiTransport`] trait is the seam between commands and the network.
//! [`HttpTransport`] talks to the real API over reqwest, [`QuotaGuarded`]
//! charges the local hourly budget before every request, and
//! [`GridPaneClient`] turns raw responses into typed results.

mod client;
mod guarded;
mod model;
mod transport;

pub use client::{GridPaneClient, check_wp_arguments, map_status};
pub use guarded::QuotaGuarded;
pub use model::{ResourceKind, ResourceSummary, normalize_listing};
pub use transport::{ApiRequest, ApiResponse, ApiTransport, HttpTransport, Method};
