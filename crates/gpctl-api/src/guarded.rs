use async_trait::async_trait;
use gpctl_quota::QuotaTracker;
use gpctl_utils::GpError;
use tracing::debug;

use crate::transport::{ApiRequest, ApiResponse, ApiTransport};

/// Charges the hourly quota before delegating each request.
///
/// The slot is consumed before the call and never refunded, so failed or
/// timed-out requests still count.
pub struct QuotaGuarded<T> {
    inner: T,
    tracker: QuotaTracker,
}

impl<T: ApiTransport> QuotaGuarded<T> {
    pub fn new(inner: T, tracker: QuotaTracker) -> Self {
        Self { inner, tracker }
    }

    pub fn tracker(&self) -> &QuotaTracker {
        &self.tracker
    }
}

#[async_trait]
impl<T: ApiTransport> ApiTransport for QuotaGuarded<T> {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, GpError> {
        let decision = self.tracker.require_headroom()?;
        debug!(
            account = %self.tracker.account(),
            endpoint = %request.path,
            remaining = decision.remaining,
            "Quota check passed"
        );

        let result = self.inner.send(request).await;
        if let Err(e) = &result {
            debug!(
                account = %self.tracker.account(),
                error = %e,
                "Request failed (quota slot still consumed)"
            );
        }
        result
    }
}
