//! Cooperative cancellation for one calculation instance.

use connectors::sql::base::adapter::SqlAdapter;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// A shared flag the chunk loop checks between rows and at chunk
/// boundaries, plus a best-effort transport-level statement cancel.
/// Once fired the flag is terminal for this instance.
#[derive(Clone, Default)]
pub struct CheckCancellation {
    token: CancellationToken,
}

impl CheckCancellation {
    pub fn new() -> Self {
        Self::default()
    }

    /// The token to thread into [`crate::param::CalculationParameter`].
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Fires the flag and asks the adapter to cancel its in-flight
    /// statement. The transport cancel is advisory: a driver that cannot
    /// cancel only costs us a logged warning, the cooperative checks still
    /// end the run at the next row.
    pub async fn cancel(&self, adapter: &dyn SqlAdapter) {
        if self.token.is_cancelled() {
            return;
        }
        self.token.cancel();
        info!("Cancellation requested for consistency calculation.");
        if let Err(error) = adapter.cancel_in_flight().await {
            warn!(%error, "Transport-level statement cancel failed; relying on cooperative checks.");
        }
    }
}
