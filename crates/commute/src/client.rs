use std::sync::Arc;

use aptscout_core::config::MapsConfig;
use aptscout_core::{CommuteRequest, TravelMode};
use tracing::{debug, warn};

use crate::backend::CommuteBackend;
use crate::mcp::{MapsServerSettings, McpDistanceMatrix};
use crate::outcome::CommuteOutcome;

/// Front door for commute lookups. Never returns an error: failures come back
/// as [`CommuteOutcome::Failed`].
#[derive(Clone)]
pub struct CommuteClient {
    backend: Arc<dyn CommuteBackend>,
}

impl CommuteClient {
    pub fn new(backend: Arc<dyn CommuteBackend>) -> Self {
        Self { backend }
    }

    pub fn from_config(config: &MapsConfig) -> Self {
        Self::new(Arc::new(McpDistanceMatrix::new(MapsServerSettings::from(config))))
    }

    pub async fn check_commutes(
        &self,
        origins: Vec<String>,
        destination: &str,
        mode: TravelMode,
    ) -> CommuteOutcome {
        match CommuteRequest::new(origins, destination, mode) {
            Ok(request) => self.check(&request).await,
            Err(error) => {
                debug!(%error, "rejected commute request");
                CommuteOutcome::Failed(error.into())
            }
        }
    }

    pub async fn check(&self, request: &CommuteRequest) -> CommuteOutcome {
        match self.backend.distance_matrix(request).await {
            Ok(raw) => {
                let outcome = CommuteOutcome::from_raw(raw);
                debug!(
                    event_name = "commute.lookup.completed",
                    backend = self.backend.name(),
                    origins = request.origins().len(),
                    kind = outcome.kind(),
                    "commute lookup completed"
                );
                outcome
            }
            Err(error) => {
                warn!(
                    event_name = "commute.session.failed",
                    backend = self.backend.name(),
                    error_class = error.error_class(),
                    %error,
                    "commute lookup failed"
                );
                CommuteOutcome::Failed(error)
            }
        }
    }
}

impl std::fmt::Debug for CommuteClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommuteClient").field("backend", &self.backend.name()).finish()
    }
}
