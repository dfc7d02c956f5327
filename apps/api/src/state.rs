use std::sync::Arc;

use crate::config::TrustFeatures;
use crate::sea_time::SeaTimeCalculator;
use crate::store::TrustStore;
use crate::trust::TrustEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TrustStore>,
    pub sea_time: Arc<SeaTimeCalculator>,
    pub engine: Arc<TrustEngine>,
    /// Feature toggles read once at startup and passed into every computation.
    pub features: TrustFeatures,
}
