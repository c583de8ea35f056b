use std::sync::Arc;

use crate::config::SelectorConfig;
use crate::external::optimizer_provider::OptimizationProvider;
use crate::models::asset::AssetCatalog;
use crate::services::selector_service::PortfolioSelector;
use crate::services::session_store::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub selector: PortfolioSelector,
    pub catalog: Arc<AssetCatalog>,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: &SelectorConfig, provider: Arc<dyn OptimizationProvider>) -> Self {
        Self {
            selector: PortfolioSelector::new(provider, config.min_selection),
            catalog: Arc::new(AssetCatalog::for_kind(config.catalog)),
            sessions: SessionStore::new(config.session_ttl_minutes),
        }
    }
}
