//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedStore;
use crate::planner::PlannerConfig;
use crate::store::InMemoryStore;

/// Shared application state.
///
/// Contains everything needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Route geometries with cached proximity lookups
    pub store: Arc<CachedStore<InMemoryStore>>,

    /// Journey planner configuration
    pub config: Arc<PlannerConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(store: CachedStore<InMemoryStore>, config: PlannerConfig) -> Self {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }
}
