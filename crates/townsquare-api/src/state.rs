//! Shared application state.

use std::sync::Arc;

use townsquare_areas::domain::geometry::TownMap;
use townsquare_towns::registry::TownRegistry;

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Every live town.
    pub registry: Arc<TownRegistry>,
    /// Map new towns are built from.
    pub town_map: Arc<TownMap>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(registry: Arc<TownRegistry>, town_map: Arc<TownMap>) -> Self {
        Self { registry, town_map }
    }
}
