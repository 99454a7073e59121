//! Service wiring and the browse-page session.

use crate::catalog::CatalogSource;
use crate::error::Result;
use crate::events::UiEvent;
use crate::filters::{results_heading, FilterSpec, QueryEngine, SortKey};
use crate::models::{Property, PropertyId};
use crate::saved::{PersistenceAdapter, SavedSetManager, SavedView, StorageBus};
use std::sync::Arc;
use tracing::{debug, info};

/// Process-wide services, built once and passed to every surface
#[derive(Clone)]
pub struct Services {
    pub engine: QueryEngine,
    pub saved: Arc<SavedSetManager>,
}

impl Services {
    pub fn new(source: Arc<dyn CatalogSource>, store: Arc<dyn PersistenceAdapter>) -> Self {
        Self {
            engine: QueryEngine::new(source),
            saved: SavedSetManager::new(store),
        }
    }

    /// Services whose saved-set also hears other contexts on `bus`
    pub fn with_bus(
        source: Arc<dyn CatalogSource>,
        store: Arc<dyn PersistenceAdapter>,
        bus: &StorageBus,
    ) -> Self {
        Self {
            engine: QueryEngine::new(source),
            saved: SavedSetManager::with_bus(store, bus),
        }
    }

    pub async fn saved_properties(&self, sort: SortKey) -> Result<Vec<Property>> {
        SavedView::load(&self.engine, &self.saved, sort).await
    }
}

/// Filter state and last results of one browse surface
pub struct BrowseSession {
    services: Services,
    filters: FilterSpec,
    results: Vec<Property>,
}

impl BrowseSession {
    pub fn new(services: Services) -> Self {
        Self::with_filters(services, FilterSpec::default())
    }

    pub fn with_filters(services: Services, filters: FilterSpec) -> Self {
        Self {
            services,
            filters,
            results: Vec::new(),
        }
    }

    pub fn filters(&self) -> &FilterSpec {
        &self.filters
    }

    pub fn results(&self) -> &[Property] {
        &self.results
    }

    /// Re-run the search for the current filters
    pub async fn refresh(&mut self) -> Result<&[Property]> {
        self.results = self.services.engine.search(&self.filters).await?;
        debug!("Browse session has {} results", self.results.len());
        Ok(&self.results)
    }

    pub fn set_filters(&mut self, filters: FilterSpec) {
        self.filters = filters;
    }

    pub fn set_sort(&mut self, sort_by: SortKey) {
        self.filters.sort_by = sort_by;
    }

    /// Back to no constraints, newest first
    pub fn reset_filters(&mut self) {
        self.filters = FilterSpec::default();
        info!("Filters cleared");
    }

    /// Apply an event from another surface. Returns true when results are stale.
    pub fn handle_event(&mut self, event: &UiEvent) -> bool {
        match event {
            UiEvent::SearchTermChanged(term) => {
                debug!("Search term changed to {:?}", term);
                self.filters.location = Some(term.clone());
                true
            }
            // Saved state is read live through `is_saved`.
            UiEvent::SavedPropertiesChanged => false,
        }
    }

    pub fn heading(&self) -> String {
        results_heading(self.results.len(), self.filters.has_constraints())
    }

    pub fn is_saved(&self, id: PropertyId) -> bool {
        self.services.saved.contains(id)
    }

    pub fn toggle_saved(&self, id: PropertyId) -> Result<bool> {
        self.services.saved.toggle(id)
    }
}
