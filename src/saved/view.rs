use crate::error::Result;
use crate::filters::{sort_properties, QueryEngine, SortKey};
use crate::models::Property;
use crate::saved::manager::SavedSetManager;
use tracing::debug;

/// Saved ids resolved against the catalog
pub struct SavedView;

impl SavedView {
    /// Saved listings sorted by `sort`. Ids no longer in the catalog are skipped.
    pub async fn load(
        engine: &QueryEngine,
        saved: &SavedSetManager,
        sort: SortKey,
    ) -> Result<Vec<Property>> {
        let ids = saved.list();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut properties: Vec<Property> = engine
            .list_all()
            .await?
            .into_iter()
            .filter(|p| ids.contains(&p.id))
            .collect();

        if properties.len() < ids.len() {
            debug!(
                "{} saved ids are not in the catalog",
                ids.len() - properties.len()
            );
        }

        sort_properties(&mut properties, sort);
        Ok(properties)
    }
}
