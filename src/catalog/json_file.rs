use crate::catalog::traits::CatalogSource;
use crate::error::{FinderError, Result};
use crate::models::{Property, PropertyId};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Catalog read from a JSON array file on every call
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CatalogSource for JsonFileCatalog {
    async fn list_all(&self) -> Result<Vec<Property>> {
        debug!("Reading catalog from {}", self.path.display());

        let json = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| FinderError::SourceUnavailable {
                source_name: self.source_name(),
                reason: format!("{}: {}", self.path.display(), e),
            })?;
        let properties: Vec<Property> = serde_json::from_str(&json)?;

        debug!("Loaded {} properties", properties.len());
        Ok(properties)
    }

    async fn find_by_id(&self, id: PropertyId) -> Result<Property> {
        self.list_all()
            .await?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or(FinderError::NotFound { id })
    }

    fn source_name(&self) -> &'static str {
        "json-file"
    }
}
