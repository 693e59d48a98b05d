//! Archived identity records

use std::collections::HashMap;

use avcontrol_model::{DiscoveredEntity, EntityFactory, UniqueServiceName, Url};
use serde::{Deserialize, Serialize};

/// Minimal data needed to rebuild an entity without rediscovery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivedRecord {
    pub usn: UniqueServiceName,
    pub description_url: Url,
    #[serde(default)]
    pub custom_metadata: HashMap<String, String>,
}

impl ArchivedRecord {
    pub fn from_entity(entity: &DiscoveredEntity, custom_metadata: HashMap<String, String>) -> Self {
        Self {
            usn: entity.usn().clone(),
            description_url: entity.description_url().clone(),
            custom_metadata,
        }
    }

    /// Rebuilds the entity through the same factory discovery uses
    pub fn to_entity(&self, factory: &EntityFactory) -> avcontrol_model::Result<DiscoveredEntity> {
        factory.restore_entity(
            self.usn.clone(),
            self.description_url.clone(),
            &self.custom_metadata,
        )
    }
}
