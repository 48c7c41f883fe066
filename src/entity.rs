//! Host-facing entity surface.
//!
//! Buttons are exposed through the [`ButtonEntity`] trait and handed to an
//! [`AddEntities`] sink at setup time. [`EntityRegistry`] is the in-process
//! sink used by the Stream Deck plugin.

use std::{collections::HashSet, sync::Arc};

use log::{debug, info, warn};
use tokio::sync::RwLock;

use crate::error::{BedError, RegistryError};

/// A pressable button as seen by the host.
#[async_trait::async_trait]
pub trait ButtonEntity: Send + Sync {
    /// Display name, e.g. "SleepNumber Alice Calibrate"
    fn name(&self) -> &str;

    /// Identifier that is unique across all registered entities
    fn unique_id(&self) -> &str;

    /// Key of the button type, shared by all beds
    fn key(&self) -> &str;

    /// Identifier of the device the button acts on
    fn device_id(&self) -> &str;

    /// Icon hint in `mdi:<name>` form
    fn icon(&self) -> &str;

    /// Label for compact surfaces, defaults to the full name
    fn short_name(&self) -> &str {
        self.name()
    }

    /// Performs the press. Failures of the remote action are returned as-is.
    async fn press(&self) -> Result<(), BedError>;
}

/// Registration sink receiving the entities built during setup.
#[async_trait::async_trait]
pub trait AddEntities: Send + Sync {
    async fn add_entities(
        &self,
        entities: Vec<Arc<dyn ButtonEntity>>,
    ) -> Result<(), RegistryError>;
}

/// In-memory registry of button entities, kept in registration order.
#[derive(Default)]
pub struct EntityRegistry {
    entities: RwLock<Vec<Arc<dyn ButtonEntity>>>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up an entity by unique id.
    pub async fn get(&self, unique_id: &str) -> Option<Arc<dyn ButtonEntity>> {
        let entities = self.entities.read().await;
        entities
            .iter()
            .find(|entity| entity.unique_id() == unique_id)
            .cloned()
    }

    /// Returns all registered entities in registration order.
    pub async fn entities(&self) -> Vec<Arc<dyn ButtonEntity>> {
        self.entities.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.entities.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entities.read().await.is_empty()
    }

    /// Presses the entity registered under `unique_id`.
    ///
    /// # Returns
    ///
    /// `RegistryError::UnknownEntity` if nothing is registered under the id,
    /// or `RegistryError::Action` wrapping the bed error of a failed press.
    pub async fn press(&self, unique_id: &str) -> Result<(), RegistryError> {
        let entity = self
            .get(unique_id)
            .await
            .ok_or_else(|| RegistryError::UnknownEntity(unique_id.to_string()))?;
        debug!("Pressing {}", entity.unique_id());
        entity.press().await.map_err(|e| {
            warn!("Press of {} failed: {}", unique_id, e);
            RegistryError::Action(e)
        })
    }
}

#[async_trait::async_trait]
impl AddEntities for EntityRegistry {
    async fn add_entities(
        &self,
        entities: Vec<Arc<dyn ButtonEntity>>,
    ) -> Result<(), RegistryError> {
        let mut registered = self.entities.write().await;
        let mut seen: HashSet<&str> = registered.iter().map(|e| e.unique_id()).collect();
        for entity in &entities {
            if !seen.insert(entity.unique_id()) {
                return Err(RegistryError::DuplicateUniqueId(
                    entity.unique_id().to_string(),
                ));
            }
        }
        drop(seen);

        for entity in &entities {
            info!("Registered button {} ({})", entity.name(), entity.unique_id());
        }
        registered.extend(entities);
        Ok(())
    }
}
