//! The registry of live towns.
//!
//! A `TownRegistry` is an ordinary value: the server builds one at startup
//! and passes it by reference to every handler, and tests build as many
//! independent registries as they need. A town lives from `create_town`
//! until `teardown`; nothing is persisted.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use townsquare_areas::domain::geometry::TownMap;
use townsquare_core::clock::Clock;
use townsquare_core::error::DomainError;
use tracing::info;
use uuid::Uuid;

use crate::domain::town::Town;

/// Shared handle to a town. Every operation on a town runs under its lock.
pub type TownHandle = Arc<Mutex<Town>>;

/// Listing entry for a live town.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TownSummary {
    /// Town identifier.
    pub town_id: Uuid,
    /// Display name.
    pub friendly_name: String,
    /// Number of connected players.
    pub current_occupancy: usize,
}

/// Owns every live town.
#[derive(Debug)]
pub struct TownRegistry {
    clock: Arc<dyn Clock>,
    towns: RwLock<HashMap<Uuid, TownHandle>>,
}

impl TownRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            towns: RwLock::new(HashMap::new()),
        }
    }

    /// Builds a town from `map` and registers it.
    ///
    /// # Errors
    ///
    /// Propagates `DomainError::Geometry` or `DomainError::Validation` from
    /// building the town; nothing is registered in that case.
    pub async fn create_town(
        &self,
        friendly_name: &str,
        map: &TownMap,
    ) -> Result<Uuid, DomainError> {
        let town_id = Uuid::new_v4();
        let town = Town::from_map(town_id, friendly_name, map, self.clock.clone())?;
        let area_count = town.areas().len();
        self.towns
            .write()
            .await
            .insert(town_id, Arc::new(Mutex::new(town)));
        info!(%town_id, friendly_name, area_count, "town created");
        Ok(town_id)
    }

    /// Returns a summary of every live town.
    pub async fn list_towns(&self) -> Vec<TownSummary> {
        let handles: Vec<TownHandle> = self.towns.read().await.values().cloned().collect();
        let mut summaries = Vec::with_capacity(handles.len());
        for handle in handles {
            let town = handle.lock().await;
            summaries.push(TownSummary {
                town_id: town.id(),
                friendly_name: town.friendly_name().to_owned(),
                current_occupancy: town.players().len(),
            });
        }
        summaries.sort_by(|a, b| a.friendly_name.cmp(&b.friendly_name));
        summaries
    }

    /// Looks up a town by its textual id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTownId` if the id does not parse or no
    /// live town has it.
    pub async fn town(&self, town_id: &str) -> Result<TownHandle, DomainError> {
        let parsed = parse_town_id(town_id)?;
        self.towns
            .read()
            .await
            .get(&parsed)
            .cloned()
            .ok_or_else(|| DomainError::InvalidTownId(town_id.to_owned()))
    }

    /// Removes a town, announcing `townClosing` to its observers first.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTownId` if the town does not exist.
    pub async fn teardown(&self, town_id: &str) -> Result<(), DomainError> {
        let parsed = parse_town_id(town_id)?;
        let handle = self
            .towns
            .write()
            .await
            .remove(&parsed)
            .ok_or_else(|| DomainError::InvalidTownId(town_id.to_owned()))?;
        handle.lock().await.close();
        Ok(())
    }
}

fn parse_town_id(town_id: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(town_id).map_err(|_| DomainError::InvalidTownId(town_id.to_owned()))
}
