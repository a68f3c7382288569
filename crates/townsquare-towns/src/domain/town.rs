//! The town: areas, players and the broadcaster they share.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::mpsc;
use townsquare_areas::domain::area::InteractableArea;
use townsquare_areas::domain::geometry::TownMap;
use townsquare_areas::domain::models::InteractableModel;
use townsquare_core::broadcast::Broadcaster;
use townsquare_core::clock::Clock;
use townsquare_core::error::DomainError;
use townsquare_core::event::{
    PLAYER_DISCONNECT_EVENT, PLAYER_JOINED_EVENT, PLAYER_MOVED_EVENT, TOWN_CLOSING_EVENT,
    TownEvent,
};
use tracing::{debug, info};
use uuid::Uuid;

use super::broadcaster::TownBroadcaster;
use super::events::{PlayerEvent, TownClosing, TownSnapshot};
use super::player::{Player, PlayerModel};

/// A shared space holding interactable areas and connected players.
#[derive(Debug)]
pub struct Town {
    id: Uuid,
    friendly_name: String,
    areas: Vec<InteractableArea>,
    players: Vec<Player>,
    broadcaster: Arc<TownBroadcaster>,
    clock: Arc<dyn Clock>,
}

impl Town {
    /// Builds a town from the area objects of a map.
    ///
    /// Objects whose kind names no area variant are skipped.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Geometry` if an area object lacks a width or
    /// height, and `DomainError::Validation` if the friendly name is empty or
    /// two areas share an id.
    pub fn from_map(
        id: Uuid,
        friendly_name: &str,
        map: &TownMap,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, DomainError> {
        if friendly_name.trim().is_empty() {
            return Err(DomainError::Validation(
                "town friendly name must not be empty".to_owned(),
            ));
        }
        let broadcaster = Arc::new(TownBroadcaster::new(clock.clone()));
        let mut seen = HashSet::new();
        let mut areas = Vec::new();
        for object in &map.objects {
            if object.area_type().is_none() {
                debug!(object_id = %object.id, kind = %object.kind, "skipping non-area map object");
                continue;
            }
            if !seen.insert(object.id.as_str()) {
                return Err(DomainError::Validation(format!(
                    "duplicate area id {}",
                    object.id
                )));
            }
            let shared: Arc<dyn Broadcaster> = broadcaster.clone();
            areas.push(InteractableArea::from_map_object(object, shared)?);
        }
        Ok(Self {
            id,
            friendly_name: friendly_name.to_owned(),
            areas,
            players: Vec::new(),
            broadcaster,
            clock,
        })
    }

    /// Returns the town identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn friendly_name(&self) -> &str {
        &self.friendly_name
    }

    /// Returns the connected players in join order.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Returns the areas in map order.
    #[must_use]
    pub fn areas(&self) -> &[InteractableArea] {
        &self.areas
    }

    /// Returns the town's broadcaster.
    #[must_use]
    pub fn broadcaster(&self) -> &TownBroadcaster {
        &self.broadcaster
    }

    /// Returns the models of every area, in map order.
    #[must_use]
    pub fn area_models(&self) -> Vec<InteractableModel> {
        self.areas.iter().map(InteractableArea::to_model).collect()
    }

    /// Resolves a session token to the player holding it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSessionToken` if no joined player holds it.
    pub fn resolve_session(&self, session_token: &str) -> Result<&Player, DomainError> {
        self.players
            .iter()
            .find(|p| p.session_token() == session_token)
            .ok_or(DomainError::InvalidSessionToken)
    }

    /// Looks up an area by id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidInteractableId` if no area has that id.
    pub fn find_area(&self, area_id: &str) -> Result<&InteractableArea, DomainError> {
        self.areas
            .iter()
            .find(|a| a.id() == area_id)
            .ok_or_else(|| DomainError::InvalidInteractableId(area_id.to_owned()))
    }

    /// Looks up an area by id for mutation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidInteractableId` if no area has that id.
    pub fn find_area_mut(&mut self, area_id: &str) -> Result<&mut InteractableArea, DomainError> {
        self.areas
            .iter_mut()
            .find(|a| a.id() == area_id)
            .ok_or_else(|| DomainError::InvalidInteractableId(area_id.to_owned()))
    }

    /// Adds a player, registers their observer channel and announces them.
    ///
    /// The returned snapshot is taken after the join, so it is consistent
    /// with every event the receiver will deliver afterwards.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the user name is empty.
    pub fn join(
        &mut self,
        user_name: &str,
    ) -> Result<(TownSnapshot, mpsc::UnboundedReceiver<TownEvent>), DomainError> {
        if user_name.trim().is_empty() {
            return Err(DomainError::Validation(
                "user name must not be empty".to_owned(),
            ));
        }
        let player = Player::new(user_name.to_owned(), self.clock.now());
        let events = self.broadcaster.subscribe(player.id);
        let model = player.to_model();
        let snapshot_token = player.session_token().to_owned();
        let player_id = player.id;
        self.players.push(player);
        self.publish_player_event(PLAYER_JOINED_EVENT, model);
        info!(town_id = %self.id, %player_id, "player joined town");

        let snapshot = TownSnapshot {
            town_id: self.id,
            friendly_name: self.friendly_name.clone(),
            player_id,
            session_token: snapshot_token,
            current_players: self.players.iter().map(Player::to_model).collect(),
            interactables: self.area_models(),
        };
        Ok((snapshot, events))
    }

    /// Removes a player, vacating their area and closing their channel.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSessionToken` if the token is unknown.
    pub fn leave(&mut self, session_token: &str) -> Result<PlayerModel, DomainError> {
        let index = self
            .players
            .iter()
            .position(|p| p.session_token() == session_token)
            .ok_or(DomainError::InvalidSessionToken)?;
        let mut player = self.players.remove(index);
        self.broadcaster.unsubscribe(player.id);
        if let Some(area_id) = player.current_area.take() {
            if let Some(area) = self.areas.iter_mut().find(|a| a.id() == area_id) {
                area.remove_occupant(player.id);
            }
        }
        let model = player.to_model();
        self.publish_player_event(PLAYER_DISCONNECT_EVENT, model.clone());
        info!(town_id = %self.id, player_id = %player.id, "player left town");
        Ok(model)
    }

    /// Moves a player out of their current area and into `destination`.
    ///
    /// The destination is validated before anything changes. Moving to the
    /// area the player is already in changes nothing but is still announced.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSessionToken` if the token is unknown, or
    /// `DomainError::InvalidInteractableId` if the destination does not exist.
    pub fn move_player(
        &mut self,
        session_token: &str,
        destination: Option<&str>,
    ) -> Result<PlayerModel, DomainError> {
        let index = self
            .players
            .iter()
            .position(|p| p.session_token() == session_token)
            .ok_or(DomainError::InvalidSessionToken)?;
        let destination_index = destination
            .map(|area_id| {
                self.areas
                    .iter()
                    .position(|a| a.id() == area_id)
                    .ok_or_else(|| DomainError::InvalidInteractableId(area_id.to_owned()))
            })
            .transpose()?;

        let player = &mut self.players[index];
        if player.current_area.as_deref() != destination {
            if let Some(previous) = player.current_area.take() {
                if let Some(area) = self.areas.iter_mut().find(|a| a.id() == previous) {
                    area.remove_occupant(player.id);
                }
            }
            if let Some(target) = destination_index {
                let area = &mut self.areas[target];
                area.add_occupant(player.id);
                player.current_area = Some(area.id().to_owned());
            }
        }
        let model = player.to_model();
        self.publish_player_event(PLAYER_MOVED_EVENT, model.clone());
        Ok(model)
    }

    /// Announces teardown and closes every observer channel.
    ///
    /// # Panics
    ///
    /// Never in practice; serializing the closing payload cannot fail.
    pub fn close(&mut self) {
        let payload = serde_json::to_value(TownClosing { town_id: self.id })
            .expect("TownClosing serialization is infallible");
        self.broadcaster.publish(TOWN_CLOSING_EVENT, payload);
        self.broadcaster.close();
        info!(town_id = %self.id, "town closed");
    }

    fn publish_player_event(&self, event_name: &str, player: PlayerModel) {
        let payload = serde_json::to_value(PlayerEvent { player })
            .expect("PlayerEvent serialization is infallible");
        self.broadcaster.publish(event_name, payload);
    }
}
