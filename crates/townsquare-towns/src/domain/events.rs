//! Payloads for town-level events.

use serde::Serialize;
use townsquare_areas::domain::models::InteractableModel;
use uuid::Uuid;

use super::player::PlayerModel;

/// Payload of `playerJoined`, `playerMoved` and `playerDisconnect`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerEvent {
    /// The player the event is about.
    pub player: PlayerModel,
}

/// Payload of `townClosing`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TownClosing {
    /// The town being torn down.
    pub town_id: Uuid,
}

/// The `initialize` snapshot handed to a newly joined observer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TownSnapshot {
    /// The town joined.
    pub town_id: Uuid,
    /// The town's display name.
    pub friendly_name: String,
    /// Id of the joining player.
    pub player_id: Uuid,
    /// Session token of the joining player.
    pub session_token: String,
    /// Every player in the town, the joiner included.
    pub current_players: Vec<PlayerModel>,
    /// Every area in the town, in map order.
    pub interactables: Vec<InteractableModel>,
}
