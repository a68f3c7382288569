//! Town event abstractions.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Event name for an area whose state changed.
pub const INTERACTABLE_UPDATE_EVENT: &str = "interactableUpdate";

/// Event name for the snapshot handed to a newly joined observer.
pub const INITIALIZE_EVENT: &str = "initialize";

/// Event name for a player joining the town.
pub const PLAYER_JOINED_EVENT: &str = "playerJoined";

/// Event name for a player leaving the town.
pub const PLAYER_DISCONNECT_EVENT: &str = "playerDisconnect";

/// Event name for a player entering or leaving an area.
pub const PLAYER_MOVED_EVENT: &str = "playerMoved";

/// Event name for a town being torn down.
pub const TOWN_CLOSING_EVENT: &str = "townClosing";

/// An event delivered to every observer of a town.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TownEvent {
    /// Strictly increasing within a town, starting at 1.
    pub sequence: u64,
    /// Event name, one of the `*_EVENT` constants.
    pub event: String,
    /// Timestamp of publication.
    pub occurred_at: DateTime<Utc>,
    /// Serialized event payload.
    pub payload: serde_json::Value,
}
