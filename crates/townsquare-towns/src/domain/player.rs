//! Players connected to a town.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A player with an active session in a town.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Player identifier.
    pub id: Uuid,
    /// Display name chosen at join.
    pub user_name: String,
    /// Opaque credential for this connection.
    session_token: String,
    /// Id of the area the player is in, if any.
    pub current_area: Option<String>,
    /// When the player joined.
    pub joined_at: DateTime<Utc>,
}

impl Player {
    /// Creates a player with a fresh id and session token.
    #[must_use]
    pub fn new(user_name: String, joined_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_name,
            session_token: Uuid::new_v4().simple().to_string(),
            current_area: None,
            joined_at,
        }
    }

    /// Returns the player's session token.
    #[must_use]
    pub fn session_token(&self) -> &str {
        &self.session_token
    }

    /// Returns the public view of this player.
    #[must_use]
    pub fn to_model(&self) -> PlayerModel {
        PlayerModel {
            id: self.id,
            user_name: self.user_name.clone(),
            current_area: self.current_area.clone(),
        }
    }
}

/// Public view of a player, safe to broadcast. Never carries the token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerModel {
    /// Player identifier.
    pub id: Uuid,
    /// Display name.
    pub user_name: String,
    /// Id of the area the player is in, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_area: Option<String>,
}
