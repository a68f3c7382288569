//! Commands accepted by the town dispatcher.

use townsquare_areas::domain::models::{
    ConversationAreaModel, PosterSessionAreaModel, ViewingAreaModel,
};
use townsquare_core::command::Command;
use uuid::Uuid;

/// Command to create or replace the content of a poster session area.
#[derive(Debug, Clone)]
pub struct CreateOrUpdatePosterArea {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The town the area belongs to.
    pub town_id: String,
    /// The caller's session token.
    pub session_token: String,
    /// The new content; `model.id` names the target area.
    pub model: PosterSessionAreaModel,
}

impl Command for CreateOrUpdatePosterArea {
    fn command_type(&self) -> &'static str {
        "towns.create_or_update_poster_area"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn town_id(&self) -> &str {
        &self.town_id
    }
}

/// Command to add one star to a poster session area.
#[derive(Debug, Clone)]
pub struct IncrementPosterAreaStars {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The town the area belongs to.
    pub town_id: String,
    /// The target area.
    pub area_id: String,
    /// The caller's session token.
    pub session_token: String,
}

impl Command for IncrementPosterAreaStars {
    fn command_type(&self) -> &'static str {
        "towns.increment_poster_area_stars"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn town_id(&self) -> &str {
        &self.town_id
    }
}

/// Command to set the topic of a conversation area.
#[derive(Debug, Clone)]
pub struct CreateConversationArea {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The town the area belongs to.
    pub town_id: String,
    /// The caller's session token.
    pub session_token: String,
    /// The new content; `model.id` names the target area.
    pub model: ConversationAreaModel,
}

impl Command for CreateConversationArea {
    fn command_type(&self) -> &'static str {
        "towns.create_conversation_area"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn town_id(&self) -> &str {
        &self.town_id
    }
}

/// Command to set the video and playback state of a viewing area.
#[derive(Debug, Clone)]
pub struct CreateViewingArea {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The town the area belongs to.
    pub town_id: String,
    /// The caller's session token.
    pub session_token: String,
    /// The new content; `model.id` names the target area.
    pub model: ViewingAreaModel,
}

impl Command for CreateViewingArea {
    fn command_type(&self) -> &'static str {
        "towns.create_viewing_area"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn town_id(&self) -> &str {
        &self.town_id
    }
}

/// Command to join a town as a new player.
#[derive(Debug, Clone)]
pub struct JoinTown {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The town to join.
    pub town_id: String,
    /// The display name to join under.
    pub user_name: String,
}

impl Command for JoinTown {
    fn command_type(&self) -> &'static str {
        "towns.join_town"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn town_id(&self) -> &str {
        &self.town_id
    }
}

/// Command to leave a town.
#[derive(Debug, Clone)]
pub struct LeaveTown {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The town to leave.
    pub town_id: String,
    /// The leaving player's session token.
    pub session_token: String,
}

impl Command for LeaveTown {
    fn command_type(&self) -> &'static str {
        "towns.leave_town"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn town_id(&self) -> &str {
        &self.town_id
    }
}

/// Command to move a player into an area, or out of every area.
#[derive(Debug, Clone)]
pub struct MovePlayer {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The town the player is in.
    pub town_id: String,
    /// The moving player's session token.
    pub session_token: String,
    /// The area to enter; `None` leaves the current area.
    pub destination: Option<String>,
}

impl Command for MovePlayer {
    fn command_type(&self) -> &'static str {
        "towns.move_player"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn town_id(&self) -> &str {
        &self.town_id
    }
}
