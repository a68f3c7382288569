//! Command handlers for the town dispatcher.
//!
//! Every handler locks the target town once and runs the whole
//! validate → mutate → emit sequence under that lock. Validation happens in a
//! fixed order (town, session, area and variant, payload) and stops at the
//! first failure, so a rejected command never mutates state or broadcasts.

use tokio::sync::mpsc;
use townsquare_areas::domain::models::InteractableModel;
use townsquare_core::command::Command;
use townsquare_core::error::DomainError;
use townsquare_core::event::TownEvent;
use tracing::{info, instrument};

use crate::domain::commands::{
    CreateConversationArea, CreateOrUpdatePosterArea, CreateViewingArea,
    IncrementPosterAreaStars, JoinTown, LeaveTown, MovePlayer,
};
use crate::domain::events::TownSnapshot;
use crate::domain::player::PlayerModel;
use crate::registry::TownRegistry;

/// Result of a successful join.
#[derive(Debug)]
pub struct JoinedTown {
    /// The `initialize` snapshot for the new player.
    pub snapshot: TownSnapshot,
    /// Every event published in the town from the join onwards.
    pub events: mpsc::UnboundedReceiver<TownEvent>,
}

async fn update_area<C: Command>(
    command: &C,
    session_token: &str,
    model: &InteractableModel,
    registry: &TownRegistry,
) -> Result<(), DomainError> {
    let handle = registry.town(command.town_id()).await?;
    let mut town = handle.lock().await;
    town.resolve_session(session_token)?;
    let area = town.find_area_mut(model.id())?;
    area.apply_update(model)?;
    area.emit_changed();

    info!(
        correlation_id = %command.correlation_id(),
        command_type = command.command_type(),
        area_id = model.id(),
        "area updated"
    );
    Ok(())
}

/// Handles the `CreateOrUpdatePosterArea` command: replaces the poster's
/// stars, title and image, then broadcasts the new model.
///
/// # Errors
///
/// Returns `DomainError::InvalidTownId`, `InvalidSessionToken`,
/// `InvalidInteractableId` (unknown area or not a poster session area) or
/// `Validation` (missing title or image), checked in that order.
#[instrument(skip_all, fields(area_id = %command.model.id))]
pub async fn handle_create_or_update_poster_area(
    command: &CreateOrUpdatePosterArea,
    registry: &TownRegistry,
) -> Result<(), DomainError> {
    let model = InteractableModel::PosterSessionArea(command.model.clone());
    update_area(command, &command.session_token, &model, registry).await
}

/// Handles the `IncrementPosterAreaStars` command: adds one star, broadcasts
/// the new model and returns the new count.
///
/// # Errors
///
/// Returns `DomainError::InvalidTownId`, `InvalidSessionToken` or
/// `InvalidInteractableId`, checked in that order.
#[instrument(skip_all, fields(area_id = %command.area_id))]
pub async fn handle_increment_poster_area_stars(
    command: &IncrementPosterAreaStars,
    registry: &TownRegistry,
) -> Result<u64, DomainError> {
    let handle = registry.town(&command.town_id).await?;
    let mut town = handle.lock().await;
    town.resolve_session(&command.session_token)?;
    let area = town.find_area_mut(&command.area_id)?;
    let stars = area
        .poster_session_mut()
        .ok_or_else(|| DomainError::InvalidInteractableId(command.area_id.clone()))?
        .increment_stars();
    area.emit_changed();

    info!(
        correlation_id = %command.correlation_id,
        stars,
        "poster area stars incremented"
    );
    Ok(stars)
}

/// Handles the `CreateConversationArea` command: sets the topic, then
/// broadcasts the new model.
///
/// # Errors
///
/// Returns `DomainError::InvalidTownId`, `InvalidSessionToken`,
/// `InvalidInteractableId` or `Validation` (missing topic).
#[instrument(skip_all, fields(area_id = %command.model.id))]
pub async fn handle_create_conversation_area(
    command: &CreateConversationArea,
    registry: &TownRegistry,
) -> Result<(), DomainError> {
    let model = InteractableModel::ConversationArea(command.model.clone());
    update_area(command, &command.session_token, &model, registry).await
}

/// Handles the `CreateViewingArea` command: sets the video and playback
/// state, then broadcasts the new model.
///
/// # Errors
///
/// Returns `DomainError::InvalidTownId`, `InvalidSessionToken`,
/// `InvalidInteractableId` or `Validation` (missing video, bad elapsed time).
#[instrument(skip_all, fields(area_id = %command.model.id))]
pub async fn handle_create_viewing_area(
    command: &CreateViewingArea,
    registry: &TownRegistry,
) -> Result<(), DomainError> {
    let model = InteractableModel::ViewingArea(command.model.clone());
    update_area(command, &command.session_token, &model, registry).await
}

/// Handles the `JoinTown` command: adds a player and subscribes them to the
/// town's events.
///
/// # Errors
///
/// Returns `DomainError::InvalidTownId` or `Validation` (empty user name).
#[instrument(skip_all, fields(town_id = %command.town_id))]
pub async fn handle_join_town(
    command: &JoinTown,
    registry: &TownRegistry,
) -> Result<JoinedTown, DomainError> {
    let handle = registry.town(&command.town_id).await?;
    let (snapshot, events) = handle.lock().await.join(&command.user_name)?;
    info!(correlation_id = %command.correlation_id, player_id = %snapshot.player_id, "handled join_town");
    Ok(JoinedTown { snapshot, events })
}

/// Handles the `LeaveTown` command: removes the player, which may reset the
/// area they were in.
///
/// # Errors
///
/// Returns `DomainError::InvalidTownId` or `InvalidSessionToken`.
#[instrument(skip_all, fields(town_id = %command.town_id))]
pub async fn handle_leave_town(
    command: &LeaveTown,
    registry: &TownRegistry,
) -> Result<PlayerModel, DomainError> {
    let handle = registry.town(&command.town_id).await?;
    let player = handle.lock().await.leave(&command.session_token)?;
    info!(correlation_id = %command.correlation_id, player_id = %player.id, "handled leave_town");
    Ok(player)
}

/// Handles the `MovePlayer` command: moves the player between areas, which
/// may reset the area they left.
///
/// # Errors
///
/// Returns `DomainError::InvalidTownId`, `InvalidSessionToken` or
/// `InvalidInteractableId` (unknown destination).
#[instrument(skip_all, fields(town_id = %command.town_id))]
pub async fn handle_move_player(
    command: &MovePlayer,
    registry: &TownRegistry,
) -> Result<PlayerModel, DomainError> {
    let handle = registry.town(&command.town_id).await?;
    let player = handle
        .lock()
        .await
        .move_player(&command.session_token, command.destination.as_deref())?;
    info!(
        correlation_id = %command.correlation_id,
        player_id = %player.id,
        destination = ?command.destination,
        "handled move_player"
    );
    Ok(player)
}
