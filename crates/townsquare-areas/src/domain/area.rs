//! The interactable area base: identity, geometry, occupants and emission.

use std::sync::Arc;

use townsquare_core::broadcast::Broadcaster;
use townsquare_core::error::DomainError;
use townsquare_core::event::INTERACTABLE_UPDATE_EVENT;
use tracing::debug;
use uuid::Uuid;

use super::conversation::ConversationArea;
use super::geometry::{AreaType, BoundingBox, MapObject};
use super::models::InteractableModel;
use super::poster_session::PosterSessionArea;
use super::viewing::ViewingArea;

/// Capability every area variant implements.
pub trait AreaContent {
    /// The transport model this variant accepts on update.
    type Model;

    /// Clears variant content once the last occupant has left.
    fn on_occupants_emptied(&mut self);

    /// Serializes the variant content into its tagged transport model.
    fn to_model(&self, id: &str, occupants: &[Uuid]) -> InteractableModel;

    /// Validates `model` and, only if it is valid, replaces the content.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the model fails variant rules.
    fn apply_update(&mut self, model: &Self::Model) -> Result<(), DomainError>;
}

/// The content variant held by an area.
#[derive(Debug, Clone, PartialEq)]
pub enum AreaKind {
    /// Poster session content.
    PosterSession(PosterSessionArea),
    /// Conversation content.
    Conversation(ConversationArea),
    /// Viewing content.
    Viewing(ViewingArea),
}

impl AreaKind {
    /// Returns the empty content for `area_type`.
    #[must_use]
    pub fn empty(area_type: AreaType) -> Self {
        match area_type {
            AreaType::PosterSession => Self::PosterSession(PosterSessionArea::default()),
            AreaType::Conversation => Self::Conversation(ConversationArea::default()),
            AreaType::Viewing => Self::Viewing(ViewingArea::default()),
        }
    }

    /// Returns the variant this content belongs to.
    #[must_use]
    pub fn area_type(&self) -> AreaType {
        match self {
            Self::PosterSession(_) => AreaType::PosterSession,
            Self::Conversation(_) => AreaType::Conversation,
            Self::Viewing(_) => AreaType::Viewing,
        }
    }

    fn on_occupants_emptied(&mut self) {
        match self {
            Self::PosterSession(area) => area.on_occupants_emptied(),
            Self::Conversation(area) => area.on_occupants_emptied(),
            Self::Viewing(area) => area.on_occupants_emptied(),
        }
    }

    fn to_model(&self, id: &str, occupants: &[Uuid]) -> InteractableModel {
        match self {
            Self::PosterSession(area) => area.to_model(id, occupants),
            Self::Conversation(area) => area.to_model(id, occupants),
            Self::Viewing(area) => area.to_model(id, occupants),
        }
    }
}

/// A fixed region of a town holding shared, occupant-scoped state.
///
/// The id and bounding box never change after construction; only the
/// content and the occupant list mutate.
#[derive(Debug)]
pub struct InteractableArea {
    id: String,
    bounding_box: BoundingBox,
    occupants: Vec<Uuid>,
    broadcaster: Arc<dyn Broadcaster>,
    kind: AreaKind,
}

impl InteractableArea {
    /// Creates an area with the given content.
    #[must_use]
    pub fn new(
        id: String,
        bounding_box: BoundingBox,
        kind: AreaKind,
        broadcaster: Arc<dyn Broadcaster>,
    ) -> Self {
        Self {
            id,
            bounding_box,
            occupants: Vec::new(),
            broadcaster,
            kind,
        }
    }

    /// Builds an empty area from a map object.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Geometry` if the object lacks a width or height,
    /// and `DomainError::Validation` if its kind names no area variant.
    pub fn from_map_object(
        object: &MapObject,
        broadcaster: Arc<dyn Broadcaster>,
    ) -> Result<Self, DomainError> {
        let bounding_box = object.bounding_box()?;
        let area_type = object.area_type().ok_or_else(|| {
            DomainError::Validation(format!(
                "map object {} has unsupported kind {:?}",
                object.id, object.kind
            ))
        })?;
        Ok(Self::new(
            object.id.clone(),
            bounding_box,
            AreaKind::empty(area_type),
            broadcaster,
        ))
    }

    /// Returns the area identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the area's fixed bounding box.
    #[must_use]
    pub fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }

    /// Returns the ids of the players currently inside, in arrival order.
    #[must_use]
    pub fn occupants(&self) -> &[Uuid] {
        &self.occupants
    }

    /// Returns the content variant.
    #[must_use]
    pub fn kind(&self) -> &AreaKind {
        &self.kind
    }

    /// Returns the poster session content, if this is a poster session area.
    #[must_use]
    pub fn poster_session(&self) -> Option<&PosterSessionArea> {
        match &self.kind {
            AreaKind::PosterSession(area) => Some(area),
            _ => None,
        }
    }

    /// Mutable access to the poster session content, if this is one.
    pub fn poster_session_mut(&mut self) -> Option<&mut PosterSessionArea> {
        match &mut self.kind {
            AreaKind::PosterSession(area) => Some(area),
            _ => None,
        }
    }

    /// Adds a player to the occupant list. Does not emit.
    pub fn add_occupant(&mut self, player_id: Uuid) {
        if !self.occupants.contains(&player_id) {
            self.occupants.push(player_id);
        }
    }

    /// Removes a player from the occupant list.
    ///
    /// When this removes the last occupant, the content is reset and a single
    /// change event is emitted. Removing a non-occupant does nothing.
    pub fn remove_occupant(&mut self, player_id: Uuid) {
        let Some(position) = self.occupants.iter().position(|id| *id == player_id) else {
            return;
        };
        self.occupants.remove(position);
        if self.occupants.is_empty() {
            debug!(area_id = %self.id, "last occupant left, resetting content");
            self.kind.on_occupants_emptied();
            self.emit_changed();
        }
    }

    /// Produces the transport snapshot of this area.
    #[must_use]
    pub fn to_model(&self) -> InteractableModel {
        self.kind.to_model(&self.id, &self.occupants)
    }

    /// Applies a tagged update to this area's content.
    ///
    /// The variant is checked before the payload, so a model for the wrong
    /// variant is reported as an unknown interactable even if its payload is
    /// also invalid. Nothing is emitted; callers emit once the update returns.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidInteractableId` if `model` is for another
    /// variant, or `DomainError::Validation` if the payload is invalid.
    pub fn apply_update(&mut self, model: &InteractableModel) -> Result<(), DomainError> {
        match (&mut self.kind, model) {
            (AreaKind::PosterSession(area), InteractableModel::PosterSessionArea(update)) => {
                area.apply_update(update)
            }
            (AreaKind::Conversation(area), InteractableModel::ConversationArea(update)) => {
                area.apply_update(update)
            }
            (AreaKind::Viewing(area), InteractableModel::ViewingArea(update)) => {
                area.apply_update(update)
            }
            _ => Err(DomainError::InvalidInteractableId(self.id.clone())),
        }
    }

    /// Publishes the current model to every observer of the town.
    ///
    /// # Panics
    ///
    /// Never in practice; serializing an `InteractableModel` cannot fail.
    pub fn emit_changed(&self) {
        let payload = serde_json::to_value(self.to_model())
            .expect("InteractableModel serialization is infallible");
        debug!(area_id = %self.id, "emitting interactable update");
        self.broadcaster.publish(INTERACTABLE_UPDATE_EVENT, payload);
    }
}
