//! Conversation areas: a topic shared by the players inside.

use townsquare_core::error::DomainError;
use uuid::Uuid;

use super::area::AreaContent;
use super::models::{ConversationAreaModel, InteractableModel};

/// Content of a conversation area.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationArea {
    topic: Option<String>,
}

impl ConversationArea {
    /// Returns the topic, if set.
    #[must_use]
    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }
}

impl AreaContent for ConversationArea {
    type Model = ConversationAreaModel;

    fn on_occupants_emptied(&mut self) {
        self.topic = None;
    }

    fn to_model(&self, id: &str, occupants: &[Uuid]) -> InteractableModel {
        InteractableModel::ConversationArea(ConversationAreaModel {
            id: id.to_owned(),
            topic: self.topic.clone(),
            occupants: occupants.iter().map(Uuid::to_string).collect(),
        })
    }

    fn apply_update(&mut self, model: &Self::Model) -> Result<(), DomainError> {
        match model.topic.as_deref() {
            Some(topic) if !topic.trim().is_empty() => {
                self.topic = Some(topic.to_owned());
                Ok(())
            }
            _ => Err(DomainError::Validation(
                "conversation area requires a topic".to_owned(),
            )),
        }
    }
}
