//! Transport models for interactable areas.
//!
//! These are the snapshots broadcast to observers and accepted from callers.
//! Absent optional fields are omitted from the serialized form.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Snapshot of a poster session area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosterSessionAreaModel {
    /// Area identifier.
    pub id: String,
    /// Star count. Signed inputs are read as their absolute value.
    #[serde(default, deserialize_with = "star_count")]
    pub stars: u64,
    /// Poster title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Poster image payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_contents: Option<String>,
}

fn star_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    struct StarCount;

    impl Visitor<'_> for StarCount {
        type Value = u64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an integer star count")
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<u64, E> {
            Ok(value.unsigned_abs())
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<u64, E> {
            Ok(value)
        }
    }

    deserializer.deserialize_i64(StarCount)
}

/// Snapshot of a conversation area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationAreaModel {
    /// Area identifier.
    pub id: String,
    /// Conversation topic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    /// Ids of the players currently inside. Ignored on input.
    #[serde(default)]
    pub occupants: Vec<String>,
}

/// Snapshot of a viewing area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewingAreaModel {
    /// Area identifier.
    pub id: String,
    /// Video URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    /// Whether playback is running.
    #[serde(default)]
    pub is_playing: bool,
    /// Playback position in seconds.
    #[serde(default)]
    pub elapsed_time_sec: f64,
}

/// Any area snapshot, tagged with its variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InteractableModel {
    /// A poster session area.
    PosterSessionArea(PosterSessionAreaModel),
    /// A conversation area.
    ConversationArea(ConversationAreaModel),
    /// A viewing area.
    ViewingArea(ViewingAreaModel),
}

impl InteractableModel {
    /// Returns the id of the area this model describes.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::PosterSessionArea(model) => &model.id,
            Self::ConversationArea(model) => &model.id,
            Self::ViewingArea(model) => &model.id,
        }
    }
}
