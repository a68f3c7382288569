//! Area geometry and the map objects areas are built from.

use serde::{Deserialize, Serialize};
use townsquare_core::error::DomainError;

/// The fixed rectangle an area occupies on the town map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

/// The area variants a map object can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaType {
    /// A poster session area.
    PosterSession,
    /// A conversation area.
    Conversation,
    /// A viewing area.
    Viewing,
}

impl AreaType {
    /// Resolves the map object kind string, if it names an area variant.
    #[must_use]
    pub fn from_kind(kind: &str) -> Option<Self> {
        match kind {
            "PosterSessionArea" => Some(Self::PosterSession),
            "ConversationArea" => Some(Self::Conversation),
            "ViewingArea" => Some(Self::Viewing),
            _ => None,
        }
    }
}

/// A single object from a map object layer.
///
/// Field names follow the Tiled object-layer format: the area id is the
/// object's `name` and the variant is its `type` (or `class`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapObject {
    /// Area identifier.
    #[serde(rename = "name")]
    pub id: String,
    /// Declared object kind, e.g. `PosterSessionArea`.
    #[serde(rename = "type", alias = "class", default)]
    pub kind: String,
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent, when the map supplies one.
    #[serde(default)]
    pub width: Option<f64>,
    /// Vertical extent, when the map supplies one.
    #[serde(default)]
    pub height: Option<f64>,
}

impl MapObject {
    /// Returns the area variant this object declares, if any.
    #[must_use]
    pub fn area_type(&self) -> Option<AreaType> {
        AreaType::from_kind(&self.kind)
    }

    /// Builds the bounding box for this object.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Geometry` if width or height is missing.
    pub fn bounding_box(&self) -> Result<BoundingBox, DomainError> {
        match (self.width, self.height) {
            (Some(width), Some(height)) => Ok(BoundingBox {
                x: self.x,
                y: self.y,
                width,
                height,
            }),
            (None, _) => Err(DomainError::Geometry(format!(
                "map object {} is missing a width",
                self.id
            ))),
            (_, None) => Err(DomainError::Geometry(format!(
                "map object {} is missing a height",
                self.id
            ))),
        }
    }
}

/// The object layer of a town map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TownMap {
    /// Every object on the layer, areas and otherwise.
    #[serde(default)]
    pub objects: Vec<MapObject>,
}

impl TownMap {
    /// Parses a map document.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the document is not valid map JSON.
    pub fn from_json(document: &str) -> Result<Self, DomainError> {
        serde_json::from_str(document)
            .map_err(|e| DomainError::Infrastructure(format!("map parsing failed: {e}")))
    }
}
