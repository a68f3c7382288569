//! Poster session areas: a rated poster with a title and an image.

use townsquare_core::error::DomainError;
use uuid::Uuid;

use super::area::AreaContent;
use super::models::{InteractableModel, PosterSessionAreaModel};

/// A poster title. Never empty or whitespace-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosterTitle(String);

impl TryFrom<String> for PosterTitle {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim().is_empty() {
            return Err(DomainError::Validation(
                "poster title must not be empty".to_owned(),
            ));
        }
        Ok(Self(value))
    }
}

impl PosterTitle {
    /// Returns the title text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An opaque poster image payload. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageContents(String);

impl TryFrom<String> for ImageContents {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(DomainError::Validation(
                "poster image contents must not be empty".to_owned(),
            ));
        }
        Ok(Self(value))
    }
}

impl ImageContents {
    /// Returns the raw payload.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Content of a poster session area.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PosterSessionArea {
    stars: u64,
    title: Option<PosterTitle>,
    image_contents: Option<ImageContents>,
}

impl PosterSessionArea {
    /// Builds poster content. The star count is stored as its absolute value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if a present title or image is empty.
    pub fn new(
        stars: i64,
        title: Option<String>,
        image_contents: Option<String>,
    ) -> Result<Self, DomainError> {
        Self::with_count(stars.unsigned_abs(), title, image_contents)
    }

    fn with_count(
        stars: u64,
        title: Option<String>,
        image_contents: Option<String>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            stars,
            title: title.map(PosterTitle::try_from).transpose()?,
            image_contents: image_contents.map(ImageContents::try_from).transpose()?,
        })
    }

    /// Returns the star count.
    #[must_use]
    pub fn stars(&self) -> u64 {
        self.stars
    }

    /// Returns the title, if set.
    #[must_use]
    pub fn title(&self) -> Option<&PosterTitle> {
        self.title.as_ref()
    }

    /// Returns the image payload, if set.
    #[must_use]
    pub fn image_contents(&self) -> Option<&ImageContents> {
        self.image_contents.as_ref()
    }

    /// Replaces stars, title and image as a unit.
    ///
    /// Occupants are untouched and nothing is emitted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if a present title or image is empty;
    /// the content is left unchanged in that case.
    pub fn update_model(&mut self, model: &PosterSessionAreaModel) -> Result<(), DomainError> {
        *self = Self::with_count(
            model.stars,
            model.title.clone(),
            model.image_contents.clone(),
        )?;
        Ok(())
    }

    /// Adds one star and returns the new count.
    pub fn increment_stars(&mut self) -> u64 {
        self.stars = self.stars.saturating_add(1);
        self.stars
    }
}

impl AreaContent for PosterSessionArea {
    type Model = PosterSessionAreaModel;

    fn on_occupants_emptied(&mut self) {
        *self = Self::default();
    }

    fn to_model(&self, id: &str, _occupants: &[Uuid]) -> InteractableModel {
        InteractableModel::PosterSessionArea(PosterSessionAreaModel {
            id: id.to_owned(),
            stars: self.stars,
            title: self.title.as_ref().map(|t| t.as_str().to_owned()),
            image_contents: self.image_contents.as_ref().map(|i| i.as_str().to_owned()),
        })
    }

    fn apply_update(&mut self, model: &Self::Model) -> Result<(), DomainError> {
        if model.title.as_deref().is_none_or(|t| t.trim().is_empty()) {
            return Err(DomainError::Validation(
                "poster session area requires a title".to_owned(),
            ));
        }
        if model.image_contents.as_deref().is_none_or(str::is_empty) {
            return Err(DomainError::Validation(
                "poster session area requires image contents".to_owned(),
            ));
        }
        self.update_model(model)
    }
}
