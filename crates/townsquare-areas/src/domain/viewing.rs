//! Viewing areas: a shared video with synchronized playback.

use townsquare_core::error::DomainError;
use uuid::Uuid;

use super::area::AreaContent;
use super::models::{InteractableModel, ViewingAreaModel};

/// Content of a viewing area.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewingArea {
    video: Option<String>,
    is_playing: bool,
    elapsed_time_sec: f64,
}

impl ViewingArea {
    /// Returns the video URL, if set.
    #[must_use]
    pub fn video(&self) -> Option<&str> {
        self.video.as_deref()
    }

    /// Returns whether playback is running.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Returns the playback position in seconds.
    #[must_use]
    pub fn elapsed_time_sec(&self) -> f64 {
        self.elapsed_time_sec
    }
}

impl AreaContent for ViewingArea {
    type Model = ViewingAreaModel;

    fn on_occupants_emptied(&mut self) {
        *self = Self::default();
    }

    fn to_model(&self, id: &str, _occupants: &[Uuid]) -> InteractableModel {
        InteractableModel::ViewingArea(ViewingAreaModel {
            id: id.to_owned(),
            video: self.video.clone(),
            is_playing: self.is_playing,
            elapsed_time_sec: self.elapsed_time_sec,
        })
    }

    fn apply_update(&mut self, model: &Self::Model) -> Result<(), DomainError> {
        let Some(video) = model.video.as_deref().filter(|v| !v.trim().is_empty()) else {
            return Err(DomainError::Validation(
                "viewing area requires a video".to_owned(),
            ));
        };
        if !model.elapsed_time_sec.is_finite() || model.elapsed_time_sec < 0.0 {
            return Err(DomainError::Validation(format!(
                "elapsed time must be a non-negative number of seconds, got {}",
                model.elapsed_time_sec
            )));
        }
        self.video = Some(video.to_owned());
        self.is_playing = model.is_playing;
        self.elapsed_time_sec = model.elapsed_time_sec;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(video: Option<&str>, elapsed_time_sec: f64) -> ViewingAreaModel {
        ViewingAreaModel {
            id: "V1".to_owned(),
            video: video.map(str::to_owned),
            is_playing: true,
            elapsed_time_sec,
        }
    }

    #[test]
    fn test_apply_update_replaces_playback_state() {
        let mut area = ViewingArea::default();

        area.apply_update(&model(Some("https://example.com/v"), 30.0))
            .unwrap();

        assert_eq!(area.video(), Some("https://example.com/v"));
        assert!(area.is_playing());
        assert!((area.elapsed_time_sec() - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_apply_update_rejects_missing_video_and_negative_elapsed_time() {
        let mut area = ViewingArea::default();

        let missing = area.apply_update(&model(None, 0.0));
        let negative = area.apply_update(&model(Some("https://example.com/v"), -1.0));

        assert!(matches!(missing, Err(DomainError::Validation(_))));
        assert!(matches!(negative, Err(DomainError::Validation(_))));
        assert_eq!(area, ViewingArea::default());
    }

    #[test]
    fn test_on_occupants_emptied_stops_playback() {
        let mut area = ViewingArea::default();
        area.apply_update(&model(Some("https://example.com/v"), 42.0))
            .unwrap();

        area.on_occupants_emptied();

        assert_eq!(area, ViewingArea::default());
    }
}
