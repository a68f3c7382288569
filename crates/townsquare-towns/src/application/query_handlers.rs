//! Query handlers for the town dispatcher.
//!
//! Queries run the same town, session and area checks as commands but never
//! mutate state or broadcast.

use townsquare_areas::domain::geometry::AreaType;
use townsquare_areas::domain::models::InteractableModel;
use townsquare_core::error::DomainError;

use crate::registry::TownRegistry;

/// Returns the image payload of a poster session area, if one is set.
///
/// # Errors
///
/// Returns `DomainError::InvalidTownId`, `InvalidSessionToken` or
/// `InvalidInteractableId` (unknown area or not a poster session area),
/// checked in that order.
pub async fn get_poster_area_image_contents(
    town_id: &str,
    area_id: &str,
    session_token: &str,
    registry: &TownRegistry,
) -> Result<Option<String>, DomainError> {
    let handle = registry.town(town_id).await?;
    let town = handle.lock().await;
    town.resolve_session(session_token)?;
    let poster = town
        .find_area(area_id)?
        .poster_session()
        .ok_or_else(|| DomainError::InvalidInteractableId(area_id.to_owned()))?;
    Ok(poster.image_contents().map(|i| i.as_str().to_owned()))
}

/// Runs the town, session and area checks of an area update without
/// applying anything.
///
/// Callers use this to rank a payload they could not decode behind the
/// checks that precede payload validation. When `area_id` is unknown only
/// the town and session are checked.
///
/// # Errors
///
/// Returns `DomainError::InvalidTownId`, `InvalidSessionToken` or
/// `InvalidInteractableId` (unknown area or not of `area_type`), checked in
/// that order.
pub async fn check_area_target(
    town_id: &str,
    session_token: &str,
    area_id: Option<&str>,
    area_type: AreaType,
    registry: &TownRegistry,
) -> Result<(), DomainError> {
    let handle = registry.town(town_id).await?;
    let town = handle.lock().await;
    town.resolve_session(session_token)?;
    if let Some(area_id) = area_id {
        if town.find_area(area_id)?.kind().area_type() != area_type {
            return Err(DomainError::InvalidInteractableId(area_id.to_owned()));
        }
    }
    Ok(())
}

/// Returns the models of every area in a town.
///
/// # Errors
///
/// Returns `DomainError::InvalidTownId` or `InvalidSessionToken`.
pub async fn get_town_interactables(
    town_id: &str,
    session_token: &str,
    registry: &TownRegistry,
) -> Result<Vec<InteractableModel>, DomainError> {
    let handle = registry.town(town_id).await?;
    let town = handle.lock().await;
    town.resolve_session(session_token)?;
    Ok(town.area_models())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use townsquare_areas::domain::geometry::{AreaType, MapObject, TownMap};
    use townsquare_areas::domain::models::PosterSessionAreaModel;
    use townsquare_core::error::DomainError;
    use townsquare_test_support::FixedClock;
    use uuid::Uuid;

    use crate::application::command_handlers::{
        handle_create_or_update_poster_area, handle_increment_poster_area_stars, handle_join_town,
        handle_move_player,
    };
    use crate::application::query_handlers::{
        check_area_target, get_poster_area_image_contents, get_town_interactables,
    };
    use crate::domain::commands::{
        CreateOrUpdatePosterArea, IncrementPosterAreaStars, JoinTown, MovePlayer,
    };
    use crate::registry::TownRegistry;

    fn map() -> TownMap {
        let object = |id: &str, kind: &str| MapObject {
            id: id.to_owned(),
            kind: kind.to_owned(),
            x: 0.0,
            y: 0.0,
            width: Some(64.0),
            height: Some(64.0),
        };
        TownMap {
            objects: vec![
                object("P1", "PosterSessionArea"),
                object("C1", "ConversationArea"),
            ],
        }
    }

    #[tokio::test]
    async fn test_get_poster_area_image_contents_returns_none_for_empty_area() {
        // Arrange
        let registry = TownRegistry::new(Arc::new(FixedClock::epoch()));
        let town_id = registry.create_town("Expo", &map()).await.unwrap().to_string();
        let joined = handle_join_town(
            &JoinTown {
                correlation_id: Uuid::new_v4(),
                town_id: town_id.clone(),
                user_name: "ada".to_owned(),
            },
            &registry,
        )
        .await
        .unwrap();

        // Act
        let contents =
            get_poster_area_image_contents(&town_id, "P1", &joined.snapshot.session_token, &registry)
                .await
                .unwrap();

        // Assert
        assert_eq!(contents, None);
    }

    #[tokio::test]
    async fn test_get_poster_area_image_contents_rejects_bad_inputs() {
        let registry = TownRegistry::new(Arc::new(FixedClock::epoch()));
        let town_id = registry.create_town("Expo", &map()).await.unwrap().to_string();
        let joined = handle_join_town(
            &JoinTown {
                correlation_id: Uuid::new_v4(),
                town_id: town_id.clone(),
                user_name: "ada".to_owned(),
            },
            &registry,
        )
        .await
        .unwrap();
        let token = joined.snapshot.session_token;

        assert!(matches!(
            get_poster_area_image_contents("bogus", "P1", &token, &registry).await,
            Err(DomainError::InvalidTownId(_))
        ));
        assert_eq!(
            get_poster_area_image_contents(&town_id, "P1", "forged", &registry).await,
            Err(DomainError::InvalidSessionToken)
        );
        assert_eq!(
            get_poster_area_image_contents(&town_id, "C1", &token, &registry).await,
            Err(DomainError::InvalidInteractableId("C1".to_owned()))
        );
        assert_eq!(
            get_town_interactables(&town_id, "forged", &registry).await,
            Err(DomainError::InvalidSessionToken)
        );
    }

    #[tokio::test]
    async fn test_check_area_target_follows_validation_order() {
        // Arrange
        let registry = TownRegistry::new(Arc::new(FixedClock::epoch()));
        let town_id = registry.create_town("Expo", &map()).await.unwrap().to_string();
        let joined = handle_join_town(
            &JoinTown {
                correlation_id: Uuid::new_v4(),
                town_id: town_id.clone(),
                user_name: "ada".to_owned(),
            },
            &registry,
        )
        .await
        .unwrap();
        let token = joined.snapshot.session_token;
        let mut events = joined.events;
        while events.try_recv().is_ok() {}
        let poster = AreaType::PosterSession;

        // Act / Assert
        assert!(matches!(
            check_area_target("bogus", "forged", Some("nowhere"), poster, &registry).await,
            Err(DomainError::InvalidTownId(_))
        ));
        assert_eq!(
            check_area_target(&town_id, "forged", Some("nowhere"), poster, &registry).await,
            Err(DomainError::InvalidSessionToken)
        );
        assert_eq!(
            check_area_target(&town_id, &token, Some("nowhere"), poster, &registry).await,
            Err(DomainError::InvalidInteractableId("nowhere".to_owned()))
        );
        assert_eq!(
            check_area_target(&town_id, &token, Some("C1"), poster, &registry).await,
            Err(DomainError::InvalidInteractableId("C1".to_owned()))
        );
        assert_eq!(
            check_area_target(&town_id, &token, Some("P1"), poster, &registry).await,
            Ok(())
        );
        assert_eq!(
            check_area_target(&town_id, &token, None, poster, &registry).await,
            Ok(())
        );
        assert!(events.try_recv().is_err());
    }

    /// Walks through the whole poster lifecycle: populate, rate, read back,
    /// and reset when the last occupant leaves.
    #[tokio::test]
    async fn test_poster_session_lifecycle() {
        // Arrange
        let registry = TownRegistry::new(Arc::new(FixedClock::epoch()));
        let town_id = registry.create_town("Expo", &map()).await.unwrap().to_string();
        let joined = handle_join_town(
            &JoinTown {
                correlation_id: Uuid::new_v4(),
                town_id: town_id.clone(),
                user_name: "ada".to_owned(),
            },
            &registry,
        )
        .await
        .unwrap();
        let token = joined.snapshot.session_token.clone();
        let mut events = joined.events;
        while events.try_recv().is_ok() {}

        let initial = get_town_interactables(&town_id, &token, &registry)
            .await
            .unwrap();
        assert_eq!(
            serde_json::to_value(&initial[0]).unwrap(),
            serde_json::json!({ "type": "PosterSessionArea", "id": "P1", "stars": 0 })
        );

        handle_move_player(
            &MovePlayer {
                correlation_id: Uuid::new_v4(),
                town_id: town_id.clone(),
                session_token: token.clone(),
                destination: Some("P1".to_owned()),
            },
            &registry,
        )
        .await
        .unwrap();

        // Act: populate
        let model = PosterSessionAreaModel {
            id: "P1".to_owned(),
            stars: 0,
            title: Some("Keynote".to_owned()),
            image_contents: Some("<payload>".to_owned()),
        };
        handle_create_or_update_poster_area(
            &CreateOrUpdatePosterArea {
                correlation_id: Uuid::new_v4(),
                town_id: town_id.clone(),
                session_token: token.clone(),
                model: model.clone(),
            },
            &registry,
        )
        .await
        .unwrap();

        // Act: rate
        let stars = handle_increment_poster_area_stars(
            &IncrementPosterAreaStars {
                correlation_id: Uuid::new_v4(),
                town_id: town_id.clone(),
                area_id: "P1".to_owned(),
                session_token: token.clone(),
            },
            &registry,
        )
        .await
        .unwrap();

        // Act: read back
        let contents = get_poster_area_image_contents(&town_id, "P1", &token, &registry)
            .await
            .unwrap();

        // Act: last occupant leaves
        handle_move_player(
            &MovePlayer {
                correlation_id: Uuid::new_v4(),
                town_id: town_id.clone(),
                session_token: token.clone(),
                destination: None,
            },
            &registry,
        )
        .await
        .unwrap();

        // Assert
        assert_eq!(stars, 1);
        assert_eq!(contents.as_deref(), Some("<payload>"));

        let mut updates = Vec::new();
        while let Ok(event) = events.try_recv() {
            if event.event == "interactableUpdate" {
                updates.push(event.payload);
            }
        }
        assert_eq!(
            updates,
            vec![
                serde_json::json!({
                    "type": "PosterSessionArea",
                    "id": "P1",
                    "stars": 0,
                    "title": "Keynote",
                    "imageContents": "<payload>"
                }),
                serde_json::json!({
                    "type": "PosterSessionArea",
                    "id": "P1",
                    "stars": 1,
                    "title": "Keynote",
                    "imageContents": "<payload>"
                }),
                serde_json::json!({ "type": "PosterSessionArea", "id": "P1", "stars": 0 }),
            ]
        );
    }
}
