//! Routes for the area dispatcher.
//!
//! Every route takes the caller's session token from the `X-Session-Token`
//! header. A missing header is treated as an unknown token, so it is still
//! reported after an unknown town. Request bodies are decoded only after the
//! town, session and area checks, so a malformed body never masks them.

use std::convert::Infallible;

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequestParts, Path, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::{Json, Router, routing::get, routing::post};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use townsquare_areas::domain::geometry::AreaType;
use townsquare_areas::domain::models::{
    ConversationAreaModel, InteractableModel, PosterSessionAreaModel, ViewingAreaModel,
};
use townsquare_core::error::DomainError;
use townsquare_towns::registry::TownRegistry;
use townsquare_towns::application::{command_handlers, query_handlers};
use townsquare_towns::domain::commands;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the caller's session token.
pub const SESSION_TOKEN_HEADER: &str = "x-session-token";

/// The caller's session token; empty when the header is absent or not text.
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(SESSION_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        Ok(Self(token.to_owned()))
    }
}

/// Response body for POST /stars.
#[derive(Debug, Serialize)]
pub struct StarsResponse {
    /// The star count after the increment.
    pub stars: u64,
}

/// Response body for GET /image-contents.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageContentsResponse {
    /// The poster's image payload, if one is set.
    pub image_contents: Option<String>,
}

/// Decodes an area model from a request body.
///
/// A body that does not decode is reported as `DomainError::Validation`, but
/// only after the town, session and (when the body names one) area checks
/// have passed.
async fn decode_model<M: DeserializeOwned>(
    body: Result<Json<Value>, JsonRejection>,
    town_id: &str,
    session_token: &str,
    area_type: AreaType,
    registry: &TownRegistry,
) -> Result<M, ApiError> {
    let (area_id, message) = match body {
        Ok(Json(value)) => {
            let area_id = value.get("id").and_then(Value::as_str).map(str::to_owned);
            match serde_json::from_value(value) {
                Ok(model) => return Ok(model),
                Err(e) => (area_id, e.to_string()),
            }
        }
        Err(rejection) => (None, rejection.body_text()),
    };
    query_handlers::check_area_target(
        town_id,
        session_token,
        area_id.as_deref(),
        area_type,
        registry,
    )
    .await?;
    Err(DomainError::Validation(format!("invalid request body: {message}")).into())
}

/// POST /{town_id}/poster-session-areas
#[instrument(skip_all, fields(town_id = %town_id))]
async fn create_or_update_poster_area(
    State(state): State<AppState>,
    Path(town_id): Path<String>,
    SessionToken(session_token): SessionToken,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let model: PosterSessionAreaModel = decode_model(
        body,
        &town_id,
        &session_token,
        AreaType::PosterSession,
        &state.registry,
    )
    .await?;
    let command = commands::CreateOrUpdatePosterArea {
        correlation_id: Uuid::new_v4(),
        town_id,
        session_token,
        model,
    };

    info!(
        correlation_id = %command.correlation_id,
        area_id = %command.model.id,
        "handling create_or_update_poster_area command"
    );

    command_handlers::handle_create_or_update_poster_area(&command, &state.registry).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /{town_id}/poster-session-areas/{area_id}/stars
#[instrument(skip_all, fields(town_id = %town_id, area_id = %area_id))]
async fn increment_poster_area_stars(
    State(state): State<AppState>,
    Path((town_id, area_id)): Path<(String, String)>,
    SessionToken(session_token): SessionToken,
) -> Result<Json<StarsResponse>, ApiError> {
    let command = commands::IncrementPosterAreaStars {
        correlation_id: Uuid::new_v4(),
        town_id,
        area_id,
        session_token,
    };

    info!(correlation_id = %command.correlation_id, "handling increment_poster_area_stars command");

    let stars =
        command_handlers::handle_increment_poster_area_stars(&command, &state.registry).await?;

    Ok(Json(StarsResponse { stars }))
}

/// GET /{town_id}/poster-session-areas/{area_id}/image-contents
#[instrument(skip_all, fields(town_id = %town_id, area_id = %area_id))]
async fn get_poster_area_image_contents(
    State(state): State<AppState>,
    Path((town_id, area_id)): Path<(String, String)>,
    SessionToken(session_token): SessionToken,
) -> Result<Json<ImageContentsResponse>, ApiError> {
    let image_contents = query_handlers::get_poster_area_image_contents(
        &town_id,
        &area_id,
        &session_token,
        &state.registry,
    )
    .await?;

    Ok(Json(ImageContentsResponse { image_contents }))
}

/// GET /{town_id}/interactables
#[instrument(skip_all, fields(town_id = %town_id))]
async fn get_town_interactables(
    State(state): State<AppState>,
    Path(town_id): Path<String>,
    SessionToken(session_token): SessionToken,
) -> Result<Json<Vec<InteractableModel>>, ApiError> {
    let interactables =
        query_handlers::get_town_interactables(&town_id, &session_token, &state.registry).await?;

    Ok(Json(interactables))
}

/// POST /{town_id}/conversation-areas
#[instrument(skip_all, fields(town_id = %town_id))]
async fn create_conversation_area(
    State(state): State<AppState>,
    Path(town_id): Path<String>,
    SessionToken(session_token): SessionToken,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let model: ConversationAreaModel = decode_model(
        body,
        &town_id,
        &session_token,
        AreaType::Conversation,
        &state.registry,
    )
    .await?;
    let command = commands::CreateConversationArea {
        correlation_id: Uuid::new_v4(),
        town_id,
        session_token,
        model,
    };

    info!(
        correlation_id = %command.correlation_id,
        area_id = %command.model.id,
        "handling create_conversation_area command"
    );

    command_handlers::handle_create_conversation_area(&command, &state.registry).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /{town_id}/viewing-areas
#[instrument(skip_all, fields(town_id = %town_id))]
async fn create_viewing_area(
    State(state): State<AppState>,
    Path(town_id): Path<String>,
    SessionToken(session_token): SessionToken,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let model: ViewingAreaModel = decode_model(
        body,
        &town_id,
        &session_token,
        AreaType::Viewing,
        &state.registry,
    )
    .await?;
    let command = commands::CreateViewingArea {
        correlation_id: Uuid::new_v4(),
        town_id,
        session_token,
        model,
    };

    info!(
        correlation_id = %command.correlation_id,
        area_id = %command.model.id,
        "handling create_viewing_area command"
    );

    command_handlers::handle_create_viewing_area(&command, &state.registry).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Returns the router for area operations.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{town_id}/poster-session-areas",
            post(create_or_update_poster_area),
        )
        .route(
            "/{town_id}/poster-session-areas/{area_id}/stars",
            post(increment_poster_area_stars),
        )
        .route(
            "/{town_id}/poster-session-areas/{area_id}/image-contents",
            get(get_poster_area_image_contents),
        )
        .route("/{town_id}/interactables", get(get_town_interactables))
        .route("/{town_id}/conversation-areas", post(create_conversation_area))
        .route("/{town_id}/viewing-areas", post(create_viewing_area))
}
