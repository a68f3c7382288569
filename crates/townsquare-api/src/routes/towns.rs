//! Routes for creating and listing towns.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Json, Router, routing::get};
use serde::{Deserialize, Serialize};
use townsquare_towns::registry::TownSummary;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTownRequest {
    /// Display name for the new town.
    pub friendly_name: String,
}

/// Response body for POST /.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTownResponse {
    /// Identifier of the created town.
    pub town_id: Uuid,
}

/// GET /
async fn list_towns(State(state): State<AppState>) -> Json<Vec<TownSummary>> {
    Json(state.registry.list_towns().await)
}

/// POST /
#[instrument(skip_all, fields(friendly_name = %request.friendly_name))]
async fn create_town(
    State(state): State<AppState>,
    Json(request): Json<CreateTownRequest>,
) -> Result<(StatusCode, Json<CreateTownResponse>), ApiError> {
    let town_id = state
        .registry
        .create_town(&request.friendly_name, &state.town_map)
        .await?;

    info!(%town_id, "handled create_town");

    Ok((StatusCode::CREATED, Json(CreateTownResponse { town_id })))
}

/// Returns the router for town management.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_towns).post(create_town))
}
