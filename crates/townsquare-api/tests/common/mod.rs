//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;
use townsquare_areas::domain::geometry::TownMap;
use townsquare_test_support::FixedClock;
use townsquare_towns::application::command_handlers::{self, JoinedTown};
use townsquare_towns::domain::commands::JoinTown;
use townsquare_towns::registry::TownRegistry;
use uuid::Uuid;

use townsquare_api::routes;
use townsquare_api::routes::areas::SESSION_TOKEN_HEADER;
use townsquare_api::state::AppState;

/// Map used across all integration tests: one area of each kind plus a
/// non-area object.
pub const TEST_MAP: &str = r#"{
    "objects": [
        { "name": "P1", "type": "PosterSessionArea", "x": 0, "y": 0, "width": 100, "height": 100 },
        { "name": "C1", "type": "ConversationArea", "x": 200, "y": 0, "width": 100, "height": 100 },
        { "name": "V1", "type": "ViewingArea", "x": 400, "y": 0, "width": 100, "height": 100 },
        { "name": "Spawn", "type": "Spawn", "x": 50, "y": 300 }
    ]
}"#;

/// Build app state with a fixed clock and the test map.
pub fn build_test_state() -> AppState {
    let registry = Arc::new(TownRegistry::new(Arc::new(FixedClock::epoch())));
    let map = TownMap::from_json(TEST_MAP).unwrap();
    AppState::new(registry, Arc::new(map))
}

/// Build the full app router over `state`. Uses the same route structure as
/// `main.rs`.
pub fn build_test_app(state: AppState) -> Router {
    routes::router().with_state(state)
}

/// Create a town named `name` and return its id.
pub async fn create_town(state: &AppState, name: &str) -> String {
    state
        .registry
        .create_town(name, &state.town_map)
        .await
        .unwrap()
        .to_string()
}

/// Join `town_id` as `user_name`, as a WebSocket connection would.
pub async fn join(state: &AppState, town_id: &str, user_name: &str) -> JoinedTown {
    command_handlers::handle_join_town(
        &JoinTown {
            correlation_id: Uuid::new_v4(),
            town_id: town_id.to_owned(),
            user_name: user_name.to_owned(),
        },
        &state.registry,
    )
    .await
    .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// Send a POST request with a JSON body and an optional session token.
pub async fn post_json(
    app: Router,
    uri: &str,
    token: Option<&str>,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header(SESSION_TOKEN_HEADER, token);
    }
    let request = builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a GET request with an optional session token.
pub async fn get_json(app: Router, uri: &str, token: Option<&str>) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(SESSION_TOKEN_HEADER, token);
    }
    let request = builder.body(Body::empty()).unwrap();

    send(app, request).await
}
