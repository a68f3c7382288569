//! WebSocket connection to a town.
//!
//! A connection joins the town as a new player, receives an `initialize`
//! frame followed by every town event, may send `move` messages, and leaves
//! the town when the socket closes. A town teardown ends the event stream and
//! closes the socket.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::{Router, routing::get};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use townsquare_core::error::DomainError;
use townsquare_towns::application::command_handlers;
use townsquare_towns::domain::commands;
use townsquare_towns::domain::events::TownSnapshot;
use townsquare_towns::registry::TownRegistry;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{ApiError, ErrorBody, classify};
use crate::state::AppState;

/// Query string for the connect route.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectQuery {
    /// Display name to join under.
    pub user_name: String,
}

/// Messages a client may send over the socket.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Enter an area, or leave every area when `interactableId` is absent.
    Move {
        /// Destination area.
        #[serde(rename = "interactableId", default)]
        interactable_id: Option<String>,
    },
}

/// Frames the server sends that are not town events.
#[derive(Debug, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum ServerFrame {
    /// The joining player's view of the town.
    Initialize(TownSnapshot),
    /// A rejected join or client message.
    Error(ErrorBody),
}

impl From<&DomainError> for ServerFrame {
    fn from(err: &DomainError) -> Self {
        let (_, error) = classify(err);
        Self::Error(ErrorBody {
            error,
            message: err.to_string(),
        })
    }
}

/// GET /{town_id}/connect
async fn connect(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(town_id): Path<String>,
    Query(query): Query<ConnectQuery>,
) -> Result<Response, ApiError> {
    state.registry.town(&town_id).await?;
    Ok(ws
        .on_upgrade(move |socket| handle_socket(socket, state, town_id, query.user_name))
        .into_response())
}

async fn handle_socket(socket: WebSocket, state: AppState, town_id: String, user_name: String) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let join = commands::JoinTown {
        correlation_id: Uuid::new_v4(),
        town_id: town_id.clone(),
        user_name,
    };
    let joined = match command_handlers::handle_join_town(&join, &state.registry).await {
        Ok(joined) => joined,
        Err(e) => {
            warn!(%town_id, error = %e, "websocket join rejected");
            if let Some(text) = encode(&ServerFrame::from(&e)) {
                let _ = ws_sender.send(Message::Text(text.into())).await;
            }
            let _ = ws_sender.close().await;
            return;
        }
    };

    let session_token = joined.snapshot.session_token.clone();
    let player_id = joined.snapshot.player_id;
    let mut events = joined.events;
    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel::<ServerFrame>();

    info!(%town_id, %player_id, "websocket connection established");

    if let Some(text) = encode(&ServerFrame::Initialize(joined.snapshot)) {
        if ws_sender.send(Message::Text(text.into())).await.is_err() {
            leave(&state.registry, &town_id, &session_token).await;
            return;
        }
    }

    let send_task = tokio::spawn(async move {
        loop {
            let text = tokio::select! {
                event = events.recv() => match event {
                    Some(event) => encode(&event),
                    None => break,
                },
                reply = reply_rx.recv() => match reply {
                    Some(reply) => encode(&reply),
                    None => break,
                },
            };
            if let Some(text) = text {
                if ws_sender.send(Message::Text(text.into())).await.is_err() {
                    return;
                }
            }
        }
        let _ = ws_sender.close().await;
    });

    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(Message::Text(text)) => {
                if let Some(reply) =
                    handle_client_message(text.as_str(), &town_id, &session_token, &state.registry)
                        .await
                {
                    if reply_tx.send(reply).is_err() {
                        break;
                    }
                }
            }
            Ok(Message::Close(_)) => {
                debug!(%player_id, "websocket closed by client");
                break;
            }
            Err(e) => {
                warn!(%player_id, error = %e, "websocket error");
                break;
            }
            Ok(_) => {}
        }
    }

    leave(&state.registry, &town_id, &session_token).await;
    send_task.abort();

    info!(%town_id, %player_id, "websocket connection terminated");
}

/// Applies one client message, returning the frame to send back, if any.
pub async fn handle_client_message(
    text: &str,
    town_id: &str,
    session_token: &str,
    registry: &TownRegistry,
) -> Option<ServerFrame> {
    let message = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => message,
        Err(e) => {
            debug!(error = %e, "unparseable client message");
            return Some(ServerFrame::from(&DomainError::Validation(format!(
                "invalid message: {e}"
            ))));
        }
    };

    match message {
        ClientMessage::Move { interactable_id } => {
            let command = commands::MovePlayer {
                correlation_id: Uuid::new_v4(),
                town_id: town_id.to_owned(),
                session_token: session_token.to_owned(),
                destination: interactable_id,
            };
            command_handlers::handle_move_player(&command, registry)
                .await
                .err()
                .map(|e| ServerFrame::from(&e))
        }
    }
}

async fn leave(registry: &TownRegistry, town_id: &str, session_token: &str) {
    let command = commands::LeaveTown {
        correlation_id: Uuid::new_v4(),
        town_id: town_id.to_owned(),
        session_token: session_token.to_owned(),
    };
    // The town may already be torn down.
    if let Err(e) = command_handlers::handle_leave_town(&command, registry).await {
        debug!(%town_id, error = %e, "leave after disconnect skipped");
    }
}

fn encode<T: Serialize>(frame: &T) -> Option<String> {
    serde_json::to_string(frame)
        .inspect_err(|e| warn!(error = %e, "failed to encode frame"))
        .ok()
}

/// Returns the router for WebSocket connections.
pub fn router() -> Router<AppState> {
    Router::new().route("/{town_id}/connect", get(connect))
}
