//! HTTP and WebSocket routes
//!
//! | Path | Description |
//! |------|-------------|
//! | `GET /` | Jukebox page |
//! | `GET /library/` | Library as a JSON object |
//! | `POST /play/{name}` | Append to the playlist (poll path) |
//! | `GET /playlist/` | Playlist snapshot |
//! | `POST /push/{name}` | Publish through the hub (push path) |
//! | `GET /ws` | WebSocket subscription to the hub |
//! | `GET /stats/` | Playlist and hub statistics |
//! | `GET /sounds/*` | Static sound files |

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path as UrlPath, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::services::ServeDir;

use crate::hub::Hub;
use crate::library::Library;
use crate::playlist::{PlaylistError, Selection, SelectionLog};
use crate::stats::ServerStats;

use super::config::DeliveryMode;
use super::page;

/// Shared state passed to all request handlers
#[derive(Clone)]
pub struct AppState {
    pub library: Arc<Library>,
    pub playlist: Arc<SelectionLog>,
    pub hub: Arc<Hub>,
    pub delivery: DeliveryMode,
    pub started_at: Instant,
}

/// Build the router over the given state
pub fn router(state: AppState, sounds_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/library/", get(library))
        .route("/play/{name}", post(play))
        .route("/playlist/", get(playlist))
        .route("/push/{name}", post(push))
        .route("/ws", get(websocket))
        .route("/stats/", get(stats))
        .nest_service("/sounds", ServeDir::new(sounds_dir.as_ref()))
        .with_state(state)
}

impl IntoResponse for PlaylistError {
    fn into_response(self) -> Response {
        let status = match self {
            PlaylistError::InvalidResource(_) => StatusCode::NOT_FOUND,
        };
        let body = serde_json::json!({ "error": self.to_string() });

        (status, Json(body)).into_response()
    }
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(page::render(&state.library, state.delivery))
}

async fn library(State(state): State<AppState>) -> Json<HashMap<String, String>> {
    Json(state.library.entries().clone())
}

async fn play(
    State(state): State<AppState>,
    UrlPath(name): UrlPath<String>,
) -> Result<Json<Selection>, PlaylistError> {
    tracing::info!(resource = %name, "Requested to play");

    let selection = state.playlist.append(&name).await?;
    Ok(Json(selection))
}

async fn playlist(State(state): State<AppState>) -> Json<Vec<Selection>> {
    Json(state.playlist.snapshot().await)
}

async fn push(
    State(state): State<AppState>,
    UrlPath(name): UrlPath<String>,
) -> Result<Json<Selection>, PlaylistError> {
    tracing::info!(resource = %name, "Requested to broadcast");

    let selection = state.library.select(&name)?;
    state.hub.publish(selection.clone()).await;
    Ok(Json(selection))
}

async fn stats(State(state): State<AppState>) -> Json<ServerStats> {
    Json(ServerStats::new(
        state.started_at.elapsed(),
        state.playlist.stats().await,
        state.hub.stats().await,
    ))
}

async fn websocket(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Pump one WebSocket connection
///
/// Outbound: every selection the hub delivers, as its resource name.
/// Inbound: text frames naming a resource to publish. The subscriber is
/// unregistered however the loop ends.
async fn handle_socket(mut socket: WebSocket, state: AppState) {
    let mut subscriber = state.hub.subscribe().await;
    let id = subscriber.id();

    loop {
        tokio::select! {
            delivered = subscriber.recv() => {
                let Some(selection) = delivered else {
                    tracing::debug!(subscriber = %id, "Mailbox closed by hub");
                    break;
                };

                let frame = Message::Text(selection.resource().to_owned().into());
                if let Err(e) = socket.send(frame).await {
                    tracing::debug!(subscriber = %id, error = %e, "WebSocket write failed");
                    break;
                }
            }
            inbound = socket.recv() => match inbound {
                Some(Ok(Message::Text(text))) => {
                    let name = text.as_str().trim();
                    match state.library.select(name) {
                        Ok(selection) => {
                            state.hub.publish(selection).await;
                        }
                        Err(e) => {
                            tracing::debug!(subscriber = %id, error = %e, "Ignored play request");
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::debug!(subscriber = %id, error = %e, "WebSocket read failed");
                    break;
                }
            },
        }
    }

    state.hub.unsubscribe(id).await;
    tracing::debug!(subscriber = %id, "WebSocket closed");
}
