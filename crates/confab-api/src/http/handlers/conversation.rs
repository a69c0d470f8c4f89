//! Conversation HTTP handlers.
//!
//! Endpoints (all scoped to the authenticated user):
//! - GET    /api/v1/conversations        - List conversations
//! - GET    /api/v1/conversations/{id}   - Show a conversation with messages
//! - POST   /api/v1/conversations/stream - Send a message, stream the reply (SSE)
//! - DELETE /api/v1/conversations/{id}   - Delete a conversation
//!
//! SSE event types for the stream endpoint:
//! - `conversation` — initial event with `{ "conversation_id": "..." }`
//! - `text_delta`   — incremental text: `{ "text": "..." }`
//! - `error`        — generation failed: `{ "message": "..." }`
//! - `done`         — stream complete: `{}`

use std::convert::Infallible;
use std::time::{Duration, Instant};

use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use futures_util::StreamExt;
use serde::Deserialize;
use tokio_stream::Stream;
use uuid::Uuid;

use confab_types::conversation::{ConversationDetail, ConversationSummary};

use crate::http::error::AppError;
use crate::http::extractors::auth::CurrentUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Request body for the streaming send endpoint.
#[derive(Debug, Deserialize)]
pub struct StreamMessageRequest {
    /// Existing conversation id to continue; if absent, a new conversation
    /// is created for the caller.
    pub conversation_id: Option<String>,
    /// The message to send.
    pub message: String,
}

/// Parse a UUID from a path parameter, returning a 400 error on invalid format.
fn parse_uuid(s: &str) -> Result<Uuid, AppError> {
    s.parse::<Uuid>()
        .map_err(|_| AppError::Validation(format!("Invalid UUID: {s}")))
}

/// GET /api/v1/conversations - List the caller's conversations.
pub async fn list_conversations(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Result<ApiResponse<Vec<ConversationSummary>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let conversations = state
        .conversation_service
        .list_conversations(&user_id)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;

    Ok(ApiResponse::success(conversations, request_id, elapsed)
        .with_link("self", "/api/v1/conversations"))
}

/// GET /api/v1/conversations/{id} - Show a conversation with its messages.
pub async fn show_conversation(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(conversation_id): Path<String>,
) -> Result<ApiResponse<ConversationDetail>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let cid = parse_uuid(&conversation_id)?;
    let detail = state
        .conversation_service
        .show_conversation(&user_id, &cid)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;

    Ok(ApiResponse::success(detail, request_id, elapsed)
        .with_link("self", &format!("/api/v1/conversations/{cid}"))
        .with_link("collection", "/api/v1/conversations"))
}

/// POST /api/v1/conversations/stream - Send a message and stream the reply.
///
/// Authorization and the text bound are checked before the stream opens, so
/// Forbidden/Validation surface as plain error responses rather than SSE
/// events. Message persistence is the collaborator's side effect; this
/// handler only relays chunks.
pub async fn stream_message(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(body): Json<StreamMessageRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let conversation_id = body
        .conversation_id
        .as_deref()
        .map(|s| {
            s.parse::<Uuid>()
                .map_err(|_| AppError::Validation("Invalid conversation_id format".to_string()))
        })
        .transpose()?;

    let reply = state
        .conversation_service
        .send_message(user_id, conversation_id, &body.message)
        .await?;

    let conversation_id = reply.conversation_id;
    let chunks = reply.stream;

    let sse_stream = async_stream::stream! {
        let data = serde_json::json!({ "conversation_id": conversation_id.to_string() });
        yield Ok::<_, Infallible>(Event::default().event("conversation").data(data.to_string()));

        let mut chunks = std::pin::pin!(chunks);
        while let Some(chunk) = chunks.next().await {
            match chunk {
                Ok(text) => {
                    let data = serde_json::json!({ "text": text });
                    yield Ok(Event::default().event("text_delta").data(data.to_string()));
                }
                Err(e) => {
                    let data = serde_json::json!({ "message": e.to_string() });
                    yield Ok(Event::default().event("error").data(data.to_string()));
                    break;
                }
            }
        }

        yield Ok(Event::default().event("done").data("{}"));
    };

    Ok(Sse::new(sse_stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15))))
}

/// DELETE /api/v1/conversations/{id} - Delete a conversation and its messages.
pub async fn delete_conversation(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(conversation_id): Path<String>,
) -> Result<ApiResponse<serde_json::Value>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let cid = parse_uuid(&conversation_id)?;
    state
        .conversation_service
        .delete_conversation(&user_id, &cid)
        .await?;

    let elapsed = start.elapsed().as_millis() as u64;

    Ok(
        ApiResponse::success(serde_json::json!({ "deleted": true }), request_id, elapsed)
            .with_link("collection", "/api/v1/conversations"),
    )
}
