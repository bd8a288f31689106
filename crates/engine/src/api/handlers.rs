use axum::{
    extract::{rejection::JsonRejection, Extension, Json, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tracing::{error, warn};

use super::middleware::{CurrentSession, IssuedSession};
use super::types::*;
use super::AppState;

const INDEX_HTML: &str = include_str!("../../static/index.html");

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

pub async fn handle_chat(
    State(state): State<AppState>,
    Extension(CurrentSession(existing)): Extension<CurrentSession>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            warn!("Rejected chat request: {}", rejection.body_text());
            return error_response(StatusCode::BAD_REQUEST, "Invalid JSON");
        }
    };

    let message = req.message.trim();
    if message.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Message required");
    }

    // Sessions only start once a message is accepted
    let (session, created) = match existing {
        Some(session) => (session, false),
        None => (state.sessions.create().await, true),
    };

    let mut conversation = session.conversation.lock().await;

    let mut response = match state.assistant.process_message(&mut conversation, message).await {
        Ok(reply) => (
            StatusCode::OK,
            Json(ChatResponse {
                response: reply,
                conversation: conversation.history().to_vec(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!(session = %session.id, "Chat error: {:#}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    };

    if created {
        response.extensions_mut().insert(IssuedSession(session.id));
    }
    response
}

pub async fn handle_clear(
    State(state): State<AppState>,
    Extension(CurrentSession(existing)): Extension<CurrentSession>,
) -> Json<ClearResponse> {
    if let Some(session) = existing {
        state.sessions.clear(&session).await;
    }
    Json(ClearResponse {
        status: "cleared".to_string(),
    })
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn health_check() -> &'static str {
    "School IoT assistant is running"
}
