use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::{header, HeaderMap, HeaderValue};
use tracing::warn;
use uuid::Uuid;

use super::AppState;
use crate::session::{Session, SESSION_COOKIE};

/// The caller's live session, if its cookie named one.
#[derive(Clone)]
pub struct CurrentSession(pub Option<Session>);

/// Set on a response whose handler started a new session.
#[derive(Clone, Copy, Debug)]
pub struct IssuedSession(pub Uuid);

/// Look up the session named by the caller's cookie without creating one.
/// Handlers that start a session mark the response with [`IssuedSession`]
/// and get a `Set-Cookie` on the way out.
pub async fn attach_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let presented = cookie_value(req.headers(), SESSION_COOKIE)
        .and_then(|value| state.sessions.verify(value));
    let existing = match presented {
        Some(id) => state.sessions.lookup(id).await,
        None => None,
    };

    req.extensions_mut().insert(CurrentSession(existing));
    let mut response = next.run(req).await;

    if let Some(IssuedSession(id)) = response.extensions().get::<IssuedSession>().copied() {
        let cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            SESSION_COOKIE,
            state.sessions.sign(&id)
        );
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => warn!("Could not encode session cookie: {}", e),
        }
    }

    response
}

fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
}
