use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use super::{handlers, middleware::attach_session, AppState};

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/chat", post(handlers::handle_chat))
        .route("/api/clear", post(handlers::handle_clear))
        .route_layer(middleware::from_fn_with_state(state.clone(), attach_session));

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health_check))
        .merge(api)
        .with_state(state)
}
