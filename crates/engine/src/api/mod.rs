pub mod routes;
pub mod handlers;
pub mod server;
pub mod types;
mod middleware;

use std::sync::Arc;

use crate::assistant::Assistant;
use crate::session::SessionStore;

pub use routes::create_router;
pub use server::start_server;

/// Shared state behind every handler.
#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<Assistant>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(assistant: Assistant, sessions: SessionStore) -> Self {
        Self {
            assistant: Arc::new(assistant),
            sessions: Arc::new(sessions),
        }
    }
}
