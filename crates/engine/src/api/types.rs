use serde::{Deserialize, Serialize};

use crate::Message;

// Chat endpoint
#[derive(Deserialize, Debug, Default)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ChatResponse {
    pub response: String,
    pub conversation: Vec<Message>,
}

// Clear endpoint
#[derive(Serialize, Deserialize, Debug)]
pub struct ClearResponse {
    pub status: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}
