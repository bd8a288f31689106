pub mod anthropic;

use anyhow::Result;
use futures_util::future::BoxFuture;

use crate::Message;

pub use anthropic::{AnthropicConfig, AnthropicModel};

/// One round trip to a hosted chat model.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub messages: Vec<Message>,
}

/// Anything that can turn a system prompt plus message list into reply text.
pub trait ChatModel: Send + Sync {
    fn complete<'a>(&'a self, request: &'a CompletionRequest) -> BoxFuture<'a, Result<String>>;
}
