pub mod conversation;
pub mod directive;
pub mod prompts;

use std::sync::Arc;

use anyhow::Result;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::llm::{ChatModel, CompletionRequest};
use crate::resources::{ResourceApi, ResourceKind};
use crate::Message;

pub use conversation::Conversation;
pub use directive::{Directive, DirectiveParams};

/// Prior turns sent along with each new message.
pub const CONTEXT_TURNS: usize = 4;

/// Shown in place of a model reply when the model call fails.
pub const MODEL_ERROR_REPLY: &str = "Sorry, there was an error processing your request.";

/// Two-phase chat flow: ask the model whether it needs data, fetch it if so,
/// then ask the model to present it.
pub struct Assistant {
    model: Arc<dyn ChatModel>,
    resources: Arc<dyn ResourceApi>,
    context_turns: usize,
}

impl Assistant {
    pub fn new(model: Arc<dyn ChatModel>, resources: Arc<dyn ResourceApi>) -> Self {
        Self {
            model,
            resources,
            context_turns: CONTEXT_TURNS,
        }
    }

    pub fn with_context_turns(mut self, turns: usize) -> Self {
        self.context_turns = turns;
        self
    }

    /// Answer one user message and record the exchange in `conversation`.
    pub async fn process_message(
        &self,
        conversation: &mut Conversation,
        user_message: &str,
    ) -> Result<String> {
        let mut messages = conversation.recent(self.context_turns).to_vec();
        messages.push(Message::user(user_message));

        let first_reply = self.ask(prompts::INTENT_PROMPT.clone(), &messages).await;

        let reply = match Directive::parse(&first_reply) {
            Directive::None => first_reply,
            Directive::FetchResource { kind, params } => {
                info!(api_type = kind.api_type(), "Model requested resource data");
                let data = self.fetch_external_data(kind, &params).await;
                self.present(user_message, &data, &messages).await?
            }
            Directive::Unsupported { api_type } => {
                warn!(%api_type, "Model requested an unknown resource type");
                let data = json!({ "error": format!("Unknown API type: {}", api_type) });
                self.present(user_message, &data, &messages).await?
            }
        };

        conversation.record_exchange(Message::user(user_message), Message::assistant(reply.clone()));
        Ok(reply)
    }

    /// Fetched JSON, or an `{"error": ...}` object the model can explain to the user.
    pub async fn fetch_external_data(&self, kind: ResourceKind, params: &DirectiveParams) -> Value {
        let id = match kind.requirement() {
            Some(req) => match params.get(req.param) {
                Some(id) => id,
                None => {
                    let message = kind.missing_param_message().unwrap_or_default();
                    warn!(api_type = kind.api_type(), "{}", message);
                    return json!({ "error": message });
                }
            },
            None => "",
        };

        let fetched = match kind {
            ResourceKind::Schools => self.resources.fetch_schools().await,
            ResourceKind::Rooms => self.resources.fetch_rooms(id).await,
            ResourceKind::Sensors => self.resources.fetch_sensors(id).await,
            ResourceKind::Values => self.resources.fetch_sensor_value(id).await,
        };

        fetched.unwrap_or_else(|e| {
            error!(api_type = kind.api_type(), "API fetch error: {:#}", e);
            json!({ "error": format!("Failed to fetch {}: {}", kind.api_type(), e) })
        })
    }

    async fn present(&self, user_message: &str, data: &Value, messages: &[Message]) -> Result<String> {
        let system = prompts::formatting_prompt(user_message, data)?;
        Ok(self.ask(system, messages).await)
    }

    async fn ask(&self, system: String, messages: &[Message]) -> String {
        let request = CompletionRequest {
            system,
            messages: messages.to_vec(),
        };

        match self.model.complete(&request).await {
            Ok(text) => text,
            Err(e) => {
                error!("Model API error: {:#}", e);
                MODEL_ERROR_REPLY.to_string()
            }
        }
    }
}
