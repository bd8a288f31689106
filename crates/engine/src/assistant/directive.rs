use serde::Deserialize;
use serde_json::Value;

use crate::resources::ResourceKind;

/// Ids the model may attach to a resource request. Blank ids count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DirectiveParams {
    #[serde(default)]
    pub school_uuid: Option<String>,
    #[serde(default)]
    pub room_uuid: Option<String>,
    #[serde(default)]
    pub sensor_uuid: Option<String>,
}

impl DirectiveParams {
    pub fn get(&self, param: &str) -> Option<&str> {
        let value = match param {
            "school_uuid" => self.school_uuid.as_deref(),
            "room_uuid" => self.room_uuid.as_deref(),
            "sensor_uuid" => self.sensor_uuid.as_deref(),
            _ => None,
        };
        value.map(str::trim).filter(|v| !v.is_empty())
    }
}

/// What the model asked for in its first reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// The reply is an answer in its own right.
    None,
    FetchResource {
        kind: ResourceKind,
        params: DirectiveParams,
    },
    /// A well-formed request for a resource type we do not serve.
    Unsupported { api_type: String },
}

impl Directive {
    /// Never fails: anything that is not a JSON object with `needsAPI: true`
    /// and an `apiType` is a plain answer. A non-string `apiType` is reported
    /// back as unsupported, in its JSON form.
    pub fn parse(reply: &str) -> Self {
        let Ok(value) = serde_json::from_str::<Value>(strip_code_fence(reply.trim())) else {
            return Directive::None;
        };
        let Some(object) = value.as_object() else {
            return Directive::None;
        };
        if object.get("needsAPI").and_then(Value::as_bool) != Some(true) {
            return Directive::None;
        }
        let api_type = match object.get("apiType") {
            Some(Value::String(api_type)) => api_type,
            None | Some(Value::Null) => return Directive::None,
            Some(other) => {
                return Directive::Unsupported {
                    api_type: other.to_string(),
                }
            }
        };

        let params = object
            .get("params")
            .cloned()
            .and_then(|p| serde_json::from_value::<DirectiveParams>(p).ok())
            .unwrap_or_default();

        match ResourceKind::from_api_type(api_type.trim()) {
            Some(kind) => Directive::FetchResource { kind, params },
            None => Directive::Unsupported {
                api_type: api_type.to_string(),
            },
        }
    }
}

/// Models like to wrap JSON in ```json fences even when told not to.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return text;
    };
    let body = body.strip_prefix("json").unwrap_or(body);
    body.trim()
}
