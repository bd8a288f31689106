use anyhow::Result;
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::resources::ResourceKind;

const PREAMBLE: &str = "You are a helpful assistant for a school IoT API.";

/// First-phase instructions: answer directly or ask for data in a fixed JSON shape.
pub static INTENT_PROMPT: Lazy<String> = Lazy::new(|| {
    let api_types = ResourceKind::all()
        .iter()
        .map(|kind| kind.api_type())
        .collect::<Vec<_>>()
        .join("|");

    let mut prompt = format!(
        "{PREAMBLE}\n\n\
         If the user asks for schools, rooms, sensors, or sensor values, respond with ONLY a JSON object in this format:\n\
         {{\n  \"needsAPI\": true,\n  \"apiType\": \"{api_types}\",\n  \
         \"params\": {{\"school_uuid\": \"...\", \"room_uuid\": \"...\", \"sensor_uuid\": \"...\"}}\n}}\n\n\
         Available data:\n"
    );

    for kind in ResourceKind::all() {
        match kind.requirement() {
            Some(req) => prompt.push_str(&format!(
                "- {}: {} (requires {})\n",
                kind.api_type(),
                kind.description(),
                req.param
            )),
            None => prompt.push_str(&format!(
                "- {}: {} (no parameters)\n",
                kind.api_type(),
                kind.description()
            )),
        }
    }

    prompt.push_str("\nIf no API is needed, respond normally with helpful text.");
    prompt
});

/// Second-phase instructions: present fetched data as readable text.
pub fn formatting_prompt(user_message: &str, data: &Value) -> Result<String> {
    let data = serde_json::to_string_pretty(data)?;
    Ok(format!(
        "{PREAMBLE}\n\n\
         The user asked: \"{user_message}\"\n\n\
         Here is the API data you requested:\n{data}\n\n\
         Please present this data in a clear, well-formatted way. Use tables, lists, and markdown \
         formatting to make it easy to read. Do NOT return JSON - return formatted text."
    ))
}
