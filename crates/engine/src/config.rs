use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{anyhow, Result};

use campus_shared::EnvReader;

use crate::llm::anthropic::{self, AnthropicConfig};
use crate::resources::{Credentials, ResourceConfig};
use crate::session::DEFAULT_IDLE_TTL;

pub const DEFAULT_SECRET_KEY: &str = "dev-secret-key";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

/// Variables that must be present for the service to start.
pub const REQUIRED_VARS: &[&str] = &[
    "API_USERNAME",
    "API_PASSWORD",
    "CLIENT_ID",
    "CLIENT_SECRET",
    "TOKEN_URL",
    "API_URL",
    "ANTHROPIC_API_KEY",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub resources: ResourceConfig,
    pub anthropic: AnthropicConfig,
    pub secret_key: String,
    pub session_idle_ttl: Duration,
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_reader(EnvReader::new())
    }

    pub fn from_reader<F>(mut env: EnvReader<F>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let username = env.required("API_USERNAME");
        let password = env.required("API_PASSWORD");
        let client_id = env.required("CLIENT_ID");
        let client_secret = env.required("CLIENT_SECRET");
        let token_url = env.required("TOKEN_URL");
        let api_url = env.required("API_URL");
        let api_key = env.required("ANTHROPIC_API_KEY");

        let secret_key = env.or_default("SECRET_KEY", DEFAULT_SECRET_KEY);
        let model = env.or_default("ANTHROPIC_MODEL", anthropic::DEFAULT_MODEL);
        let base_url = env.or_default("ANTHROPIC_BASE_URL", anthropic::DEFAULT_BASE_URL);
        let max_tokens = env.parse_or("ANTHROPIC_MAX_TOKENS", anthropic::DEFAULT_MAX_TOKENS)?;
        let session_idle_secs = env.parse_or("SESSION_IDLE_SECS", DEFAULT_IDLE_TTL.as_secs())?;
        let bind_addr = env
            .or_default("BIND_ADDR", DEFAULT_BIND_ADDR)
            .parse::<SocketAddr>()
            .map_err(|e| anyhow!("BIND_ADDR is not a socket address: {}", e))?;

        env.finish()?;

        let credentials = Credentials {
            token_url,
            username,
            password,
            client_id,
            client_secret,
        };

        Ok(Self {
            resources: ResourceConfig::new(&api_url, credentials)?,
            anthropic: AnthropicConfig {
                api_key,
                model,
                base_url,
                max_tokens,
            },
            secret_key,
            session_idle_ttl: Duration::from_secs(session_idle_secs),
            bind_addr,
        })
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }
}
