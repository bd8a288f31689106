use std::time::{Duration, Instant};

use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use campus_shared::{ensure_success, UpstreamError};

const SERVICE: &str = "token endpoint";

/// Refresh this long before the advertised expiry.
const EXPIRY_SKEW: Duration = Duration::from_secs(30);

/// Password-grant credentials for the resource API.
#[derive(Clone)]
pub struct Credentials {
    pub token_url: String,
    pub username: String,
    pub password: String,
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token_url", &self.token_url)
            .field("username", &self.username)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct BearerToken {
    value: String,
    expires_at: Option<Instant>,
}

impl BearerToken {
    pub fn new(value: impl Into<String>, expires_in: Option<Duration>) -> Self {
        Self {
            value: value.into(),
            expires_at: expires_in.map(|ttl| Instant::now() + ttl.saturating_sub(EXPIRY_SKEW)),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Tokens without an advertised lifetime are trusted until the API rejects them.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<u64>,
}

/// Hands out bearer tokens, fetching a new one when none is cached or the
/// cached one has expired.
pub struct TokenProvider {
    client: Client,
    credentials: Credentials,
    cached: Mutex<Option<BearerToken>>,
}

impl TokenProvider {
    pub fn new(client: Client, credentials: Credentials) -> Self {
        Self {
            client,
            credentials,
            cached: Mutex::new(None),
        }
    }

    pub async fn fetch_token(&self) -> Result<BearerToken, UpstreamError> {
        let form = [
            ("grant_type", "password"),
            ("username", self.credentials.username.as_str()),
            ("password", self.credentials.password.as_str()),
        ];

        let response = self
            .client
            .post(&self.credentials.token_url)
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
            .form(&form)
            .send()
            .await
            .map_err(UpstreamError::transport(SERVICE))?;

        let response = ensure_success(SERVICE, response).await?;
        let body = response
            .json::<TokenResponse>()
            .await
            .map_err(UpstreamError::transport(SERVICE))?;

        let access_token = body
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or(UpstreamError::MissingField {
                service: SERVICE,
                field: "access_token",
            })?;

        debug!(expires_in = ?body.expires_in, "Fetched access token");
        Ok(BearerToken::new(
            access_token,
            body.expires_in.map(Duration::from_secs),
        ))
    }

    /// Current token value. The lock is held across a refresh so concurrent
    /// callers wait for one fetch instead of each starting their own.
    pub async fn bearer(&self) -> Result<String, UpstreamError> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref().filter(|t| !t.is_expired()) {
            return Ok(token.value().to_string());
        }

        if cached.is_some() {
            info!("Access token expired, re-authenticating");
        }
        let token = self.fetch_token().await?;
        let value = token.value().to_string();
        *cached = Some(token);
        Ok(value)
    }

    pub async fn invalidate(&self) {
        self.cached.lock().await.take();
    }
}
