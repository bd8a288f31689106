use anyhow::{anyhow, Result};
use futures_util::future::BoxFuture;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, warn};

use campus_shared::{ensure_success, UpstreamError};

use super::auth::{Credentials, TokenProvider};
use super::ResourceApi;

const SERVICE: &str = "resource API";

#[derive(Debug, Clone)]
pub struct ResourceConfig {
    pub api_url: Url,
    pub credentials: Credentials,
}

impl ResourceConfig {
    pub fn new(api_url: &str, credentials: Credentials) -> Result<Self> {
        let api_url = Url::parse(api_url).map_err(|e| anyhow!("API_URL is not a valid URL: {}", e))?;
        if api_url.cannot_be_a_base() {
            return Err(anyhow!("API_URL must be an http(s) base URL, got {}", api_url));
        }
        Ok(Self { api_url, credentials })
    }
}

/// Bearer-authenticated client for the school/room/sensor hierarchy.
pub struct ResourceClient {
    client: Client,
    api_url: Url,
    tokens: TokenProvider,
}

impl ResourceClient {
    pub fn new(config: ResourceConfig) -> Self {
        let client = Client::new();
        Self {
            tokens: TokenProvider::new(client.clone(), config.credentials),
            client,
            api_url: config.api_url,
        }
    }

    /// Fetch the first token up front so bad credentials surface at startup.
    pub async fn authenticate(&self) -> Result<()> {
        self.tokens.bearer().await?;
        Ok(())
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn try_get(&self, url: &Url) -> Result<Value, UpstreamError> {
        let token = self.tokens.bearer().await?;

        let response = self
            .client
            .get(url.clone())
            .bearer_auth(token)
            .send()
            .await
            .map_err(UpstreamError::transport(SERVICE))?;

        ensure_success(SERVICE, response)
            .await?
            .json::<Value>()
            .await
            .map_err(UpstreamError::transport(SERVICE))
    }

    /// GET with a single re-authentication when the API rejects our token.
    async fn get_json(&self, segments: &[&str]) -> Result<Value> {
        let url = self.endpoint(segments);
        debug!(%url, "Fetching resource");

        match self.try_get(&url).await {
            Err(UpstreamError::Unauthorized { service: SERVICE }) => {
                warn!(%url, "Resource API rejected the access token, re-authenticating");
                self.tokens.invalidate().await;
                Ok(self.try_get(&url).await?)
            }
            other => Ok(other?),
        }
    }

    pub async fn get_schools(&self) -> Result<Value> {
        self.get_json(&["group", "main"]).await
    }

    pub async fn get_school_rooms(&self, school_uuid: &str) -> Result<Value> {
        self.get_json(&["group", school_uuid, "subgroup", "3"]).await
    }

    pub async fn get_room_sensors(&self, room_uuid: &str) -> Result<Value> {
        self.get_json(&["group", room_uuid, "resource"]).await
    }

    pub async fn get_sensor_latest_value(&self, sensor_uuid: &str) -> Result<Value> {
        self.get_json(&["resource", sensor_uuid, "latest"]).await
    }
}

impl ResourceApi for ResourceClient {
    fn fetch_schools(&self) -> BoxFuture<'_, Result<Value>> {
        Box::pin(self.get_schools())
    }

    fn fetch_rooms<'a>(&'a self, school_uuid: &'a str) -> BoxFuture<'a, Result<Value>> {
        Box::pin(self.get_school_rooms(school_uuid))
    }

    fn fetch_sensors<'a>(&'a self, room_uuid: &'a str) -> BoxFuture<'a, Result<Value>> {
        Box::pin(self.get_room_sensors(room_uuid))
    }

    fn fetch_sensor_value<'a>(&'a self, sensor_uuid: &'a str) -> BoxFuture<'a, Result<Value>> {
        Box::pin(self.get_sensor_latest_value(sensor_uuid))
    }
}
