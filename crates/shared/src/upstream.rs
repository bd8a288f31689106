use reqwest::{Response, StatusCode};
use thiserror::Error;

const MAX_BODY_CHARS: usize = 500;

/// Failure talking to one of the services we depend on.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{service} rejected the request as unauthorized")]
    Unauthorized { service: &'static str },

    #[error("{service} returned {status}: {body}")]
    Status {
        service: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("{service} response is missing `{field}`")]
    MissingField {
        service: &'static str,
        field: &'static str,
    },

    #[error("{service} request failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl UpstreamError {
    pub fn transport(service: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| UpstreamError::Transport { service, source }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, UpstreamError::Unauthorized { .. })
    }
}

/// Pass 2xx responses through; turn everything else into an [`UpstreamError`]
/// carrying (a bounded slice of) the response body.
pub async fn ensure_success(
    service: &'static str,
    response: Response,
) -> Result<Response, UpstreamError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(UpstreamError::Unauthorized { service });
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    Err(UpstreamError::Status {
        service,
        status,
        body: truncate(&body),
    })
}

fn truncate(body: &str) -> String {
    let count = body.chars().count();
    if count <= MAX_BODY_CHARS {
        return body.to_string();
    }
    let head: String = body.chars().take(MAX_BODY_CHARS).collect();
    format!("{}... ({} chars total)", head, count)
}
