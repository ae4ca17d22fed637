use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use thiserror::Error;
use url::Url;
use uuid::Uuid;

use crate::config::config;
use crate::session::{ActorKind, ImpersonationLevel};

/// Tenant scope header honored by the platform API.
pub const DOMAIN_HEADER: &str = "X-Relay-Domain";
/// Per-request correlation id, echoed back in API error responses.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid API base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },
}

/// Credential attached to outgoing requests: the bearer token plus the
/// tenant domain scope, when the acting identity has one.
#[derive(Debug, Clone)]
pub struct Credential {
    pub token: String,
    pub domain: Option<String>,
}

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            domain: None,
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }
}

impl From<&ImpersonationLevel> for Credential {
    fn from(level: &ImpersonationLevel) -> Self {
        Self {
            token: level.token.clone(),
            domain: level.domain.clone(),
        }
    }
}

/// Identity echo from the API for a presented credential.
#[derive(Debug, Clone, Deserialize)]
pub struct WhoamiResponse {
    #[serde(rename = "type")]
    pub kind: ActorKind,
    pub name: String,
    pub domain: Option<String>,
}

pub struct ApiClient {
    base: Url,
    http: Client,
}

impl ApiClient {
    /// Client against the configured API endpoint.
    pub fn from_config() -> Result<Self, ClientError> {
        let cfg = config();
        Self::new(
            &cfg.api.base_url,
            Duration::from_secs(cfg.api.request_timeout_secs),
        )
    }

    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base = Url::parse(base_url).map_err(|source| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("relay-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { base, http })
    }

    /// Ask the API who the supplied credential authenticates as.
    pub async fn whoami(&self, credential: &Credential) -> Result<WhoamiResponse, ClientError> {
        let response = self.authed_get("/v1/whoami", credential).send().await?;
        Self::parse(response).await
    }

    /// Reachability check. An unreachable or unhealthy API is an answer
    /// here, not an error.
    pub async fn ping(&self) -> bool {
        match self.http.get(self.request_url("/health")).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn authed_get(&self, path: &str, credential: &Credential) -> RequestBuilder {
        let mut request = self
            .http
            .get(self.request_url(path))
            .bearer_auth(&credential.token)
            .header(REQUEST_ID_HEADER, Uuid::new_v4().to_string());

        if let Some(domain) = &credential.domain {
            request = request.header(DOMAIN_HEADER, domain);
        }

        request
    }

    fn request_url(&self, path: &str) -> String {
        format!("{}{}", self.base.as_str().trim_end_matches('/'), path)
    }

    async fn parse<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}
