use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use gpctl_profiles::SecretToken;
use gpctl_utils::GpError;
use gpctl_utils::error::ApiError;
use gpctl_utils::redaction::redact;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// Upper bound on connection setup, independent of the request timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Put => write!(f, "PUT"),
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Put => Self::PUT,
        }
    }
}

/// One outbound call, relative to the base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    #[must_use]
    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Put,
            path: path.into(),
            body: Some(body),
        }
    }
}

/// Raw response; status interpretation is left to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub retry_after_secs: Option<u64>,
    pub body: String,
}

impl ApiResponse {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Something that can deliver an [`ApiRequest`]
#[async_trait]
pub trait ApiTransport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, GpError>;
}

/// Bearer-authenticated HTTPS transport.
///
/// Performs exactly one attempt per request. Timeouts surface as
/// `TransportTimeout`; other failures are redacted before they are reported.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    token: SecretToken,
    timeout: Duration,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("token", &self.token)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    pub fn new(
        base_url: impl Into<String>,
        token: SecretToken,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .timeout(timeout)
            .user_agent(concat!("gpctl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Transport(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            timeout,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn transport_error(&self, path: &str, error: &reqwest::Error) -> ApiError {
        if error.is_timeout() {
            ApiError::TransportTimeout {
                endpoint: path.to_string(),
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            ApiError::Transport(redact(&format!("{path}: {error}")))
        }
    }
}

#[async_trait]
impl ApiTransport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, GpError> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!(method = %request.method, endpoint = %request.path, "Sending API request");

        let mut builder = self
            .client
            .request(request.method.into(), &url)
            .bearer_auth(self.token.expose())
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| self.transport_error(&request.path, &e))?;

        let status = response.status().as_u16();
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok());
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(&request.path, &e))?;

        debug!(endpoint = %request.path, status, "API response received");
        Ok(ApiResponse {
            status,
            retry_after_secs,
            body,
        })
    }
}
