//! `RouteService` backed by the routing server's `/api/route` endpoint.
//!
//! [`HttpRouteService`] posts the selected point and destination as JSON and
//! turns the answer into a [`RoutePath`]. Every failure is mapped onto
//! [`RouteError`] so the controller never sees a `reqwest` type.

use std::time::Duration;

use async_trait::async_trait;
use medroute_core::{RouteError, RoutePath, RouteRequest, RouteService};
use reqwest::{Client, StatusCode, Url};

use super::wire::{ErrorBody, RouteResponse};

/// Error type for [`HttpRouteService`] construction failures.
#[derive(Debug)]
pub enum ProviderBuildError {
    /// The base URL does not form a valid endpoint URL.
    InvalidBaseUrl {
        /// The rejected base URL.
        base_url: String,
        /// Parser failure.
        source: url::ParseError,
    },
    /// Failed to build the HTTP client.
    HttpClient(reqwest::Error),
}

impl std::fmt::Display for ProviderBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBaseUrl { base_url, source } => {
                write!(f, "invalid routing service URL {base_url:?}: {source}")
            }
            Self::HttpClient(err) => write!(f, "failed to build HTTP client: {err}"),
        }
    }
}

impl std::error::Error for ProviderBuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidBaseUrl { source, .. } => Some(source),
            Self::HttpClient(err) => Some(err),
        }
    }
}

/// Default user agent for route requests.
pub const DEFAULT_USER_AGENT: &str = "medroute/0.1";

/// Default routing server address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ROUTE_PATH: &str = "api/route";

/// Configuration for [`HttpRouteService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRouteServiceConfig {
    /// Base URL of the routing server (e.g., `"http://localhost:5000"`).
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Ignore proxy settings from the environment.
    pub bypass_proxy: bool,
}

impl Default for HttpRouteServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            bypass_proxy: false,
        }
    }
}

impl HttpRouteServiceConfig {
    /// Create a new configuration with the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Connect directly, ignoring `HTTP_PROXY` and friends.
    #[must_use]
    pub fn with_bypass_proxy(mut self, bypass: bool) -> Self {
        self.bypass_proxy = bypass;
        self
    }

    /// Resolve the route endpoint under `base_url`.
    fn endpoint(&self) -> Result<Url, ProviderBuildError> {
        let joined = format!("{}/{ROUTE_PATH}", self.base_url.trim_end_matches('/'));
        Url::parse(&joined).map_err(|source| ProviderBuildError::InvalidBaseUrl {
            base_url: self.base_url.clone(),
            source,
        })
    }
}

/// HTTP routing service speaking the `/api/route` JSON protocol.
///
/// Requests are never retried. The configured timeout covers connecting and
/// reading the whole answer.
#[derive(Debug, Clone)]
pub struct HttpRouteService {
    client: Client,
    endpoint: Url,
    config: HttpRouteServiceConfig,
}

impl HttpRouteService {
    /// Create a service with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client fails to
    /// build.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpRouteServiceConfig::new(base_url))
    }

    /// Create a service with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client fails to
    /// build.
    pub fn with_config(config: HttpRouteServiceConfig) -> Result<Self, ProviderBuildError> {
        let endpoint = config.endpoint()?;
        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout);
        if config.bypass_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build().map_err(ProviderBuildError::HttpClient)?;
        Ok(Self {
            client,
            endpoint,
            config,
        })
    }

    /// Full URL route requests are posted to.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &HttpRouteServiceConfig {
        &self.config
    }

    async fn post_route(&self, request: &RouteRequest) -> Result<RoutePath, RouteError> {
        log::debug!(
            "requesting route to {} from {}",
            request.hospital,
            self.endpoint
        );
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await;
            return Err(http_failure(
                &self.endpoint,
                status,
                body.as_deref().map_err(ToString::to_string),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| self.convert_reqwest_error(&err))?;
        let parsed: RouteResponse =
            serde_json::from_slice(&body).map_err(|err| RouteError::Protocol {
                message: format!("malformed route response: {err}"),
            })?;
        parsed.into_route_path()
    }

    /// Convert a reqwest error to a `RouteError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error) -> RouteError {
        let url = self.endpoint.to_string();
        if error.is_timeout() {
            return RouteError::Timeout {
                url,
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return RouteError::Http {
                url,
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        RouteError::Network {
            url,
            message: error.to_string(),
        }
    }
}

#[async_trait(?Send)]
impl RouteService for HttpRouteService {
    async fn route(&self, request: &RouteRequest) -> Result<RoutePath, RouteError> {
        self.post_route(request).await
    }
}

/// Build the error for a non-2xx answer. An unreadable body falls back to
/// the status reason.
fn http_failure(endpoint: &Url, status: StatusCode, body: Result<&[u8], String>) -> RouteError {
    let message = match body {
        Ok(bytes) => failure_message(status, bytes),
        Err(err) => {
            log::debug!("failed to read error body from {endpoint}: {err}");
            failure_message(status, &[])
        }
    };
    RouteError::Http {
        url: endpoint.to_string(),
        status: status.as_u16(),
        message,
    }
}

/// Prefer the server's `{"error": ..}` text, then the status reason.
fn failure_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .map(|parsed| parsed.error)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unrecognised status")
                .to_owned()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::plain("http://routes.example.com")]
    #[case::trailing_slash("http://routes.example.com/")]
    fn endpoint_appends_route_path(#[case] base_url: &str) {
        let service = HttpRouteService::new(base_url).expect("service should build");

        assert_eq!(
            service.endpoint().as_str(),
            "http://routes.example.com/api/route"
        );
    }

    #[rstest]
    fn endpoint_keeps_base_path_prefix() {
        let service =
            HttpRouteService::new("http://example.com/medical/").expect("service should build");

        assert_eq!(
            service.endpoint().as_str(),
            "http://example.com/medical/api/route"
        );
    }

    #[rstest]
    fn invalid_base_url_is_rejected() {
        let err = HttpRouteService::new("not a url").expect_err("should fail");

        assert!(matches!(err, ProviderBuildError::InvalidBaseUrl { .. }));
        assert!(err.to_string().contains("not a url"));
    }

    #[rstest]
    fn default_config_targets_local_server() {
        let config = HttpRouteServiceConfig::default();

        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert!(!config.bypass_proxy);
    }

    #[rstest]
    fn config_builder_pattern() {
        let config = HttpRouteServiceConfig::new("http://example.com")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("test-agent/1.0")
            .with_bypass_proxy(true);

        assert_eq!(config.base_url, "http://example.com");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "test-agent/1.0");
        assert!(config.bypass_proxy);
    }

    #[rstest]
    fn unreadable_error_body_keeps_http_status() {
        let endpoint = Url::parse("http://localhost:5000/api/route").expect("valid url");

        let err = http_failure(
            &endpoint,
            StatusCode::SERVICE_UNAVAILABLE,
            Err("connection reset while reading body".to_owned()),
        );

        assert_eq!(
            err,
            RouteError::Http {
                url: "http://localhost:5000/api/route".to_owned(),
                status: 503,
                message: "Service Unavailable".to_owned(),
            }
        );
    }

    #[rstest]
    fn readable_error_body_supplies_message() {
        let endpoint = Url::parse("http://localhost:5000/api/route").expect("valid url");

        let err = http_failure(
            &endpoint,
            StatusCode::BAD_REQUEST,
            Ok(br#"{"error": "Node 99 not found"}"#.as_slice()),
        );

        assert!(matches!(
            err,
            RouteError::Http { status: 400, ref message, .. } if message == "Node 99 not found"
        ));
    }

    #[rstest]
    #[case::error_body(StatusCode::BAD_REQUEST, br#"{"error": "Node 99 not found"}"#.as_slice(), "Node 99 not found")]
    #[case::empty_error(StatusCode::BAD_REQUEST, br#"{"error": ""}"#.as_slice(), "Bad Request")]
    #[case::html_body(StatusCode::INTERNAL_SERVER_ERROR, b"<h1>oops</h1>".as_slice(), "Internal Server Error")]
    #[case::no_body(StatusCode::BAD_GATEWAY, b"".as_slice(), "Bad Gateway")]
    fn failure_message_prefers_error_body(
        #[case] status: StatusCode,
        #[case] body: &[u8],
        #[case] expected: &str,
    ) {
        assert_eq!(failure_message(status, body), expected);
    }
}
