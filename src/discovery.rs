//! HTTP discovery client: the small `/json/*` dance CDP layers over the
//! browser's debug port before any WebSocket is opened.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::error::CdpError;

/// Default timeout for HTTP discovery requests.
pub const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(30);

/// Response from the `/json/version` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserVersion {
    /// Browser name and version.
    #[serde(rename = "Browser")]
    pub browser: Option<String>,
    /// CDP protocol version, e.g. `"1.3"`.
    #[serde(rename = "Protocol-Version")]
    pub protocol_version: Option<String>,
    /// User agent string.
    #[serde(rename = "User-Agent")]
    pub user_agent: Option<String>,
    /// V8 version.
    #[serde(rename = "V8-Version")]
    pub v8_version: Option<String>,
    /// WebKit version.
    #[serde(rename = "WebKit-Version")]
    pub webkit_version: Option<String>,
    /// The WebSocket URL for a browser-level (not tab-level) CDP connection.
    #[serde(rename = "webSocketDebuggerUrl")]
    pub web_socket_debugger_url: Option<String>,
}

/// A tab (target) record as returned by `/json/list` and `/json/new`.
///
/// Treated mostly as an opaque map per spec.md section 3: only the fields
/// callers actually need are pulled out, everything else is discarded.
#[derive(Debug, Clone, Deserialize)]
pub struct TabRecord {
    /// Target id.
    pub id: String,
    /// Target type, e.g. `"page"`, `"background_page"`, `"service_worker"`.
    #[serde(rename = "type")]
    pub target_type: String,
    /// Page title at discovery time.
    pub title: Option<String>,
    /// The tab's own WebSocket debugger URL, if attachable.
    #[serde(rename = "webSocketDebuggerUrl")]
    pub web_socket_debugger_url: Option<String>,
}

/// Options governing HTTP discovery requests.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryOptions {
    /// Timeout for each HTTP request.
    pub timeout: Option<Duration>,
    /// Extra headers to send with each request.
    pub headers: HashMap<String, String>,
}

impl DiscoveryOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the HTTP timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add a header sent with every discovery request.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Merge in multiple headers at once.
    #[must_use]
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }
}

/// A client for the browser's `/json/*` HTTP surface.
#[derive(Debug)]
pub struct DiscoveryClient {
    base_url: Url,
    client: reqwest::Client,
}

impl DiscoveryClient {
    /// Build a discovery client against `endpoint_url` (e.g.
    /// `http://localhost:9222`).
    ///
    /// # Errors
    ///
    /// Returns [`CdpError::InvalidEndpointUrl`] if `endpoint_url` does not
    /// parse, or if the HTTP client cannot be constructed.
    pub fn new(endpoint_url: &str, options: &DiscoveryOptions) -> Result<Self, CdpError> {
        let base_url = Url::parse(endpoint_url)
            .map_err(|e| CdpError::InvalidEndpointUrl(format!("{endpoint_url}: {e}")))?;

        let timeout = options.timeout.unwrap_or(DEFAULT_DISCOVERY_TIMEOUT);
        let mut builder = reqwest::Client::builder().timeout(timeout);
        let mut default_headers = reqwest::header::HeaderMap::new();
        for (name, value) in &options.headers {
            let header_name = reqwest::header::HeaderName::try_from(name.as_str())
                .map_err(|e| CdpError::InvalidEndpointUrl(format!("bad header {name}: {e}")))?;
            let header_value = reqwest::header::HeaderValue::try_from(value.as_str())
                .map_err(|e| CdpError::InvalidEndpointUrl(format!("bad header {name}: {e}")))?;
            default_headers.insert(header_name, header_value);
        }
        builder = builder.default_headers(default_headers);

        let client = builder
            .build()
            .map_err(|e| CdpError::HttpRequestFailed(e.to_string()))?;

        Ok(Self { base_url, client })
    }

    fn join(&self, path: &str) -> Result<Url, CdpError> {
        self.base_url
            .join(path)
            .map_err(|e| CdpError::InvalidEndpointUrl(format!("failed to build {path}: {e}")))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, CdpError> {
        let url = self.join(path)?;
        let response = self.client.get(url.as_str()).send().await.map_err(|e| {
            if e.is_timeout() {
                CdpError::ConnectionTimeout(DEFAULT_DISCOVERY_TIMEOUT)
            } else if e.is_connect() {
                CdpError::ConnectionFailed(format!("failed to connect to {url}: {e}"))
            } else {
                CdpError::HttpRequestFailed(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(CdpError::EndpointDiscoveryFailed {
                url: url.to_string(),
                reason: format!("HTTP status {}", response.status()),
            });
        }

        response
            .json()
            .await
            .map_err(|e| CdpError::EndpointDiscoveryFailed {
                url: url.to_string(),
                reason: format!("failed to parse response: {e}"),
            })
    }

    /// `GET /json/version`.
    #[instrument(level = "info", skip(self))]
    pub async fn version_info(&self) -> Result<BrowserVersion, CdpError> {
        info!("fetching /json/version");
        self.get_json("json/version").await
    }

    /// `GET /json/list`, filtered by case-insensitive substring match on the
    /// `type` field (default `"page"`).
    #[instrument(level = "info", skip(self))]
    pub async fn list_tabs(&self, target_type: Option<&str>) -> Result<Vec<TabRecord>, CdpError> {
        let tabs: Vec<TabRecord> = self.get_json("json/list").await?;
        let filter = target_type.unwrap_or("page").to_lowercase();
        let filtered: Vec<TabRecord> = tabs
            .into_iter()
            .filter(|t| t.target_type.to_lowercase().contains(&filter))
            .collect();
        debug!(count = filtered.len(), filter = %filter, "listed tabs");
        Ok(filtered)
    }

    /// `GET /json/new[?<url>]`.
    #[instrument(level = "info", skip(self))]
    pub async fn new_tab(&self, url: Option<&str>) -> Result<TabRecord, CdpError> {
        let path = match url {
            Some(u) => format!("json/new?{u}"),
            None => "json/new".to_string(),
        };
        self.get_json(&path).await
    }

    /// `GET /json/activate/<id>`. Result is discarded on success.
    #[instrument(level = "info", skip(self))]
    pub async fn activate_tab(&self, id: &str) -> Result<(), CdpError> {
        let url = self.join(&format!("json/activate/{id}"))?;
        self.client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| CdpError::HttpRequestFailed(e.to_string()))?;
        Ok(())
    }

    /// `GET /json/close/<id>`. Errors are swallowed: the tab may already be
    /// gone, and the browser may reset the connection instead of replying.
    #[instrument(level = "info", skip(self))]
    pub async fn close_tab(&self, id: &str) {
        let Ok(url) = self.join(&format!("json/close/{id}")) else {
            return;
        };
        if let Err(e) = self.client.get(url.as_str()).send().await {
            warn!(error = %e, id, "closeTab request failed, ignoring");
        }
    }
}

/// Resolve a WebSocket URL from an HTTP(S) endpoint or pass a `ws`/`wss`
/// URL through unchanged.
///
/// Used by [`crate::session::Session::connect`] for the explicit-endpoint
/// resolution step.
pub async fn discover_websocket_url(
    endpoint_url: &str,
    options: &DiscoveryOptions,
) -> Result<String, CdpError> {
    let parsed = Url::parse(endpoint_url)
        .map_err(|e| CdpError::InvalidEndpointUrl(format!("{endpoint_url}: {e}")))?;

    if parsed.scheme() == "ws" || parsed.scheme() == "wss" {
        return Ok(endpoint_url.to_string());
    }
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(CdpError::InvalidEndpointUrl(format!(
            "expected http, https, ws, or wss scheme, got: {}",
            parsed.scheme()
        )));
    }

    let client = DiscoveryClient::new(endpoint_url, options)?;
    let version = client.version_info().await?;
    version
        .web_socket_debugger_url
        .ok_or_else(|| CdpError::EndpointDiscoveryFailed {
            url: endpoint_url.to_string(),
            reason: "response missing webSocketDebuggerUrl field".to_string(),
        })
}

#[cfg(test)]
mod tests;
