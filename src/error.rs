//! CDP error types.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during CDP communication.
#[derive(Error, Debug)]
pub enum CdpError {
    /// WebSocket connection failed.
    #[error("WebSocket connection failed: {0}")]
    ConnectionFailed(String),

    /// WebSocket connection was lost during operation.
    #[error("WebSocket connection lost")]
    ConnectionLost,

    /// Failed to send a CDP message.
    #[error("failed to send CDP message: {0}")]
    SendFailed(String),

    /// CDP protocol error returned by the browser.
    ///
    /// `message` is already the final, displayable text: callers that
    /// compose this from a browser reply join `error.message`, `error.data`
    /// and `error.code` with newlines before constructing the variant (see
    /// [`crate::dispatcher`]). `data` is kept alongside for structured
    /// access and is not itself part of the `Display` output.
    #[error("CDP protocol error {code}: {message}")]
    Protocol {
        /// Browser-reported error code.
        code: i64,
        /// Browser-reported error message (already composed with `data`
        /// and `code` when raised by the dispatcher).
        message: String,
        /// Raw `error.data`, if the browser sent one.
        data: Option<String>,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Outbound request could not be serialized.
    #[error("failed to serialize request: {0}")]
    SerializationError(String),

    /// Response timeout.
    #[error("response timeout after {0:?}")]
    Timeout(Duration),

    /// Failed to parse WebSocket URL.
    #[error("invalid WebSocket URL: {0}")]
    InvalidUrl(String),

    /// Endpoint or discovery URL could not be parsed.
    #[error("invalid endpoint URL: {0}")]
    InvalidEndpointUrl(String),

    /// Explicit connect endpoint's final path segment is not a usable tab id.
    #[error("malformed endpoint, cannot extract tab id: {0}")]
    MalformedEndpoint(String),

    /// An HTTP discovery request could not be made at all.
    #[error("HTTP request failed: {0}")]
    HttpRequestFailed(String),

    /// Discovery's HTTP request timed out.
    #[error("connection timed out after {0:?}")]
    ConnectionTimeout(Duration),

    /// Discovery succeeded in reaching the browser but the response was
    /// unusable (bad status, unparseable body, missing field).
    #[error("failed to discover endpoint at {url}: {reason}")]
    EndpointDiscoveryFailed {
        /// The URL that was queried.
        url: String,
        /// Human-readable reason discovery failed.
        reason: String,
    },

    /// No tab matched the requested selector.
    #[error("no matching tab found: {0}")]
    NotFound(String),

    /// A matched tab has no `webSocketDebuggerUrl`.
    #[error("matched tab has no webSocketDebuggerUrl")]
    MissingWebSocketUrl,

    /// An operation was attempted while the session was not `Connected`.
    #[error("not connected")]
    NotConnected,

    /// The session was closed (or the transport was lost) while the
    /// operation was outstanding.
    #[error("disconnected")]
    Disconnected,
}

impl From<tokio_tungstenite::tungstenite::Error> for CdpError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        match err {
            tokio_tungstenite::tungstenite::Error::ConnectionClosed
            | tokio_tungstenite::tungstenite::Error::AlreadyClosed => Self::ConnectionLost,
            other => Self::ConnectionFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests;
