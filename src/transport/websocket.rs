//! WebSocket-backed [`Transport`].

use std::collections::HashMap;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::generate_key;
use tokio_tungstenite::tungstenite::http::header::{HeaderName, HeaderValue};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, instrument, warn};

use super::Transport;
use crate::error::CdpError;

/// A [`Transport`] backed by a single WebSocket connection.
pub struct WebSocketTransport {
    stream: WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
}

impl WebSocketTransport {
    /// Open a WebSocket connection to `ws_url`, with optional upgrade
    /// headers and connect timeout.
    ///
    /// # Errors
    ///
    /// Returns [`CdpError::InvalidUrl`] if `ws_url` cannot be turned into a
    /// client request, [`CdpError::ConnectionTimeout`] if the handshake does
    /// not complete within `timeout`, or [`CdpError::ConnectionFailed`] for
    /// any other handshake failure.
    #[instrument(level = "info", skip(headers), fields(ws_url = %ws_url))]
    pub async fn connect(
        ws_url: &str,
        headers: &HashMap<String, String>,
        timeout: Duration,
    ) -> Result<Self, CdpError> {
        info!("opening WebSocket transport");
        let mut request = ws_url
            .into_client_request()
            .map_err(|e| CdpError::InvalidUrl(format!("{ws_url}: {e}")))?;

        for (name, value) in headers {
            let header_name = HeaderName::try_from(name.as_str())
                .map_err(|e| CdpError::InvalidUrl(format!("bad header name {name}: {e}")))?;
            let header_value = HeaderValue::try_from(value.as_str())
                .map_err(|e| CdpError::InvalidUrl(format!("bad header value for {name}: {e}")))?;
            request.headers_mut().insert(header_name, header_value);
        }
        // Ensure the upgrade key survives our header overrides.
        request
            .headers_mut()
            .entry("Sec-WebSocket-Key")
            .or_insert_with(|| HeaderValue::from_str(&generate_key()).unwrap());

        let connect_fut = tokio_tungstenite::connect_async(request);
        let (stream, response) = tokio::time::timeout(timeout, connect_fut)
            .await
            .map_err(|_| CdpError::ConnectionTimeout(timeout))?
            .map_err(CdpError::from)?;

        debug!(status = %response.status(), "WebSocket handshake complete");
        Ok(Self { stream })
    }
}

#[async_trait::async_trait]
impl Transport for WebSocketTransport {
    async fn send(&mut self, frame: String) -> Result<(), CdpError> {
        self.stream
            .send(Message::Text(frame.into()))
            .await
            .map_err(CdpError::from)
    }

    async fn receive(&mut self) -> Result<Option<String>, CdpError> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return Ok(Some(text.to_string())),
                Some(Ok(Message::Close(frame))) => {
                    info!(?frame, "WebSocket closed by remote");
                    return Ok(None);
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    warn!(error = %e, "WebSocket transport error");
                    return Err(CdpError::from(e));
                }
                None => return Ok(None),
            }
        }
    }

    async fn close(&mut self) -> Result<(), CdpError> {
        match self.stream.close(None).await {
            Ok(())
            | Err(tokio_tungstenite::tungstenite::Error::ConnectionClosed)
            | Err(tokio_tungstenite::tungstenite::Error::AlreadyClosed) => Ok(()),
            Err(e) => Err(CdpError::from(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_websocket_transport_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<WebSocketTransport>();
    }
}
