use super::*;

#[test]
fn test_connection_failed_error_display() {
    let err = CdpError::ConnectionFailed("connection refused".to_string());
    assert_eq!(
        err.to_string(),
        "WebSocket connection failed: connection refused"
    );
}

#[test]
fn test_connection_lost_error_display() {
    let err = CdpError::ConnectionLost;
    assert_eq!(err.to_string(), "WebSocket connection lost");
}

#[test]
fn test_send_failed_error_display() {
    let err = CdpError::SendFailed("channel closed".to_string());
    assert_eq!(err.to_string(), "failed to send CDP message: channel closed");
}

#[test]
fn test_protocol_error_display_without_data() {
    let err = CdpError::Protocol {
        code: -32601,
        message: "Method not found".to_string(),
        data: None,
    };
    assert_eq!(
        err.to_string(),
        "CDP protocol error -32601: Method not found"
    );
}

#[test]
fn test_protocol_error_display_composed_message_carries_data_and_code() {
    // The dispatcher composes `message` from error.message/data/code joined
    // by newlines before constructing this variant (spec.md section 4.F).
    let err = CdpError::Protocol {
        code: -32000,
        message: "Oops\nctx\n-32000".to_string(),
        data: Some("ctx".to_string()),
    };
    let rendered = err.to_string();
    assert!(rendered.contains("Oops"));
    assert!(rendered.contains("ctx"));
    assert!(rendered.contains("-32000"));
}

#[test]
fn test_json_error_from_serde() {
    let json_err: serde_json::Error = serde_json::from_str::<i32>("not a number").unwrap_err();
    let err: CdpError = json_err.into();
    assert!(err.to_string().starts_with("JSON error:"));
}

#[test]
fn test_timeout_error_display() {
    let err = CdpError::Timeout(Duration::from_secs(30));
    assert_eq!(err.to_string(), "response timeout after 30s");
}

#[test]
fn test_timeout_error_with_millis() {
    let err = CdpError::Timeout(Duration::from_millis(500));
    assert_eq!(err.to_string(), "response timeout after 500ms");
}

#[test]
fn test_invalid_url_error_display() {
    let err = CdpError::InvalidUrl("not-a-valid-url".to_string());
    assert_eq!(err.to_string(), "invalid WebSocket URL: not-a-valid-url");
}

#[test]
fn test_malformed_endpoint_error_display() {
    let err = CdpError::MalformedEndpoint("ws://host:1/devtools/browser/".to_string());
    assert!(err.to_string().contains("ws://host:1/devtools/browser/"));
}

#[test]
fn test_not_found_error_display() {
    let err = CdpError::NotFound("title matching /mail/".to_string());
    assert_eq!(
        err.to_string(),
        "no matching tab found: title matching /mail/"
    );
}

#[test]
fn test_missing_websocket_url_error_display() {
    let err = CdpError::MissingWebSocketUrl;
    assert_eq!(err.to_string(), "matched tab has no webSocketDebuggerUrl");
}

#[test]
fn test_not_connected_error_display() {
    assert_eq!(CdpError::NotConnected.to_string(), "not connected");
}

#[test]
fn test_disconnected_error_display() {
    assert_eq!(CdpError::Disconnected.to_string(), "disconnected");
}

#[test]
fn test_from_tungstenite_connection_closed() {
    let ws_err = tokio_tungstenite::tungstenite::Error::ConnectionClosed;
    let err: CdpError = ws_err.into();
    assert!(matches!(err, CdpError::ConnectionLost));
}

#[test]
fn test_from_tungstenite_already_closed() {
    let ws_err = tokio_tungstenite::tungstenite::Error::AlreadyClosed;
    let err: CdpError = ws_err.into();
    assert!(matches!(err, CdpError::ConnectionLost));
}

#[test]
fn test_error_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CdpError>();
}

#[test]
fn test_error_debug_format() {
    let err = CdpError::Protocol {
        code: -32600,
        message: "Invalid Request".to_string(),
        data: None,
    };
    let debug_str = format!("{err:?}");
    assert!(debug_str.contains("Protocol"));
    assert!(debug_str.contains("-32600"));
    assert!(debug_str.contains("Invalid Request"));
}
