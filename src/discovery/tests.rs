use super::*;

#[tokio::test]
async fn test_websocket_url_passthrough() {
    let options = DiscoveryOptions::default();
    let result =
        discover_websocket_url("ws://localhost:9222/devtools/browser/abc123", &options).await;

    assert_eq!(
        result.unwrap(),
        "ws://localhost:9222/devtools/browser/abc123"
    );
}

#[tokio::test]
async fn test_invalid_scheme() {
    let options = DiscoveryOptions::default();
    let result = discover_websocket_url("ftp://localhost:9222", &options).await;

    let err = result.unwrap_err();
    assert!(matches!(err, CdpError::InvalidEndpointUrl(_)));
}

#[test]
fn test_discovery_options_builder() {
    let options = DiscoveryOptions::new()
        .timeout(Duration::from_secs(10))
        .header("Authorization", "Bearer token")
        .header("X-Custom", "value");

    assert_eq!(options.timeout, Some(Duration::from_secs(10)));
    assert_eq!(
        options.headers.get("Authorization"),
        Some(&"Bearer token".to_string())
    );
    assert_eq!(options.headers.get("X-Custom"), Some(&"value".to_string()));
}

#[test]
fn test_list_tabs_filters_by_type_case_insensitively() {
    let tabs: Vec<TabRecord> = serde_json::from_str(
        r#"[
            {"id":"a","type":"page","title":"home","webSocketDebuggerUrl":"ws://h/a"},
            {"id":"b","type":"Background_Page","title":"ext","webSocketDebuggerUrl":"ws://h/b"}
        ]"#,
    )
    .unwrap();

    let pages: Vec<&TabRecord> = tabs
        .iter()
        .filter(|t| t.target_type.to_lowercase().contains("page"))
        .collect();
    assert_eq!(pages.len(), 2);
}

#[test]
fn test_tab_record_deserialization_missing_optional_fields() {
    let tab: TabRecord = serde_json::from_str(r#"{"id":"a","type":"page"}"#).unwrap();
    assert_eq!(tab.id, "a");
    assert!(tab.title.is_none());
    assert!(tab.web_socket_debugger_url.is_none());
}

#[test]
fn test_browser_version_deserialization() {
    let version: BrowserVersion = serde_json::from_str(
        r#"{"Browser":"Chrome/120.0","Protocol-Version":"1.3","webSocketDebuggerUrl":"ws://h/browser"}"#,
    )
    .unwrap();
    assert_eq!(version.browser.as_deref(), Some("Chrome/120.0"));
    assert_eq!(version.protocol_version.as_deref(), Some("1.3"));
}

#[test]
fn test_discovery_client_rejects_unparseable_endpoint() {
    let err = DiscoveryClient::new("not a url", &DiscoveryOptions::default()).unwrap_err();
    assert!(matches!(err, CdpError::InvalidEndpointUrl(_)));
}
