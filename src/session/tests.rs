use super::*;
use crate::test_support::connected_session;

#[tokio::test]
async fn test_eval_round_trip() {
    let (session, server_tx, mut server_rx) = connected_session().await;

    let request_fut = session.send_request::<_, Value>(
        "Runtime.evaluate",
        Some(serde_json::json!({"expression": "1+2", "returnByValue": true})),
    );

    let sent_frame = server_rx.recv().await.unwrap();
    assert!(sent_frame.contains("Runtime.evaluate"));
    server_tx
        .send(r#"{"id":1,"result":{"result":{"type":"number","value":3}}}"#.to_string())
        .unwrap();

    let result = request_fut.await.unwrap();
    assert_eq!(result["result"]["value"], 3);
}

#[tokio::test]
async fn test_error_reply_rejects_with_protocol_error() {
    let (session, _server_tx_keepalive, mut server_rx) = connected_session().await;
    let server_tx = _server_tx_keepalive;

    let request_fut = session.send_request::<_, Value>("Runtime.evaluate", None::<Value>);
    let _ = server_rx.recv().await.unwrap();
    server_tx
        .send(r#"{"id":1,"error":{"code":-32000,"message":"Oops","data":"ctx"}}"#.to_string())
        .unwrap();

    let err = request_fut.await.unwrap_err();
    let rendered = err.to_string();
    assert!(rendered.contains("Oops"));
    assert!(rendered.contains("ctx"));
    assert!(rendered.contains("-32000"));
}

#[tokio::test]
async fn test_once_any_resolves_on_first_matching_event() {
    let (session, server_tx, _server_rx) = connected_session().await;

    let waiter = session.once_any(vec!["Page.loadEventFired".to_string()]);
    server_tx
        .send(r#"{"method":"Page.loadEventFired","params":{"timestamp":1.5}}"#.to_string())
        .unwrap();

    let event = waiter.await.unwrap();
    assert_eq!(event.method, "Page.loadEventFired");

    server_tx
        .send(r#"{"method":"Page.loadEventFired","params":{"timestamp":2.5}}"#.to_string())
        .unwrap();
    // No second waiter is registered; nothing to assert beyond "no panic".
}

#[tokio::test]
async fn test_fan_out_to_two_subscribers_in_order() {
    let (session, server_tx, _server_rx) = connected_session().await;

    let (_h1, mut rx1) = session.subscribe("Network.requestWillBeSent");
    let (_h2, mut rx2) = session.subscribe("Network.requestWillBeSent");

    server_tx
        .send(r#"{"method":"Network.requestWillBeSent","params":{}}"#.to_string())
        .unwrap();

    assert_eq!(rx1.recv().await.unwrap().method, "Network.requestWillBeSent");
    assert_eq!(rx2.recv().await.unwrap().method, "Network.requestWillBeSent");
}

#[tokio::test]
async fn test_close_drains_outstanding_requests_with_disconnected() {
    let (session, _server_tx, mut server_rx) = connected_session().await;

    let fut1 = session.send_request::<_, Value>("Foo.bar", None::<Value>);
    let fut2 = session.send_request::<_, Value>("Foo.baz", None::<Value>);
    let _ = server_rx.recv().await.unwrap();
    let _ = server_rx.recv().await.unwrap();

    session.close().await;

    assert!(matches!(fut1.await.unwrap_err(), CdpError::Disconnected));
    assert!(matches!(fut2.await.unwrap_err(), CdpError::Disconnected));
    assert_eq!(session.state().await, SessionState::Idle);
}

#[tokio::test]
async fn test_send_request_before_connect_fails_not_connected() {
    let session = Session::new();
    let err = session
        .send_request::<_, Value>("Foo.bar", None::<Value>)
        .await
        .unwrap_err();
    assert!(matches!(err, CdpError::NotConnected));
}

#[tokio::test]
async fn test_malformed_explicit_endpoint_rejects() {
    let session = Session::new();
    let options = ConnectOptions::new().endpoint("ws://host:1/devtools/page/");
    let err = session.do_connect(options).await.unwrap_err();
    assert!(matches!(err, CdpError::MalformedEndpoint(_)));
}

#[test]
fn test_tab_selector_title_matches_case_sensitively_by_default() {
    let pattern = Regex::new("mail").unwrap();
    assert!(pattern.is_match("mail"));
    assert!(!pattern.is_match("MAIL"));
}

#[tokio::test]
async fn test_sleep_waits_at_least_the_requested_duration_without_a_connection() {
    let session = Session::new();
    let elapsed = session.sleep(0.01).await;
    assert!(elapsed >= std::time::Duration::from_millis(10));
}
