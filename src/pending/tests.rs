use super::*;

fn response(id: u64) -> CdpResponse {
    CdpResponse {
        id,
        result: Some(serde_json::json!({"ok": true})),
        error: None,
    }
}

#[tokio::test]
async fn test_register_then_fulfill_delivers_response() {
    let mut table = PendingTable::new();
    let rx = table.register(1);
    assert_eq!(table.len(), 1);

    table.fulfill(response(1));
    let resp = rx.await.unwrap();
    assert_eq!(resp.id, 1);
    assert!(table.is_empty());
}

#[tokio::test]
async fn test_fulfill_unknown_id_is_dropped_silently() {
    let mut table = PendingTable::new();
    let rx = table.register(1);

    table.fulfill(response(99));
    assert_eq!(table.len(), 1);
    drop(rx);
}

#[tokio::test]
async fn test_cancel_removes_entry() {
    let mut table = PendingTable::new();
    let _rx = table.register(1);
    table.cancel(1);
    assert!(table.is_empty());
}

#[tokio::test]
async fn test_drain_closes_all_receivers() {
    let mut table = PendingTable::new();
    let rx1 = table.register(1);
    let rx2 = table.register(2);

    table.drain();
    assert!(table.is_empty());
    assert!(rx1.await.is_err());
    assert!(rx2.await.is_err());
}
