//! Integration tests for the Pairline server: real WebSocket clients
//! against a server bound on a random port.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use pairline::prelude::*;
use serde_json::json;
use tokio_tungstenite::tungstenite::Message;

// =========================================================================
// Helpers
// =========================================================================

type ClientWs = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// Starts a server on a random port and returns its address and monitor.
async fn start_server(builder: PairlineServerBuilder) -> (String, Monitor<JsonCodec>) {
    let server = builder
        .bind("127.0.0.1:0")
        .build()
        .await
        .expect("server should build");

    let addr = server
        .local_addr()
        .expect("should have local addr")
        .to_string();
    let monitor = server.monitor();

    tokio::spawn(async move {
        let _ = server.run().await;
    });

    // Give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(10)).await;
    (addr, monitor)
}

async fn connect(addr: &str) -> ClientWs {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .expect("should connect");
    ws
}

async fn send(ws: &mut ClientWs, event: &ClientEvent) {
    let text = serde_json::to_string(event).expect("encode");
    ws.send(Message::Text(text.into())).await.expect("send");
}

/// Receives the next event, failing the test after two seconds.
async fn recv(ws: &mut ClientWs) -> ServerEvent {
    let msg = tokio::time::timeout(Duration::from_secs(2), ws.next())
        .await
        .expect("timed out waiting for event")
        .expect("stream ended")
        .expect("ws error");
    serde_json::from_slice(&msg.into_data()).expect("decode")
}

/// Asserts that nothing arrives within a short window.
async fn assert_silent(ws: &mut ClientWs) {
    let result = tokio::time::timeout(Duration::from_millis(200), ws.next()).await;
    assert!(result.is_err(), "expected no event, got {result:?}");
}

async fn expect_matched(ws: &mut ClientWs) -> (RoomId, PeerId) {
    match recv(ws).await {
        ServerEvent::Matched { room_id, peer } => (room_id, peer),
        other => panic!("expected matched, got {other:?}"),
    }
}

/// Polls the monitor until `check` passes; disconnect teardown runs on a
/// spawned task, so it lands shortly after the socket closes.
async fn wait_for_stats(monitor: &Monitor<JsonCodec>, check: impl Fn(Stats) -> bool) -> Stats {
    for _ in 0..100 {
        let stats = monitor.stats().await;
        if check(stats) {
            return stats;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("stats never converged: {:?}", monitor.stats().await);
}

/// Connects two clients and pairs them.
async fn matched_pair(addr: &str) -> (ClientWs, ClientWs, RoomId, PeerId, PeerId) {
    let mut a = connect(addr).await;
    let mut b = connect(addr).await;
    send(&mut a, &ClientEvent::FindRandomMatch).await;
    send(&mut b, &ClientEvent::FindRandomMatch).await;

    let (room_a, b_id) = expect_matched(&mut a).await;
    let (room_b, a_id) = expect_matched(&mut b).await;
    assert_eq!(room_a, room_b);
    (a, b, room_a, a_id, b_id)
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_two_peers_are_matched() {
    let (addr, monitor) = start_server(PairlineServerBuilder::new()).await;

    let (_a, _b, _room, a_id, b_id) = matched_pair(&addr).await;

    assert_ne!(a_id, b_id);
    let stats = monitor.stats().await;
    assert_eq!(stats.rooms, 1);
    assert_eq!(stats.waiting, 0);
}

#[tokio::test]
async fn test_offer_answer_and_candidates_are_relayed() {
    let (addr, _monitor) = start_server(PairlineServerBuilder::new()).await;
    let (mut a, mut b, _room, a_id, b_id) = matched_pair(&addr).await;

    let offer = json!({ "type": "offer", "sdp": "v=0 offer" });
    send(
        &mut a,
        &ClientEvent::SendOffer {
            target: b_id,
            offer: offer.clone(),
        },
    )
    .await;
    assert_eq!(
        recv(&mut b).await,
        ServerEvent::ReceiveOffer { from: a_id, offer }
    );

    let answer = json!({ "type": "answer", "sdp": "v=0 answer" });
    send(
        &mut b,
        &ClientEvent::SendAnswer {
            target: a_id,
            answer: answer.clone(),
        },
    )
    .await;
    assert_eq!(
        recv(&mut a).await,
        ServerEvent::ReceiveAnswer { from: b_id, answer }
    );

    let candidate = json!({ "candidate": "candidate:1 1 udp 1 10.0.0.1 5000 typ host" });
    send(
        &mut a,
        &ClientEvent::SendIceCandidate {
            target: b_id,
            candidate: candidate.clone(),
        },
    )
    .await;
    assert_eq!(
        recv(&mut b).await,
        ServerEvent::ReceiveIceCandidate {
            from: a_id,
            candidate
        }
    );
}

#[tokio::test]
async fn test_raw_json_frames_follow_wire_format() {
    let (addr, _monitor) = start_server(PairlineServerBuilder::new()).await;
    let mut a = connect(&addr).await;
    let mut b = connect(&addr).await;

    a.send(Message::Text(r#"{"event":"find-random-match"}"#.into()))
        .await
        .unwrap();
    b.send(Message::Text(r#"{"event":"find-random-match"}"#.into()))
        .await
        .unwrap();

    let msg = tokio::time::timeout(Duration::from_secs(2), a.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert!(msg.is_text(), "events go out as text frames");
    let value: serde_json::Value = serde_json::from_slice(&msg.into_data()).unwrap();
    assert_eq!(value["event"], "matched");
    assert!(value["data"]["roomId"].as_str().unwrap().starts_with("room_"));
    assert!(value["data"]["peer"].is_u64());
}

#[tokio::test]
async fn test_end_call_notifies_both_and_frees_room() {
    let (addr, monitor) = start_server(PairlineServerBuilder::new()).await;
    let (mut a, mut b, room, _a_id, _b_id) = matched_pair(&addr).await;

    send(&mut a, &ClientEvent::EndCall { room_id: room.clone() }).await;

    assert_eq!(recv(&mut a).await, ServerEvent::CallEnded);
    assert_eq!(recv(&mut b).await, ServerEvent::CallEnded);
    assert_eq!(monitor.stats().await.rooms, 0);

    // Late duplicate is a no-op.
    send(&mut b, &ClientEvent::EndCall { room_id: room }).await;
    assert_silent(&mut a).await;
    assert_silent(&mut b).await;
}

#[tokio::test]
async fn test_peer_disconnect_ends_call_for_survivor() {
    let (addr, monitor) = start_server(PairlineServerBuilder::new()).await;
    let (mut a, mut b, _room, _a_id, _b_id) = matched_pair(&addr).await;

    a.send(Message::Close(None)).await.unwrap();

    assert_eq!(recv(&mut b).await, ServerEvent::CallEnded);
    let stats = wait_for_stats(&monitor, |s| s.connections == 1).await;
    assert_eq!(stats.rooms, 0);

    // The survivor can look for someone new.
    let mut c = connect(&addr).await;
    send(&mut b, &ClientEvent::FindRandomMatch).await;
    send(&mut c, &ClientEvent::FindRandomMatch).await;
    expect_matched(&mut b).await;
    expect_matched(&mut c).await;
}

#[tokio::test]
async fn test_waiting_peer_disconnect_leaves_queue() {
    let (addr, monitor) = start_server(PairlineServerBuilder::new()).await;
    let mut a = connect(&addr).await;
    send(&mut a, &ClientEvent::FindRandomMatch).await;
    wait_for_stats(&monitor, |s| s.waiting == 1).await;

    drop(a);
    wait_for_stats(&monitor, |s| s.waiting == 0 && s.connections == 0).await;

    let mut b = connect(&addr).await;
    send(&mut b, &ClientEvent::FindRandomMatch).await;
    assert_silent(&mut b).await;
}

#[tokio::test]
async fn test_scenario_third_peer_waits_alone() {
    let (addr, monitor) = start_server(PairlineServerBuilder::new()).await;
    let (mut a, mut b, room, _a_id, _b_id) = matched_pair(&addr).await;
    let mut c = connect(&addr).await;

    send(&mut c, &ClientEvent::FindRandomMatch).await;
    assert_silent(&mut c).await;
    assert_eq!(monitor.stats().await.waiting, 1);

    send(&mut a, &ClientEvent::EndCall { room_id: room }).await;
    assert_eq!(recv(&mut a).await, ServerEvent::CallEnded);
    assert_eq!(recv(&mut b).await, ServerEvent::CallEnded);
    assert_silent(&mut c).await;
}

#[tokio::test]
async fn test_relay_to_unknown_target_is_silent() {
    let (addr, _monitor) = start_server(PairlineServerBuilder::new()).await;
    let mut a = connect(&addr).await;

    send(
        &mut a,
        &ClientEvent::SendOffer {
            target: PeerId(u64::MAX),
            offer: json!({}),
        },
    )
    .await;

    assert_silent(&mut a).await;
}

#[tokio::test]
async fn test_malformed_event_gets_error_and_connection_survives() {
    let (addr, _monitor) = start_server(PairlineServerBuilder::new()).await;
    let mut a = connect(&addr).await;

    a.send(Message::Text(r#"{"event":"send-offer","data":{"offer":{}}}"#.into()))
        .await
        .unwrap();
    match recv(&mut a).await {
        ServerEvent::Error { code, message } => {
            assert_eq!(code, 400);
            assert!(message.contains("target"), "message was {message}");
        }
        other => panic!("expected error, got {other:?}"),
    }

    send(&mut a, &ClientEvent::Heartbeat { client_time: 5 }).await;
    assert_eq!(recv(&mut a).await, ServerEvent::HeartbeatAck { client_time: 5 });
}

#[tokio::test]
async fn test_cancel_match_prevents_pairing() {
    let (addr, monitor) = start_server(PairlineServerBuilder::new()).await;
    let mut a = connect(&addr).await;
    let mut b = connect(&addr).await;

    send(&mut a, &ClientEvent::FindRandomMatch).await;
    send(&mut a, &ClientEvent::CancelMatch).await;
    wait_for_stats(&monitor, |s| s.waiting == 0 && s.connections == 2).await;

    send(&mut b, &ClientEvent::FindRandomMatch).await;
    assert_silent(&mut a).await;
    assert_silent(&mut b).await;
}

#[tokio::test]
async fn test_idle_timeout_closes_silent_connection() {
    let (addr, monitor) = start_server(
        PairlineServerBuilder::new().idle_timeout(Duration::from_millis(100)),
    )
    .await;
    let mut a = connect(&addr).await;

    let result = tokio::time::timeout(Duration::from_secs(2), a.next()).await;
    match result {
        Ok(Some(Ok(Message::Close(_)))) | Ok(None) | Ok(Some(Err(_))) => {}
        other => panic!("expected close, got {other:?}"),
    }
    wait_for_stats(&monitor, |s| s.connections == 0).await;
}
