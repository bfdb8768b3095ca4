//! End-to-end: a local WebSocket server feeds the channel and receives the shutdown sentinel.

use std::time::Duration;

use aether::telemetry::{ConnectionStatus, Telemetry};
use aether::types::{Frame, SHUTDOWN_COMMAND};
use aether::ws::{ChannelEvent, ReconnectPolicy, TelemetryChannel};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_tungstenite::{accept_async, tungstenite::Message};

const DATA: &str = r#"{"type":"DATA","payload":{"system":{"uptime":900,"status":"online"},"memory":{"used_kb":8192,"total_kb":16384},"network":{"rx":5,"link":1},"explorer":{"devices":4}}}"#;

async fn next_frame(ch: &mut TelemetryChannel) -> Frame {
    loop {
        let ev = tokio::time::timeout(Duration::from_secs(5), ch.recv())
            .await
            .expect("event within timeout")
            .expect("channel alive");
        if let ChannelEvent::Frame(f) = ev {
            return f;
        }
    }
}

#[tokio::test]
async fn frames_flow_in_and_shutdown_flows_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (got_tx, got_rx) = oneshot::channel::<String>();

    tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(tcp).await.unwrap();
        ws.send(Message::Text(r#"{"type":"LOG","payload":"[uart] online"}"#.into()))
            .await
            .unwrap();
        // malformed frames are skipped, the link stays up
        ws.send(Message::Text("{not json".into())).await.unwrap();
        ws.send(Message::Text(r#"{"type":"BOGUS","payload":0}"#.into()))
            .await
            .unwrap();
        ws.send(Message::Text(DATA.into())).await.unwrap();
        while let Some(Ok(msg)) = ws.next().await {
            if let Message::Text(t) = msg {
                let _ = got_tx.send(t);
                break;
            }
        }
    });

    let mut ch = TelemetryChannel::open(format!("ws://{addr}"), None, ReconnectPolicy::never());
    let mut t = Telemetry::new();

    let first = next_frame(&mut ch).await;
    assert_eq!(first, Frame::Log("[uart] online".into()));
    t.apply(first, "10:00:00");

    let second = next_frame(&mut ch).await;
    assert!(matches!(second, Frame::Data(_)), "{second:?}");
    t.apply(second, "10:00:01");
    assert_eq!(t.snapshot.memory.used_kb, 8192);
    assert_eq!(t.history.values(), vec![8192]);
    assert_eq!(t.logs.len(), 1);

    ch.request_shutdown();
    let sent = tokio::time::timeout(Duration::from_secs(5), got_rx)
        .await
        .expect("sentinel within timeout")
        .expect("server saw a text message");
    assert_eq!(sent, SHUTDOWN_COMMAND);

    ch.close().await;
    ch.close().await;
    assert!(!ch.is_open());
}

#[tokio::test]
async fn refused_connection_reports_permanent_disconnect() {
    // Bind then drop to get a port nobody listens on.
    let addr = {
        let l = TcpListener::bind("127.0.0.1:0").await.unwrap();
        l.local_addr().unwrap()
    };
    let mut ch = TelemetryChannel::open(format!("ws://{addr}"), None, ReconnectPolicy::never());
    let mut seen = Vec::new();
    while let Ok(Some(ChannelEvent::Status(s))) =
        tokio::time::timeout(Duration::from_secs(5), ch.recv()).await
    {
        seen.push(s);
        if matches!(s, ConnectionStatus::Disconnected { .. }) {
            break;
        }
    }
    assert_eq!(
        seen,
        vec![
            ConnectionStatus::Connecting,
            ConnectionStatus::Disconnected { retry_in: None }
        ]
    );
    ch.close().await;
}

#[tokio::test]
async fn peer_close_is_followed_by_a_backoff_reconnect() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        // first session: hang up right after the handshake
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(tcp).await.unwrap();
        let _ = ws.close(None).await;
        drop(ws);
        // second session: stays up and talks
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(tcp).await.unwrap();
        ws.send(Message::Text(r#"{"type":"LOG","payload":"[net] back"}"#.into()))
            .await
            .unwrap();
        while let Some(Ok(_)) = ws.next().await {}
    });

    let mut ch = TelemetryChannel::open(format!("ws://{addr}"), None, ReconnectPolicy::default());
    let mut statuses = Vec::new();
    let frame = loop {
        let ev = tokio::time::timeout(Duration::from_secs(10), ch.recv())
            .await
            .expect("event within timeout")
            .expect("channel alive");
        match ev {
            ChannelEvent::Status(s) => statuses.push(s),
            ChannelEvent::Frame(f) => break f,
        }
    };

    assert_eq!(frame, Frame::Log("[net] back".into()));
    assert_eq!(
        statuses,
        vec![
            ConnectionStatus::Connecting,
            ConnectionStatus::Connected,
            ConnectionStatus::Disconnected {
                retry_in: Some(Duration::from_secs(1))
            },
            ConnectionStatus::Connecting,
            ConnectionStatus::Connected,
        ]
    );
    ch.close().await;
}
