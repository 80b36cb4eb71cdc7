//! End-to-end tests over a real socket.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use crate::api::router;
use crate::app::App;
use crate::infrastructure::{clock::SystemClock, settings::AgentConfig};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn spawn_server(config: AgentConfig) -> std::net::SocketAddr {
    let app = Arc::new(App::new(config, Arc::new(SystemClock::new())));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router(app)).await.expect("serve");
    });
    addr
}

async fn next_json(client: &mut Client) -> Value {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(2), client.next())
            .await
            .expect("frame before timeout")
            .expect("stream open")
            .expect("frame ok");
        if let Message::Text(text) = frame {
            return serde_json::from_str(text.as_str()).expect("json frame");
        }
    }
}

async fn send_json(client: &mut Client, value: Value) {
    client
        .send(Message::Text(value.to_string()))
        .await
        .expect("send");
}

#[tokio::test]
async fn connection_opens_with_reregister_all() {
    let addr = spawn_server(AgentConfig::default()).await;
    let (mut client, _) = connect_async(format!("ws://{addr}/ws")).await.expect("connect");

    assert_eq!(next_json(&mut client).await, json!({"command": "actions/reregister_all"}));
}

#[tokio::test]
async fn force_is_answered_with_a_registered_action() {
    let config = AgentConfig {
        rng_seed: Some(11),
        ..AgentConfig::default()
    };
    let addr = spawn_server(config).await;
    let (mut client, _) = connect_async(format!("ws://{addr}/")).await.expect("connect");
    next_json(&mut client).await;

    send_json(
        &mut client,
        json!({"command": "actions/register", "game": "cards", "data": {"actions": [
            {"name": "play_card", "description": "Play a card",
             "schema": {"type": "object", "properties": {"slot": {"type": "integer", "minimum": 1, "maximum": 3}},
                        "required": ["slot"]}}
        ]}}),
    )
    .await;
    send_json(
        &mut client,
        json!({"command": "actions/force", "game": "cards",
               "data": {"state": "Your turn", "query": "Play a card", "action_names": ["play_card"]}}),
    )
    .await;

    let action = next_json(&mut client).await;
    assert_eq!(action["command"], "action");
    assert_eq!(action["data"]["id"], "0");
    assert_eq!(action["data"]["name"], "play_card");
    let params: Value = serde_json::from_str(action["data"]["data"].as_str().expect("params string"))
        .expect("params json");
    let slot = params["slot"].as_i64().expect("slot is an integer");
    assert!((1..=3).contains(&slot));
}

#[tokio::test]
async fn broadcast_reaches_open_sockets() {
    let addr = spawn_server(AgentConfig::default()).await;
    let (mut client, _) = connect_async(format!("ws://{addr}/ws")).await.expect("connect");
    next_json(&mut client).await;

    let mut stream = TcpStream::connect(addr).await.expect("http connect");
    let body = r#"{"command":"actions/reregister_all"}"#;
    let request = format!(
        "POST /api/broadcast HTTP/1.1\r\nHost: {addr}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    tokio::io::AsyncWriteExt::write_all(&mut stream, request.as_bytes())
        .await
        .expect("write request");

    assert_eq!(next_json(&mut client).await, json!({"command": "actions/reregister_all"}));
}
