//! TCP transport integration tests against a loopback peer.

use std::sync::Arc;
use std::time::Duration;

use mssh::element::{Element, REPLY};
use mssh::error::MsshError;
use mssh::transport::{Endpoint, InboundHandler, TcpTransport, Transport};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Starts a peer that answers every request with a `Reply` naming itself,
/// and echoes every message back as an unsolicited `Message`.
async fn spawn_peer(name: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap().to_string();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let (read_half, mut write_half) = stream.into_split();
        let mut lines = BufReader::new(read_half).lines();

        while let Ok(Some(line)) = lines.next_line().await {
            let packet: Element = serde_json::from_str(&line).unwrap();
            let response = if packet.is_request() {
                let mut reply = Element::new(REPLY).with_attribute("Name", name);
                if let Some(number) = packet.attribute("RequestNumber") {
                    reply.set_attribute("RequestNumber", number);
                }
                if let Some(kind) = packet.attribute("Type") {
                    reply.set_attribute("Type", kind);
                }
                reply
            } else {
                let mut echo = Element::new("Message").with_attribute("Type", "echo");
                echo.push_element(packet);
                echo
            };

            let mut out = serde_json::to_string(&response).unwrap();
            out.push('\n');
            if write_half.write_all(out.as_bytes()).await.is_err() {
                break;
            }
        }
    });

    address
}

/// Starts a peer that accepts and reads but never answers.
async fn spawn_silent_peer() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap().to_string();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut lines = BufReader::new(stream).lines();
        while let Ok(Some(_)) = lines.next_line().await {}
    });

    address
}

fn channel_handler() -> (InboundHandler, mpsc::UnboundedReceiver<Element>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let handler: InboundHandler = Arc::new(move |packet: Element| {
        let _ = tx.send(packet);
    });
    (handler, rx)
}

#[tokio::test]
async fn test_submit_receives_correlated_reply() {
    let address = spawn_peer("loopback").await;
    let (handler, _rx) = channel_handler();
    let transport = TcpTransport::new(handler);
    let endpoint = transport.connect(&address, "tester").await.unwrap();

    let request = Element::new("Request").with_attribute("Type", "_Login");
    let reply = endpoint
        .submit(request, Duration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(reply.name, REPLY);
    assert_eq!(reply.attribute("Name"), Some("loopback"));
    assert_eq!(reply.attribute("Type"), Some("_Login"));
    endpoint.close().await.unwrap();
}

#[tokio::test]
async fn test_sequential_requests_get_distinct_numbers() {
    let address = spawn_peer("loopback").await;
    let (handler, _rx) = channel_handler();
    let transport = TcpTransport::new(handler);
    let endpoint = transport.connect(&address, "tester").await.unwrap();

    let first = endpoint
        .submit(Element::new("Request"), Duration::from_secs(5))
        .await
        .unwrap();
    let second = endpoint
        .submit(Element::new("Request"), Duration::from_secs(5))
        .await
        .unwrap();

    assert_ne!(
        first.attribute("RequestNumber"),
        second.attribute("RequestNumber")
    );
}

#[tokio::test]
async fn test_unsolicited_packets_go_to_handler() {
    let address = spawn_peer("loopback").await;
    let (handler, mut rx) = channel_handler();
    let transport = TcpTransport::new(handler);
    let endpoint = transport.connect(&address, "tester").await.unwrap();

    let message = Element::new("Message").with_attribute("Type", "ping");
    endpoint.send(&message).await.unwrap();

    let received = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(received.attribute("Type"), Some("echo"));
    assert_eq!(received.children.len(), 1);
}

#[tokio::test]
async fn test_silent_peer_times_out() {
    let address = spawn_silent_peer().await;
    let (handler, _rx) = channel_handler();
    let transport = TcpTransport::new(handler);
    let endpoint = transport.connect(&address, "tester").await.unwrap();

    let result = endpoint
        .submit(Element::new("Request"), Duration::from_millis(50))
        .await;
    assert!(matches!(result, Err(MsshError::Timeout(_))));

    // The connection survives a timed-out wait.
    endpoint.send(&Element::new("Message")).await.unwrap();
}

#[tokio::test]
async fn test_connect_to_closed_port_fails() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap().to_string();
    drop(listener);

    let (handler, _rx) = channel_handler();
    let transport = TcpTransport::new(handler).with_dial_timeout(Duration::from_secs(1));
    let result = transport.connect(&address, "tester").await;
    assert!(matches!(result, Err(MsshError::Transport(_))));
}
