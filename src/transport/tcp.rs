//! TCP transport speaking newline-delimited JSON packets.
//!
//! Each packet is one JSON-encoded [`Element`] per line. Requests are tagged
//! with a `RequestNumber` attribute; an inbound `Reply` carrying the same
//! number completes the matching submit. Everything else is handed to the
//! inbound handler for display.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{Endpoint, InboundHandler, Transport};
use crate::element::{Element, REPLY};
use crate::error::{MsshError, Result};

/// Attribute correlating a request with its reply.
pub const REQUEST_NUMBER: &str = "RequestNumber";

const DEFAULT_DIAL_TIMEOUT: Duration = Duration::from_secs(3);

type PendingReplies = Arc<Mutex<HashMap<u64, oneshot::Sender<Element>>>>;

/// Dials peers over TCP.
pub struct TcpTransport {
    on_inbound: InboundHandler,
    dial_timeout: Duration,
}

impl TcpTransport {
    /// Creates a transport that reports unsolicited packets to `on_inbound`.
    pub fn new(on_inbound: InboundHandler) -> Self {
        Self {
            on_inbound,
            dial_timeout: DEFAULT_DIAL_TIMEOUT,
        }
    }

    /// Overrides the connect timeout.
    pub fn with_dial_timeout(mut self, dial_timeout: Duration) -> Self {
        self.dial_timeout = dial_timeout;
        self
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn connect(&self, address: &str, local_name: &str) -> Result<Box<dyn Endpoint>> {
        let stream = tokio::time::timeout(self.dial_timeout, TcpStream::connect(address))
            .await
            .map_err(|_| MsshError::transport(format!("connecting to {address} timed out")))?
            .map_err(|e| MsshError::transport(format!("cannot connect to {address}: {e}")))?;

        info!("Connected to {address} as {local_name}");

        let (read_half, write_half) = stream.into_split();
        let pending: PendingReplies = Arc::new(Mutex::new(HashMap::new()));
        let shutdown = CancellationToken::new();

        tokio::spawn(read_loop(
            read_half,
            Arc::clone(&pending),
            Arc::clone(&self.on_inbound),
            shutdown.clone(),
        ));

        Ok(Box::new(TcpEndpoint {
            name: local_name.to_string(),
            writer: tokio::sync::Mutex::new(write_half),
            pending,
            next_request: AtomicU64::new(1),
            shutdown,
        }))
    }
}

/// A live TCP connection.
pub struct TcpEndpoint {
    name: String,
    writer: tokio::sync::Mutex<OwnedWriteHalf>,
    pending: PendingReplies,
    next_request: AtomicU64,
    shutdown: CancellationToken,
}

impl TcpEndpoint {
    async fn write_packet(&self, element: &Element) -> Result<()> {
        let mut line = serde_json::to_string(element)
            .map_err(|e| MsshError::transport(format!("cannot encode packet: {e}")))?;
        line.push('\n');

        let mut writer = self.writer.lock().await;
        writer
            .write_all(line.as_bytes())
            .await
            .map_err(|e| MsshError::transport(format!("send failed: {e}")))?;
        writer
            .flush()
            .await
            .map_err(|e| MsshError::transport(format!("send failed: {e}")))
    }

    fn forget(&self, number: u64) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.remove(&number);
        }
    }
}

#[async_trait]
impl Endpoint for TcpEndpoint {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, element: &Element) -> Result<()> {
        self.write_packet(element).await
    }

    async fn submit(&self, mut element: Element, timeout: Duration) -> Result<Element> {
        let number = self.next_request.fetch_add(1, Ordering::Relaxed);
        element.set_attribute(REQUEST_NUMBER, number.to_string());

        let (tx, rx) = oneshot::channel();
        self.pending
            .lock()
            .map_err(|_| MsshError::transport("reply table poisoned"))?
            .insert(number, tx);

        if let Err(e) = self.write_packet(&element).await {
            self.forget(number);
            return Err(e);
        }

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(_)) => Err(MsshError::transport("connection closed before reply")),
            Err(_) => {
                self.forget(number);
                debug!("Request {number} timed out after {timeout:?}");
                Err(MsshError::Timeout(timeout))
            }
        }
    }

    async fn close(&self) -> Result<()> {
        self.shutdown.cancel();
        let mut writer = self.writer.lock().await;
        writer
            .shutdown()
            .await
            .map_err(|e| MsshError::transport(format!("close failed: {e}")))?;
        info!("Closed connection for {}", self.name);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.shutdown.is_cancelled()
    }
}

impl Drop for TcpEndpoint {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Reads inbound packets until the peer closes or the endpoint shuts down.
async fn read_loop(
    read_half: OwnedReadHalf,
    pending: PendingReplies,
    on_inbound: InboundHandler,
    shutdown: CancellationToken,
) {
    let mut lines = BufReader::new(read_half).lines();

    loop {
        let line = tokio::select! {
            _ = shutdown.cancelled() => break,
            line = lines.next_line() => line,
        };

        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => {
                info!("Peer closed the connection");
                break;
            }
            Err(e) => {
                warn!("Read failed: {e}");
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<Element>(&line) {
            Ok(element) => dispatch(element, &pending, &on_inbound),
            Err(e) => warn!("Discarding malformed packet: {e}"),
        }
    }

    shutdown.cancel();

    // Dropping the senders wakes any waiting submit with a closed-channel error.
    if let Ok(mut pending) = pending.lock() {
        pending.clear();
    }
}

fn dispatch(element: Element, pending: &PendingReplies, on_inbound: &InboundHandler) {
    if element.name == REPLY {
        let number = element
            .attribute(REQUEST_NUMBER)
            .and_then(|n| n.parse::<u64>().ok());
        let waiter = number.and_then(|n| pending.lock().ok().and_then(|mut p| p.remove(&n)));

        if let Some(waiter) = waiter {
            // The submitter may have given up already; nothing to do then.
            let _ = waiter.send(element);
            return;
        }
        debug!("Reply without a pending request: {:?}", number);
    }

    on_inbound(element);
}
