//! In-memory transport for testing.
//!
//! Records every call so tests can assert on what reached the transport, and
//! answers requests from a queue of canned replies.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::{Endpoint, Transport};
use crate::element::Element;
use crate::error::{MsshError, Result};

/// Counters and captured packets shared by a mock transport and its endpoints.
#[derive(Debug, Default)]
pub struct TransportCalls {
    connects: AtomicUsize,
    closes: AtomicUsize,
    sent: Mutex<Vec<Element>>,
    submitted: Mutex<Vec<Element>>,
    addresses: Mutex<Vec<String>>,
}

impl TransportCalls {
    /// Number of successful or failed connect attempts.
    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// Number of close calls.
    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Packets passed to `send`.
    pub fn sent(&self) -> Vec<Element> {
        self.sent.lock().map(|v| v.clone()).unwrap_or_default()
    }

    /// Packets passed to `submit`.
    pub fn submitted(&self) -> Vec<Element> {
        self.submitted.lock().map(|v| v.clone()).unwrap_or_default()
    }

    /// Addresses passed to `connect`.
    pub fn addresses(&self) -> Vec<String> {
        self.addresses.lock().map(|v| v.clone()).unwrap_or_default()
    }

    /// Total number of calls that touched the transport.
    pub fn total(&self) -> usize {
        self.connects() + self.closes() + self.sent().len() + self.submitted().len()
    }
}

/// A transport whose endpoints never touch the network.
#[derive(Clone, Default)]
pub struct MockTransport {
    calls: Arc<TransportCalls>,
    replies: Arc<Mutex<VecDeque<Element>>>,
    peer_closed: Arc<AtomicBool>,
    refuse: bool,
}

impl MockTransport {
    /// Creates a mock transport that accepts every connection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock transport whose connect attempts always fail.
    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::default()
        }
    }

    /// Queues a reply for the next submitted request.
    pub fn push_reply(&self, reply: Element) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }

    /// Simulates the peer dropping every connection opened so far.
    pub fn close_from_peer(&self) {
        self.peer_closed.store(true, Ordering::SeqCst);
    }

    /// Shared call record.
    pub fn calls(&self) -> Arc<TransportCalls> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn connect(&self, address: &str, local_name: &str) -> Result<Box<dyn Endpoint>> {
        self.calls.connects.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut addresses) = self.calls.addresses.lock() {
            addresses.push(address.to_string());
        }

        if self.refuse {
            return Err(MsshError::transport(format!(
                "connection to {address} refused"
            )));
        }

        self.peer_closed.store(false, Ordering::SeqCst);
        Ok(Box::new(MockEndpoint {
            name: local_name.to_string(),
            calls: Arc::clone(&self.calls),
            replies: Arc::clone(&self.replies),
            peer_closed: Arc::clone(&self.peer_closed),
            closed: AtomicBool::new(false),
        }))
    }
}

/// Endpoint produced by [`MockTransport`].
pub struct MockEndpoint {
    name: String,
    calls: Arc<TransportCalls>,
    replies: Arc<Mutex<VecDeque<Element>>>,
    peer_closed: Arc<AtomicBool>,
    closed: AtomicBool,
}

#[async_trait]
impl Endpoint for MockEndpoint {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, element: &Element) -> Result<()> {
        if let Ok(mut sent) = self.calls.sent.lock() {
            sent.push(element.clone());
        }
        Ok(())
    }

    async fn submit(&self, element: Element, timeout: Duration) -> Result<Element> {
        if let Ok(mut submitted) = self.calls.submitted.lock() {
            submitted.push(element);
        }

        let reply = self.replies.lock().ok().and_then(|mut r| r.pop_front());
        match reply {
            Some(reply) => Ok(reply),
            None => {
                // No reply queued: wait out the deadline.
                let _ = tokio::time::timeout(timeout, std::future::pending::<()>()).await;
                Err(MsshError::Timeout(timeout))
            }
        }
    }

    async fn close(&self) -> Result<()> {
        self.calls.closes.fetch_add(1, Ordering::SeqCst);
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst) || self.peer_closed.load(Ordering::SeqCst)
    }
}
