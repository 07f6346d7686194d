//! Transport abstraction for mssh.
//!
//! Provides a trait-based interface to message-stream peers so the session
//! loop can run against the TCP transport or an in-memory mock.

mod mock;
mod tcp;

pub use mock::{MockEndpoint, MockTransport, TransportCalls};
pub use tcp::TcpTransport;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::element::Element;
use crate::error::Result;

/// Callback for packets that arrive without a pending request.
///
/// The handler may only display the packet; it runs on the transport's reader
/// task and has no access to session state.
pub type InboundHandler = Arc<dyn Fn(Element) + Send + Sync>;

/// Dials peers and produces endpoints.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Opens a connection to `address`, identifying the local side as `local_name`.
    async fn connect(&self, address: &str, local_name: &str) -> Result<Box<dyn Endpoint>>;
}

/// A live connection to a peer.
#[async_trait]
pub trait Endpoint: Send + Sync {
    /// Display name of the endpoint (the local identity it was opened with).
    fn name(&self) -> &str;

    /// Transmits a packet without waiting for a reply.
    async fn send(&self, element: &Element) -> Result<()>;

    /// Transmits a request and waits up to `timeout` for its reply.
    ///
    /// A zero timeout returns `Timeout` unless the reply is already available.
    async fn submit(&self, element: Element, timeout: Duration) -> Result<Element>;

    /// Closes the connection.
    async fn close(&self) -> Result<()>;

    /// True once the connection is gone, whether closed locally or by the peer.
    fn is_closed(&self) -> bool;
}
