//! Mutable state owned by the session loop.

use std::time::Duration;

use super::input::PendingInput;
use crate::shortcuts::ShortcutTable;
use crate::transport::Endpoint;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);
/// Default local identity.
pub const DEFAULT_NAME: &str = "mssh";
/// Peer name shown before a successful login.
pub const UNKNOWN_PEER: &str = "-?-";
/// Prompt label when no connection is open.
pub const NOT_OPEN: &str = "--Not open--";

/// Everything a session handler may read or change.
pub struct SessionState {
    endpoint: Option<Box<dyn Endpoint>>,
    /// How long a request waits for its reply.
    pub timeout: Duration,
    /// Local identity used for new connections and login.
    pub name: String,
    /// Peer name reported by the last login, for display only.
    pub peer_name: String,
    /// Defined shortcuts.
    pub shortcuts: ShortcutTable,
    /// Expanded shortcut lines awaiting execution.
    pub pending: PendingInput,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(DEFAULT_NAME, DEFAULT_TIMEOUT, ShortcutTable::new())
    }
}

impl SessionState {
    /// Creates a disconnected session.
    pub fn new(name: impl Into<String>, timeout: Duration, shortcuts: ShortcutTable) -> Self {
        Self {
            endpoint: None,
            timeout,
            name: name.into(),
            peer_name: UNKNOWN_PEER.to_string(),
            shortcuts,
            pending: PendingInput::new(),
        }
    }

    /// The open endpoint, if any.
    pub fn endpoint(&self) -> Option<&dyn Endpoint> {
        self.endpoint.as_deref()
    }

    /// True while an endpoint is installed.
    pub fn is_connected(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Installs a new endpoint, returning the previous one.
    pub fn set_endpoint(&mut self, endpoint: Box<dyn Endpoint>) -> Option<Box<dyn Endpoint>> {
        self.endpoint.replace(endpoint)
    }

    /// Removes and returns the open endpoint.
    pub fn take_endpoint(&mut self) -> Option<Box<dyn Endpoint>> {
        self.endpoint.take()
    }

    /// Prompt text: `[<endpoint> -> <peer>]: `.
    pub fn prompt(&self) -> String {
        let endpoint = self.endpoint().map_or(NOT_OPEN, |e| e.name());
        format!("[{} -> {}]: ", endpoint, self.peer_name)
    }
}
