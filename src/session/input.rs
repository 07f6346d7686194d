//! Queue of expanded shortcut lines waiting to be executed.

use std::collections::VecDeque;

use crate::error::{MsshError, Result};

/// Maximum number of shortcut expansions per interactive line.
pub const MAX_SHORTCUT_NESTING: usize = 10;

/// Lines queued by shortcut expansion, with the nesting depth that produced them.
///
/// Depth is reset when the operator enters a fresh line and grows by one for
/// every expansion pushed since. It never exceeds the configured limit.
#[derive(Debug, Clone)]
pub struct PendingInput {
    lines: VecDeque<String>,
    depth: usize,
    max_depth: usize,
}

impl Default for PendingInput {
    fn default() -> Self {
        Self::new()
    }
}

impl PendingInput {
    /// Creates an empty queue with the default nesting limit.
    pub fn new() -> Self {
        Self::with_max_depth(MAX_SHORTCUT_NESTING)
    }

    /// Creates an empty queue with a custom nesting limit.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            depth: 0,
            max_depth,
        }
    }

    /// Queues an expanded line.
    ///
    /// Fails with `RecursionLimitExceeded` once the depth limit is reached;
    /// the queue is emptied so the next read comes from the operator.
    pub fn push(&mut self, line: String) -> Result<()> {
        if self.depth >= self.max_depth {
            self.lines.clear();
            return Err(MsshError::RecursionLimitExceeded);
        }
        self.depth += 1;
        self.lines.push_back(line);
        Ok(())
    }

    /// Takes the next queued line. Depth is left unchanged.
    pub fn pop(&mut self) -> Option<String> {
        self.lines.pop_front()
    }

    /// Marks the start of a fresh interactive line.
    pub fn reset_depth(&mut self) {
        self.depth = 0;
    }

    /// Drops all queued lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of queued lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
