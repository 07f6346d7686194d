//! The interactive session loop.
//!
//! The loop owns [`SessionState`] exclusively. Each cycle takes the next line
//! (a queued shortcut expansion if there is one, otherwise operator input),
//! classifies it, and runs it. Errors are reported and the loop carries on;
//! only `!quit` or end of input stops it.

pub mod input;
pub mod state;

pub use input::{PendingInput, MAX_SHORTCUT_NESTING};
pub use state::SessionState;

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::{debug, info, warn};

use crate::commands::handlers::{self, shortcuts::handle_invocation, CommandContext};
use crate::commands::{CommandOutput, CommandRouter, InputLine};
use crate::element::{parse_packet_line, Packet};
use crate::error::{MsshError, Result};
use crate::persistence::ShortcutStore;
use crate::session::state::UNKNOWN_PEER;
use crate::transport::Transport;

/// An interactive shell session.
pub struct Session {
    state: SessionState,
    transport: Box<dyn Transport>,
    store: ShortcutStore,
}

impl Session {
    /// Creates a session from its state, transport, and shortcut store.
    pub fn new(state: SessionState, transport: Box<dyn Transport>, store: ShortcutStore) -> Self {
        Self {
            state,
            transport,
            store,
        }
    }

    /// Current session state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Mutable access to the session state.
    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    /// Runs the loop until `!quit` or end of input.
    ///
    /// Output errors end the loop; everything else is reported as
    /// `Error: ...` and the next line is read.
    pub async fn run<R, W>(&mut self, input: R, output: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();

        loop {
            let Some(line) = self.next_line(&mut lines, output).await? else {
                debug!("End of input");
                break;
            };

            match self.execute(&line, output).await {
                Ok(result) if result.is_quit() => return Ok(()),
                Ok(result) => write!(output, "{result}")?,
                Err(e) => {
                    warn!("{}: {}", e.category(), e);
                    writeln!(output, "Error: {e}")?;
                }
            }
        }

        if let Some(endpoint) = self.state.take_endpoint() {
            if let Err(e) = endpoint.close().await {
                warn!("Error closing connection at end of input: {e}");
            }
        }
        Ok(())
    }

    /// Returns the next line to execute, or `None` at end of input.
    async fn next_line<R, W>(&mut self, lines: &mut Lines<R>, output: &mut W) -> Result<Option<String>>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        self.drop_closed_endpoint(output)?;

        if let Some(line) = self.state.pending.pop() {
            writeln!(output, "-> {line}")?;
            return Ok(Some(line));
        }

        self.state.pending.reset_depth();
        write!(output, "{}", self.state.prompt())?;
        output.flush()?;

        Ok(lines.next_line().await?)
    }

    /// Uninstalls an endpoint whose peer has gone away.
    ///
    /// The transport only marks the endpoint closed; the loop owns the
    /// state and does the cleanup here, before the next prompt.
    fn drop_closed_endpoint<W: Write>(&mut self, output: &mut W) -> Result<()> {
        if !self.state.endpoint().is_some_and(|e| e.is_closed()) {
            return Ok(());
        }

        if let Some(endpoint) = self.state.take_endpoint() {
            info!("Connection for {} closed by peer", endpoint.name());
            writeln!(output, "Connection closed by peer")?;
        }
        self.state.peer_name = UNKNOWN_PEER.to_string();
        Ok(())
    }

    /// Classifies and runs a single line.
    ///
    /// Packet echoes are written to `output` before transmission so they
    /// appear even when the transport then fails.
    pub async fn execute<W: Write>(&mut self, line: &str, output: &mut W) -> Result<CommandOutput> {
        match CommandRouter::classify(line)? {
            InputLine::Blank => Ok(CommandOutput::None),
            InputLine::Control(command) => {
                let mut ctx = CommandContext {
                    state: &mut self.state,
                    transport: self.transport.as_ref(),
                    store: &self.store,
                };
                handlers::dispatch(command, &mut ctx).await
            }
            InputLine::Shortcut(invocation) => {
                let mut ctx = CommandContext {
                    state: &mut self.state,
                    transport: self.transport.as_ref(),
                    store: &self.store,
                };
                handle_invocation(&mut ctx, &invocation)
            }
            InputLine::Packet(line) => self.execute_packet(&line, output).await,
        }
    }

    async fn execute_packet<W: Write>(&mut self, line: &str, output: &mut W) -> Result<CommandOutput> {
        let endpoint = self.state.endpoint().ok_or(MsshError::NotConnected)?;
        let packet = Packet::new(endpoint, parse_packet_line(line)?);

        if packet.is_request() {
            writeln!(output, "Submitting: {packet}")?;
            let reply = packet.submit(self.state.timeout).await?;
            Ok(CommandOutput::info(format!("Got reply: {reply}")))
        } else {
            writeln!(output, "Sending: {packet}")?;
            packet.send().await?;
            Ok(CommandOutput::None)
        }
    }
}
