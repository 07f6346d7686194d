//! Control command handlers for mssh.
//!
//! Each handler takes the command context and returns the output to show,
//! or an error for the session loop to report.

pub mod connection;
pub mod shortcuts;
pub mod system;

use tracing::debug;

use super::output::CommandOutput;
use super::router::Command;
use crate::error::Result;
use crate::persistence::ShortcutStore;
use crate::session::SessionState;
use crate::transport::Transport;

/// Context provided to command handlers.
pub struct CommandContext<'a> {
    /// Session state, exclusively borrowed for the duration of the command.
    pub state: &'a mut SessionState,
    /// Transport used to open new connections.
    pub transport: &'a dyn Transport,
    /// Shortcut store, rewritten after every definition.
    pub store: &'a ShortcutStore,
}

/// Runs a parsed control command.
pub async fn dispatch(command: Command, ctx: &mut CommandContext<'_>) -> Result<CommandOutput> {
    debug!("Dispatching {:?}", command);

    match command {
        Command::Quit => Ok(system::handle_quit(ctx).await),
        Command::Timeout(timeout) => Ok(system::handle_timeout(ctx, timeout)),
        Command::Name(name) => Ok(system::handle_name(ctx, name)),
        Command::Help => Ok(system::handle_help()),
        Command::Connect(address) => connection::handle_connect(ctx, &address).await,
        Command::Disconnect => connection::handle_disconnect(ctx).await,
        Command::Login => connection::handle_login(ctx).await,
        Command::Shortcut(args) => shortcuts::handle_shortcut(ctx, args),
    }
}
