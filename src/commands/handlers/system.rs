//! System command handlers (!quit, !timeout, !name, !help).

use std::time::Duration;

use tracing::{info, warn};

use super::CommandContext;
use crate::commands::help::HELP_TEXT;
use crate::commands::output::CommandOutput;

/// Handle !quit: close any open connection and end the session.
pub async fn handle_quit(ctx: &mut CommandContext<'_>) -> CommandOutput {
    if let Some(endpoint) = ctx.state.take_endpoint() {
        if let Err(e) = endpoint.close().await {
            warn!("Error closing connection on quit: {e}");
        }
    }
    CommandOutput::quit()
}

/// Handle !timeout <seconds>.
pub fn handle_timeout(ctx: &mut CommandContext<'_>, timeout: Duration) -> CommandOutput {
    ctx.state.timeout = timeout;
    info!("Request timeout set to {timeout:?}");
    CommandOutput::info(format!("Request timeout set to {timeout:?}"))
}

/// Handle !name <name>. Takes effect on the next connection.
pub fn handle_name(ctx: &mut CommandContext<'_>, name: String) -> CommandOutput {
    let output = CommandOutput::info(format!("Name set to {name}"));
    ctx.state.name = name;
    output
}

/// Handle !help.
pub fn handle_help() -> CommandOutput {
    CommandOutput::info(HELP_TEXT)
}
