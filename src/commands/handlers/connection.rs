//! Connection command handlers (!connect, !disconnect, !login).

use tracing::{info, warn};

use super::CommandContext;
use crate::commands::output::CommandOutput;
use crate::element::{Element, Packet, REQUEST};
use crate::error::{MsshError, Result};
use crate::session::state::UNKNOWN_PEER;

/// Packet type of the login request.
pub const LOGIN_TYPE: &str = "_Login";

/// Handle !connect <address>.
///
/// Any open connection is closed before dialing. If the dial fails the
/// session stays disconnected.
pub async fn handle_connect(ctx: &mut CommandContext<'_>, address: &str) -> Result<CommandOutput> {
    let mut lines = Vec::new();

    if let Some(old) = ctx.state.take_endpoint() {
        lines.push(format!("Disconnecting from: {}", old.name()));
        if let Err(e) = old.close().await {
            warn!("Error closing previous connection: {e}");
        }
        ctx.state.peer_name = UNKNOWN_PEER.to_string();
    }

    let endpoint = ctx.transport.connect(address, &ctx.state.name).await?;
    ctx.state.set_endpoint(endpoint);
    info!("Connected to {address}");

    lines.push(format!("Connected to: {address}"));
    Ok(CommandOutput::Lines(lines))
}

/// Handle !disconnect. Fails with `NotConnected` when nothing is open.
pub async fn handle_disconnect(ctx: &mut CommandContext<'_>) -> Result<CommandOutput> {
    let endpoint = ctx.state.take_endpoint().ok_or(MsshError::NotConnected)?;
    ctx.state.peer_name = UNKNOWN_PEER.to_string();

    let output = CommandOutput::info(format!("Disconnecting from: {}", endpoint.name()));
    endpoint.close().await?;
    Ok(output)
}

/// Handle !login: submit a login request and record the peer's name.
pub async fn handle_login(ctx: &mut CommandContext<'_>) -> Result<CommandOutput> {
    let timeout = ctx.state.timeout;
    let endpoint = ctx.state.endpoint().ok_or(MsshError::NotConnected)?;

    let request = Element::new(REQUEST)
        .with_attribute("Type", LOGIN_TYPE)
        .with_attribute("Name", endpoint.name());
    let reply = Packet::new(endpoint, request).submit(timeout).await?;

    ctx.state.peer_name = reply.attribute_or("Name", UNKNOWN_PEER).to_string();
    info!("Logged in to {}", ctx.state.peer_name);
    Ok(CommandOutput::info(format!("Login reply: {reply}")))
}
