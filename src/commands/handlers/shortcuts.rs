//! Shortcut handlers (!shortcut and @name invocations).

use tracing::{debug, info};

use super::CommandContext;
use crate::commands::output::CommandOutput;
use crate::commands::router::ShortcutArgs;
use crate::error::Result;
use crate::shortcuts::Invocation;

/// Handle !shortcut [name [definition...]].
pub fn handle_shortcut(ctx: &mut CommandContext<'_>, args: ShortcutArgs) -> Result<CommandOutput> {
    match args {
        ShortcutArgs::List => {
            let lines: Vec<String> = ctx
                .state
                .shortcuts
                .iter()
                .map(|(name, definition)| format!("{name} -> {definition}"))
                .collect();
            if lines.is_empty() {
                return Ok(CommandOutput::info("No shortcuts defined"));
            }
            Ok(CommandOutput::Lines(lines))
        }
        ShortcutArgs::Show(name) => Ok(match ctx.state.shortcuts.get(&name) {
            Some(definition) => CommandOutput::info(format!("Defined: {name} -> {definition}")),
            None => CommandOutput::info(format!("No definition for shortcut named: {name}")),
        }),
        ShortcutArgs::Define { name, definition } => {
            let output = CommandOutput::info(format!("Defined: {name} -> {definition}"));
            ctx.state.shortcuts.define(name, definition);
            ctx.store.save(&ctx.state.shortcuts)?;
            info!("Saved shortcuts to {}", ctx.store.path().display());
            Ok(output)
        }
    }
}

/// Handle @name args: expand, then preview or queue the result.
///
/// A queued line runs on the next loop iteration. Queuing fails once the
/// nesting limit is hit, which also empties the queue.
pub fn handle_invocation(
    ctx: &mut CommandContext<'_>,
    invocation: &Invocation,
) -> Result<CommandOutput> {
    let expansion = invocation.expand(&ctx.state.shortcuts)?;

    if invocation.preview {
        return Ok(CommandOutput::info(format!("?-> {expansion}")));
    }

    debug!(
        "Queueing expansion of {} at depth {}",
        invocation.name,
        ctx.state.pending.depth() + 1
    );
    ctx.state.pending.push(expansion)?;
    Ok(CommandOutput::None)
}
