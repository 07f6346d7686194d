//! Help text for mssh control commands.

/// Help text displayed for the !help command.
pub const HELP_TEXT: &str = r#"Control commands (only the first letter matters):
  !connect <address>       - Connect to a service, closing any open connection
  !disconnect              - Close the open connection
  !login                   - Send a login request with the current name
  !name <name>             - Set the name used for future connections
  !timeout <seconds>       - Set the request timeout (fractions allowed)
  !shortcut                - List shortcuts
  !shortcut <name>         - Show one shortcut
  !shortcut <name> <line>  - Define a shortcut ($1..$9 are arguments)
  !help                    - Show this help message
  !quit                    - Exit

Shortcuts:
  @<name> [args...]        - Expand and run a shortcut
  @?<name> [args...]       - Show the expansion without running it

Packets:
  <type> [name=value...] [text...] [<child ... >]   - Send a message
  ? <type> ...                                      - Submit a request and wait for the reply"#;
