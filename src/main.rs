//! mssh - Message Stream Shell.

mod cli;
mod logging;

use std::io::Write;
use std::sync::Arc;

use cli::Cli;
use mssh::config::Config;
use mssh::element::Element;
use mssh::error::Result;
use mssh::persistence::ShortcutStore;
use mssh::session::{Session, SessionState};
use mssh::shortcuts::ShortcutTable;
use mssh::transport::TcpTransport;
use tokio::io::BufReader;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    let target = logging::init(logging::LogTarget::from_flag(cli.log_file));
    info!("Logging to {:?}", target);

    if let Err(e) = run(cli).await {
        error!("{}: {}", e.category(), e);
        eprintln!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let config = Config::load_from_file(&config_path)?;
    let settings = cli.resolve(&config)?;

    let mut stdout = std::io::stdout();

    let store = ShortcutStore::new(&settings.shortcuts_file);
    let shortcuts = match store.load() {
        Ok(shortcuts) => shortcuts,
        Err(e) => {
            writeln!(stdout, "Error loading shortcuts: {e}")?;
            ShortcutTable::new()
        }
    };

    let transport = TcpTransport::new(Arc::new(|packet: Element| println!("Received: {packet}")));
    let state = SessionState::new(settings.name, settings.timeout, shortcuts);
    let mut session = Session::new(state, Box::new(transport), store);

    if let Some(address) = settings.connect {
        match session.execute(&format!("!connect {address}"), &mut stdout).await {
            Ok(output) => write!(stdout, "{output}")?,
            Err(e) => writeln!(stdout, "Error: {e}")?,
        }
    }

    session
        .run(BufReader::new(tokio::io::stdin()), &mut stdout)
        .await
}
