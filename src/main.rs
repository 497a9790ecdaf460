mod config;
mod console;
mod data;
mod error;
mod session;
mod stats;

use std::io;
use std::path::Path;

use config::{ExplorerConfig, CONFIG_FILE};
use console::prompt::Console;
use session::Session;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = ExplorerConfig::load_or_default(Path::new(CONFIG_FILE))?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(config, Console::new(stdin.lock(), stdout.lock()));

    session.run()
}
