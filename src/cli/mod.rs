pub mod flows;
pub mod menus;
pub mod session;
pub mod system_clock;
pub mod ui;

use std::io;

use tracing::info;

use crate::config::ConfigManager;
use crate::errors::CliError;
use crate::storage::{Catalog, JsonStorage};

use self::session::Session;
use self::ui::formatting::set_plain_mode;
use self::ui::{CrosstermTerminal, ScriptedTerminal, Terminal};

/// Loads config and catalog, then runs the main menu until the user quits.
///
/// With `BOOKSTORE_TEST_KEYS` set, keys come from that script instead of the
/// keyboard and output is plain text.
pub fn run_cli() -> Result<(), CliError> {
    let manager = ConfigManager::new()?;
    let config = manager.load_or_create()?.with_env_overrides();

    let terminal: Box<dyn Terminal> = match ScriptedTerminal::from_env() {
        Some(scripted) => {
            set_plain_mode(true);
            Box::new(scripted)
        }
        None => {
            set_plain_mode(config.plain_mode);
            Box::new(CrosstermTerminal::new(config.pause()))
        }
    };

    let catalog = Catalog::open(JsonStorage::new(manager.data_path(&config)))?;
    let mut session = Session::new(terminal, catalog);

    match menus::main_menu::show(&mut session) {
        Ok(_) => Ok(()),
        Err(CliError::Io(err)) if err.kind() == io::ErrorKind::Interrupted => {
            info!("interrupted, leaving");
            Ok(())
        }
        Err(err) => Err(err),
    }
}
