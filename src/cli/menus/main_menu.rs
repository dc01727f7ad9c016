use crate::cli::session::Session;
use crate::cli::ui::{run_menu, LoopControl, Menu, MenuEntry, MenuResult};

use super::{author_menu, book_menu, publisher_menu, store_menu};

pub const TITLE: &str = "Book Store";
pub const FAREWELL: &str = "Goodbye, until next time!";

/// Runs until the user quits or types `back` at the top level.
pub fn show(session: &mut Session) -> MenuResult {
    run_menu(session, |_| menu())
}

fn menu() -> Menu<Session> {
    Menu::new(
        TITLE,
        vec![
            MenuEntry::new("Manage stores", store_menu::show),
            MenuEntry::new("Manage books", book_menu::show),
            MenuEntry::new("Manage authors", author_menu::show),
            MenuEntry::new("Manage publishers", publisher_menu::show),
            MenuEntry::new("Quit", quit),
        ],
    )
}

fn quit(session: &mut Session) -> MenuResult {
    session.say(format!("\n{FAREWELL}"))?;
    Ok(LoopControl::Exit)
}
