use crate::cli::flows::book_flow;
use crate::cli::session::Session;
use crate::cli::ui::{run_menu, Menu, MenuResult};

use super::flow_entry;

pub fn show(session: &mut Session) -> MenuResult {
    run_menu(session, |_| menu())
}

fn menu() -> Menu<Session> {
    Menu::new(
        "Books",
        vec![
            flow_entry("List all books", book_flow::list_books),
            flow_entry("Add new book", book_flow::add_book),
            flow_entry("Edit book", book_flow::edit_book),
            flow_entry("Delete book", book_flow::delete_book),
        ],
    )
}
