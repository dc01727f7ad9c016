use crate::cli::flows::author_flow;
use crate::cli::session::Session;
use crate::cli::ui::{run_menu, Menu, MenuResult};

use super::flow_entry;

pub fn show(session: &mut Session) -> MenuResult {
    run_menu(session, |_| menu())
}

fn menu() -> Menu<Session> {
    Menu::new(
        "Authors",
        vec![
            flow_entry("List all authors", author_flow::list_authors),
            flow_entry("Add new author", author_flow::add_author),
            flow_entry("Edit author", author_flow::edit_author),
            flow_entry("Delete author", author_flow::delete_author),
        ],
    )
}
