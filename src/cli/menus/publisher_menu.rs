use crate::cli::flows::publisher_flow;
use crate::cli::session::Session;
use crate::cli::ui::{run_menu, Menu, MenuResult};

use super::flow_entry;

pub fn show(session: &mut Session) -> MenuResult {
    run_menu(session, |_| menu())
}

fn menu() -> Menu<Session> {
    Menu::new(
        "Publishers",
        vec![
            flow_entry("List all publishers", publisher_flow::list_publishers),
            flow_entry("Add new publisher", publisher_flow::add_publisher),
            flow_entry("Edit publisher", publisher_flow::edit_publisher),
            flow_entry("Delete publisher", publisher_flow::delete_publisher),
        ],
    )
}
