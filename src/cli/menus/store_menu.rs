use tracing::debug;

use crate::cli::flows::store_flow;
use crate::cli::session::Session;
use crate::cli::ui::{run_menu, LoopControl, Menu, MenuEntry, MenuResult};

use super::flow_entry;

pub fn show(session: &mut Session) -> MenuResult {
    run_menu(session, stores_menu)
}

/// One entry per store, rebuilt on every render so new stores show up.
fn stores_menu(session: &Session) -> Menu<Session> {
    let mut entries: Vec<MenuEntry<Session>> = session
        .catalog()
        .stores()
        .into_iter()
        .map(|store| {
            let id = store.id;
            MenuEntry::new(store.name, move |session: &mut Session| {
                show_inventory(session, id)
            })
        })
        .collect();
    entries.push(flow_entry("Add new store", store_flow::add_store));

    Menu::new("Stores", entries)
        .with_context(vec!["Select a store to view its inventory".to_string()])
}

pub fn show_inventory(session: &mut Session, store_id: u32) -> MenuResult {
    debug!(store_id, "opening inventory");
    run_menu(session, move |session| inventory_menu(session, store_id))
}

fn inventory_menu(session: &Session, store_id: u32) -> Menu<Session> {
    let overview = match session.catalog().store(store_id) {
        Some(store) => store_flow::inventory_overview(session.catalog(), &store),
        None => format!("Store {store_id} no longer exists."),
    };

    Menu::new(
        "Inventory Menu",
        vec![
            MenuEntry::new("Add book to store", move |session: &mut Session| {
                store_flow::add_book_to_store(session, store_id)?;
                Ok(LoopControl::Continue)
            }),
            MenuEntry::new("Remove book from store", move |session: &mut Session| {
                store_flow::remove_book_from_store(session, store_id)?;
                Ok(LoopControl::Continue)
            }),
        ],
    )
    .with_context(overview.lines().map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ui::test_mode::ScriptedTerminal;
    use crate::storage::catalog::tests::seeded;

    #[test]
    fn store_entries_open_live_inventory() {
        // Open Centrum, add two copies, then back out twice.
        let term = ScriptedTerminal::from_script("1\n1\n9789113084909<ENTER>2<ENTER>back\nback\n");
        let transcript = term.transcript();
        let mut session = Session::new(Box::new(term), seeded());
        show(&mut session).unwrap();

        let output = transcript.output();
        assert!(output.contains("1. Centrum\n2. Add new store\n"));
        assert!(output.contains("Qty: 4"));
        assert!(output.contains("Qty: 6"));
        assert_eq!(
            session.catalog().inventory_row(1, 9_789_113_084_909).unwrap().quantity,
            6
        );
    }

    #[test]
    fn added_store_appears_in_the_list() {
        let term = ScriptedTerminal::from_script(
            "2\nSöder<ENTER>Götgatan 1<ENTER>Stockholm<ENTER>Sweden<ENTER>118 46<ENTER>back\n",
        );
        let transcript = term.transcript();
        let mut session = Session::new(Box::new(term), seeded());
        show(&mut session).unwrap();
        assert!(transcript.output().contains("2. Söder\n3. Add new store\n"));
    }

    #[test]
    fn empty_store_says_so() {
        let mut catalog = seeded();
        catalog.delete_inventory(1, 9_789_113_084_909).unwrap();
        let term = ScriptedTerminal::from_script("1\nback\nback\n");
        let transcript = term.transcript();
        let mut session = Session::new(Box::new(term), catalog);
        show(&mut session).unwrap();
        assert!(transcript.output().contains(store_flow::EMPTY_INVENTORY));
    }
}
