use tracing::info;

use crate::cli::session::Session;
use crate::cli::ui::{PromptSpec, Prompted};
use crate::domain::book::format_isbn13;
use crate::domain::{Inventory, Store};
use crate::storage::Catalog;

use super::{ask_existing_isbn, FlowOutcome, FlowResult};

pub const EMPTY_INVENTORY: &str = "Inventory is empty";

pub fn add_store(session: &mut Session) -> FlowOutcome<Store> {
    session.section("Add new store")?;

    let mut fields = Vec::with_capacity(5);
    for (label, error) in [
        ("Name", "Invalid name."),
        ("Address", "Invalid address."),
        ("City", "Invalid city."),
        ("Country", "Invalid country."),
        ("Postal code", "Invalid postal code."),
    ] {
        let Prompted::Value(value) =
            PromptSpec::text(label, error).ask(session.terminal.as_mut())?
        else {
            return Ok(FlowResult::Canceled);
        };
        fields.push(value.trim().to_string());
    }

    let mut fields = fields.into_iter();
    let mut next = || fields.next().unwrap_or_default();
    let store = Store {
        id: 0,
        name: next(),
        address: next(),
        city: next(),
        country: next(),
        postal_code: next(),
    };

    match session.catalog.create_store(store) {
        Ok(created) => {
            info!(id = created.id, "store added");
            session.success("New store was successfully added")?;
            Ok(FlowResult::Completed(created))
        }
        Err(err) => {
            session.report_update_failure(&err)?;
            Ok(FlowResult::Absent)
        }
    }
}

/// One line per stocked book: `Title (isbn) – First Last – Qty: n – Price: p kr`.
pub fn inventory_lines(catalog: &Catalog, store_id: u32) -> Vec<String> {
    catalog
        .store_inventory(store_id)
        .into_iter()
        .filter_map(|row| {
            let book = catalog.book(row.isbn13)?;
            let author = catalog
                .author(book.author_id)
                .map(|a| a.full_name())
                .unwrap_or_default();
            Some(format!(
                "{} ({}) – {} – Qty: {} – Price: {} kr",
                book.title,
                format_isbn13(book.isbn13),
                author,
                row.quantity,
                book.price_sek
            ))
        })
        .collect()
}

/// Header text for a store's inventory menu.
pub fn inventory_overview(catalog: &Catalog, store: &Store) -> String {
    let lines = inventory_lines(catalog, store.id);
    let body = if lines.is_empty() {
        EMPTY_INVENTORY.to_string()
    } else {
        lines.join("\n")
    };
    format!("Inventory for {}:\n\n{body}", store.name)
}

fn parse_quantity(input: &str, max: u32) -> Option<u32> {
    input
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|quantity| (1..=max).contains(quantity))
}

pub fn add_book_to_store(session: &mut Session, store_id: u32) -> FlowOutcome<Inventory> {
    session.section("Add book to store")?;
    session.say("Add a book that already exists in books\n")?;

    let Prompted::Value(isbn13) = ask_existing_isbn(
        session.terminal.as_mut(),
        "ISBN13",
        |isbn| session.catalog.book_exists(isbn),
    )?
    else {
        return Ok(FlowResult::Canceled);
    };

    let Prompted::Value(quantity) = PromptSpec::new(
        "Quantity",
        "Invalid quantity. Quantity must be greater than 0.",
        |input| parse_quantity(input, u32::MAX),
    )
    .with_validator(|input| parse_quantity(input, u32::MAX).is_some())
    .ask(session.terminal.as_mut())?
    else {
        return Ok(FlowResult::Canceled);
    };

    let written = match session.catalog.inventory_row(store_id, isbn13) {
        Some(mut row) => {
            row.quantity = row.quantity.saturating_add(quantity);
            session.catalog.update_inventory(row)
        }
        None => session.catalog.create_inventory(Inventory {
            store_id,
            isbn13,
            quantity,
        }),
    };

    match written {
        Ok(row) => {
            info!(store_id, isbn13, quantity = row.quantity, "stock added");
            session.success("Added book(s) successfully.")?;
            Ok(FlowResult::Completed(row))
        }
        Err(err) => {
            session.report_update_failure(&err)?;
            Ok(FlowResult::Absent)
        }
    }
}

pub fn remove_book_from_store(session: &mut Session, store_id: u32) -> FlowOutcome<()> {
    session.section("Remove book from store")?;

    let Prompted::Value(isbn13) = ask_existing_isbn(
        session.terminal.as_mut(),
        "ISBN13",
        |isbn| session.catalog.book_exists(isbn),
    )?
    else {
        return Ok(FlowResult::Canceled);
    };

    let Some(mut row) = session.catalog.inventory_row(store_id, isbn13) else {
        session.warning("Book does not exist in this store's inventory.")?;
        return Ok(FlowResult::Absent);
    };

    session.say(format!("\nCurrent quantity: {}", row.quantity))?;

    if row.quantity > 0 {
        let stocked = row.quantity;
        let Prompted::Value(amount) = PromptSpec::new(
            "Quantity to remove",
            format!("Invalid quantity. Remove between 1 and {stocked}."),
            move |input| parse_quantity(input, stocked),
        )
        .with_validator(move |input| parse_quantity(input, stocked).is_some())
        .ask(session.terminal.as_mut())?
        else {
            return Ok(FlowResult::Canceled);
        };
        row.quantity -= amount;
    }

    if row.quantity > 0 {
        return match session.catalog.update_inventory(row) {
            Ok(_) => {
                session.success("Decreased quantity successfully.")?;
                Ok(FlowResult::Completed(()))
            }
            Err(err) => {
                session.report_update_failure(&err)?;
                Ok(FlowResult::Absent)
            }
        };
    }

    session.say(
        "\nQuantity is now 0.\n\
         Would you like to remove this book entirely from the inventory list?\n\
         Type \"yes\" to confirm or anything else to keep it with quantity 0.",
    )?;
    let Prompted::Value(answer) = PromptSpec::text("Choice", "")
        .with_validator(|_| true)
        .ask(session.terminal.as_mut())?
    else {
        return Ok(FlowResult::Canceled);
    };

    if answer.trim().eq_ignore_ascii_case("yes") {
        match session.catalog.delete_inventory(store_id, isbn13) {
            Ok(_) => session.success("Book removed from inventory entirely.")?,
            Err(err) => {
                session.report_delete_failure(&err)?;
                return Ok(FlowResult::Absent);
            }
        }
    } else {
        match session.catalog.update_inventory(row) {
            Ok(_) => session.say("Inventory entry kept with quantity 0.")?,
            Err(err) => {
                session.report_update_failure(&err)?;
                return Ok(FlowResult::Absent);
            }
        }
    }
    info!(store_id, isbn13, "stock emptied");
    Ok(FlowResult::Completed(()))
}
