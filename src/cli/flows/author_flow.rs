use chrono::NaiveDate;
use tracing::info;

use crate::cli::session::Session;
use crate::cli::ui::{confirm, PromptSpec, Prompted};
use crate::domain::Author;
use crate::errors::StoreError;
use crate::storage::Catalog;

use super::select::{select_or_create, Candidate};
use super::{ask_existing_id, format_date, parse_past_date, FlowOutcome, FlowResult};

pub fn list_authors(session: &mut Session) -> FlowOutcome<()> {
    session.heading("List all authors")?;
    session.say("All authors in the database\n")?;

    let authors = session.catalog.authors();
    if authors.is_empty() {
        session.say("No authors yet.")?;
    }
    for author in authors {
        let born = author
            .birthday
            .map(format_date)
            .unwrap_or_else(|| "unknown".into());
        session.say(format!(
            "{}, {} ({}) – Born {}",
            author.last_name, author.first_name, author.id, born
        ))?;
    }
    Ok(FlowResult::Completed(()))
}

/// Blank means unknown; anything else must be a date no later than today.
fn parse_birthday(input: &str, today: NaiveDate) -> Option<Option<NaiveDate>> {
    if input.trim().is_empty() {
        return Some(None);
    }
    parse_past_date(input, today).map(Some)
}

/// Collects name and birthday into `author`, pre-filled with its current
/// values. A name already used by another author ends the flow.
fn ask_author_details(session: &mut Session, mut author: Author) -> FlowOutcome<Author> {
    let Prompted::Value(first_name) = PromptSpec::text("First name", "Invalid first name.")
        .with_default(author.first_name.clone())
        .ask(session.terminal.as_mut())?
    else {
        return Ok(FlowResult::Canceled);
    };

    let Prompted::Value(last_name) = PromptSpec::text("Last name", "Invalid Last name.")
        .with_default(author.last_name.clone())
        .ask(session.terminal.as_mut())?
    else {
        return Ok(FlowResult::Canceled);
    };

    let editing = (author.id != 0).then_some(author.id);
    if session
        .catalog
        .author_name_exists(&first_name, &last_name, editing)
    {
        session.warning("Author already exists.")?;
        return Ok(FlowResult::Absent);
    }

    let today = session.today();
    let Prompted::Value(birthday) = PromptSpec::new(
        "Birthday (yyyy-mm-dd, blank if unknown)",
        "Invalid birthday.",
        move |input| parse_birthday(input, today),
    )
    .with_validator(move |input| parse_birthday(input, today).is_some())
    .with_default(author.birthday.map(format_date).unwrap_or_default())
    .ask(session.terminal.as_mut())?
    else {
        return Ok(FlowResult::Canceled);
    };

    author.first_name = first_name.trim().to_string();
    author.last_name = last_name.trim().to_string();
    author.birthday = birthday;
    Ok(FlowResult::Completed(author))
}

pub fn add_author(session: &mut Session) -> FlowOutcome<Author> {
    session.section("Add new author to the database")?;

    let author = match ask_author_details(session, Author::draft())?.completed() {
        Ok(author) => author,
        Err(stop) => return Ok(stop),
    };

    match session.catalog.create_author(author) {
        Ok(created) => {
            info!(id = created.id, "author added");
            session.success("New author was successfully added")?;
            Ok(FlowResult::Completed(created))
        }
        Err(err) => {
            session.report_update_failure(&err)?;
            Ok(FlowResult::Absent)
        }
    }
}

pub fn edit_author(session: &mut Session) -> FlowOutcome<Author> {
    session.section("Edit author")?;

    let Prompted::Value(id) = ask_existing_id(
        session.terminal.as_mut(),
        "Select author to edit by author id",
        "Invalid author id.",
        |id| session.catalog.author_exists(id),
    )?
    else {
        return Ok(FlowResult::Canceled);
    };

    let Some(author) = session.catalog.author(id) else {
        session.error("Couldn't fetch author.")?;
        return Ok(FlowResult::Absent);
    };

    let author = match ask_author_details(session, author)?.completed() {
        Ok(author) => author,
        Err(stop) => return Ok(stop),
    };

    match session.catalog.update_author(author) {
        Ok(updated) => {
            info!(id = updated.id, "author updated");
            session.success("Author was successfully updated")?;
            Ok(FlowResult::Completed(updated))
        }
        Err(err) => {
            session.report_update_failure(&err)?;
            Ok(FlowResult::Absent)
        }
    }
}

fn delete_author_cascade(catalog: &mut Catalog, id: u32) -> Result<bool, StoreError> {
    catalog.delete_inventory_by_author(id)?;
    catalog.delete_books_by_author(id)?;
    catalog.delete_author(id)
}

pub fn delete_author(session: &mut Session) -> FlowOutcome<()> {
    session.section("Delete author from database")?;

    let Prompted::Value(id) = ask_existing_id(
        session.terminal.as_mut(),
        "Select author to delete by author id",
        "Invalid author id.",
        |id| session.catalog.author_exists(id),
    )?
    else {
        return Ok(FlowResult::Canceled);
    };

    session.warning(
        "To delete an author every record referencing it is deleted as well:\n\
         - all books by the author in the store inventories\n\
         - all books by the author in the database",
    )?;

    let Prompted::Value(confirmed) = confirm(
        session.terminal.as_mut(),
        "Are you sure that you want to delete the author?",
    )?
    else {
        return Ok(FlowResult::Canceled);
    };
    if !confirmed {
        session.say("Canceled deletion of author.")?;
        return Ok(FlowResult::Absent);
    }

    match delete_author_cascade(&mut session.catalog, id) {
        Ok(true) => {
            info!(id, "author deleted");
            session.success("Author was successfully deleted")?;
            Ok(FlowResult::Completed(()))
        }
        Ok(false) => {
            session.error("Author no longer exists.")?;
            Ok(FlowResult::Absent)
        }
        Err(err) => {
            session.report_delete_failure(&err)?;
            Ok(FlowResult::Absent)
        }
    }
}

/// Select-or-create over the live author list, pre-selecting `current`.
pub fn select_author(session: &mut Session, current: Option<u32>) -> FlowOutcome<Author> {
    let candidates = session
        .catalog
        .authors()
        .into_iter()
        .map(|author| Candidate {
            id: author.id,
            label: author.full_name(),
            value: author,
        })
        .collect();
    select_or_create(session, "author", candidates, current, add_author)
}
