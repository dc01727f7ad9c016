use tracing::info;

use crate::cli::session::Session;
use crate::cli::ui::{confirm, PromptSpec, Prompted};
use crate::domain::Publisher;
use crate::errors::StoreError;
use crate::storage::Catalog;

use super::select::{select_or_create, Candidate};
use super::{ask_existing_id, FlowOutcome, FlowResult};

pub fn list_publishers(session: &mut Session) -> FlowOutcome<()> {
    session.heading("List all publishers")?;
    session.say("All publishers in the database\n")?;

    let publishers = session.catalog.publishers();
    if publishers.is_empty() {
        session.say("No publishers yet.")?;
    }
    for publisher in publishers {
        session.say(format!("{} ({})", publisher.name, publisher.id))?;
    }
    Ok(FlowResult::Completed(()))
}

fn ask_publisher_name(session: &mut Session, mut publisher: Publisher) -> FlowOutcome<Publisher> {
    let Prompted::Value(name) = PromptSpec::text("Name", "Invalid name.")
        .with_default(publisher.name.clone())
        .ask(session.terminal.as_mut())?
    else {
        return Ok(FlowResult::Canceled);
    };

    let editing = (publisher.id != 0).then_some(publisher.id);
    if session.catalog.publisher_name_exists(&name, editing) {
        session.warning("Publisher already exists.")?;
        return Ok(FlowResult::Absent);
    }

    publisher.name = name.trim().to_string();
    Ok(FlowResult::Completed(publisher))
}

pub fn add_publisher(session: &mut Session) -> FlowOutcome<Publisher> {
    session.section("Add new publisher to the database")?;

    let publisher = match ask_publisher_name(session, Publisher::draft())?.completed() {
        Ok(publisher) => publisher,
        Err(stop) => return Ok(stop),
    };

    match session.catalog.create_publisher(publisher) {
        Ok(created) => {
            info!(id = created.id, "publisher added");
            session.success("New publisher was successfully added")?;
            Ok(FlowResult::Completed(created))
        }
        Err(err) => {
            session.report_update_failure(&err)?;
            Ok(FlowResult::Absent)
        }
    }
}

pub fn edit_publisher(session: &mut Session) -> FlowOutcome<Publisher> {
    session.section("Edit publisher")?;

    let Prompted::Value(id) = ask_existing_id(
        session.terminal.as_mut(),
        "Select publisher to edit by publisher id",
        "Invalid publisher id.",
        |id| session.catalog.publisher_exists(id),
    )?
    else {
        return Ok(FlowResult::Canceled);
    };

    let Some(publisher) = session.catalog.publisher(id) else {
        session.error("Couldn't fetch publisher.")?;
        return Ok(FlowResult::Absent);
    };

    let publisher = match ask_publisher_name(session, publisher)?.completed() {
        Ok(publisher) => publisher,
        Err(stop) => return Ok(stop),
    };

    match session.catalog.update_publisher(publisher) {
        Ok(updated) => {
            info!(id = updated.id, "publisher updated");
            session.success("Publisher was successfully updated")?;
            Ok(FlowResult::Completed(updated))
        }
        Err(err) => {
            session.report_update_failure(&err)?;
            Ok(FlowResult::Absent)
        }
    }
}

fn delete_publisher_cascade(catalog: &mut Catalog, id: u32) -> Result<bool, StoreError> {
    catalog.delete_inventory_by_publisher(id)?;
    catalog.delete_books_by_publisher(id)?;
    catalog.delete_publisher(id)
}

pub fn delete_publisher(session: &mut Session) -> FlowOutcome<()> {
    session.section("Delete publisher from database")?;

    let Prompted::Value(id) = ask_existing_id(
        session.terminal.as_mut(),
        "Select publisher to delete by publisher id",
        "Invalid publisher id.",
        |id| session.catalog.publisher_exists(id),
    )?
    else {
        return Ok(FlowResult::Canceled);
    };

    session.warning(
        "To delete a publisher every record referencing it is deleted as well:\n\
         - all books from the publisher in the store inventories\n\
         - all books from the publisher in the database",
    )?;

    let Prompted::Value(confirmed) = confirm(
        session.terminal.as_mut(),
        "Are you sure that you want to delete the publisher?",
    )?
    else {
        return Ok(FlowResult::Canceled);
    };
    if !confirmed {
        session.say("Canceled deletion of publisher.")?;
        return Ok(FlowResult::Absent);
    }

    match delete_publisher_cascade(&mut session.catalog, id) {
        Ok(true) => {
            info!(id, "publisher deleted");
            session.success("Publisher was successfully deleted")?;
            Ok(FlowResult::Completed(()))
        }
        Ok(false) => {
            session.error("Publisher no longer exists.")?;
            Ok(FlowResult::Absent)
        }
        Err(err) => {
            session.report_delete_failure(&err)?;
            Ok(FlowResult::Absent)
        }
    }
}

pub fn select_publisher(session: &mut Session, current: Option<u32>) -> FlowOutcome<Publisher> {
    let candidates = session
        .catalog
        .publishers()
        .into_iter()
        .map(|publisher| Candidate {
            id: publisher.id,
            label: publisher.name.clone(),
            value: publisher,
        })
        .collect();
    select_or_create(session, "publisher", candidates, current, add_publisher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ui::test_mode::{ScriptedTerminal, Transcript};
    use crate::storage::catalog::tests::seeded;
    use crate::storage::JsonStorage;
    use tempfile::tempdir;

    fn session_with(catalog: Catalog, script: &str) -> (Session, Transcript) {
        let term = ScriptedTerminal::from_script(script);
        let transcript = term.transcript();
        (Session::new(Box::new(term), catalog), transcript)
    }

    #[test]
    fn add_publisher_assigns_next_id() {
        let (mut session, transcript) = session_with(seeded(), "Bonniers<ENTER>");
        let created = add_publisher(&mut session).unwrap().value().unwrap();
        assert_eq!(created.id, 2);
        assert_eq!(created.name, "Bonniers");
        assert!(transcript
            .output()
            .contains("New publisher was successfully added"));
    }

    #[test]
    fn duplicate_name_is_refused() {
        let (mut session, transcript) = session_with(seeded(), "NORSTEDTS<ENTER>");
        assert_eq!(add_publisher(&mut session).unwrap(), FlowResult::Absent);
        assert_eq!(session.catalog().publishers().len(), 1);
        assert!(transcript.output().contains("Publisher already exists."));
    }

    #[test]
    fn failed_write_is_reported_and_discarded() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let catalog = seeded().with_backend(JsonStorage::new(blocker.join("catalog.json")));

        let (mut session, transcript) = session_with(catalog, "Bonniers<ENTER>");
        assert_eq!(add_publisher(&mut session).unwrap(), FlowResult::Absent);
        assert_eq!(session.catalog().publishers().len(), 1);
        assert!(transcript
            .output()
            .contains(crate::cli::session::UPDATE_FAILED));
    }

    #[test]
    fn failed_delete_is_reported_and_publisher_kept() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let catalog = seeded().with_backend(JsonStorage::new(blocker.join("catalog.json")));

        let (mut session, transcript) = session_with(catalog, "1<ENTER>y<ENTER>");
        assert_eq!(delete_publisher(&mut session).unwrap(), FlowResult::Absent);
        assert!(session.catalog().publisher(1).is_some());
        assert_eq!(session.catalog().books().len(), 1);
        assert!(transcript
            .output()
            .contains(crate::cli::session::UPDATE_FAILED));
    }

    #[test]
    fn edit_keeps_own_name_and_renames() {
        let (mut session, _) =
            session_with(seeded(), "1<ENTER><BS><BS><BS><BS><BS><BS><BS><BS><BS>Norstedts förlag<ENTER>");
        let updated = edit_publisher(&mut session).unwrap().value().unwrap();
        assert_eq!(updated.name, "Norstedts förlag");
        assert_eq!(session.catalog().publisher(1).unwrap().name, "Norstedts förlag");
    }

    #[test]
    fn delete_cascades_books() {
        let (mut session, _) = session_with(seeded(), "1<ENTER>y<ENTER>");
        assert_eq!(
            delete_publisher(&mut session).unwrap(),
            FlowResult::Completed(())
        );
        assert!(session.catalog().publishers().is_empty());
        assert!(session.catalog().books().is_empty());
        assert!(session.catalog().store_inventory(1).is_empty());
    }

    #[test]
    fn escape_at_confirmation_cancels() {
        let (mut session, _) = session_with(seeded(), "1<ENTER><ESC>");
        assert!(delete_publisher(&mut session).unwrap().is_canceled());
        assert_eq!(session.catalog().publishers().len(), 1);
    }

    #[test]
    fn select_publisher_returns_listed_record() {
        let (mut session, transcript) = session_with(seeded(), "2<ENTER>");
        let publisher = select_publisher(&mut session, None).unwrap().value().unwrap();
        assert_eq!(publisher.name, "Norstedts");
        assert!(transcript.output().contains("2. Norstedts\n"));
    }
}
