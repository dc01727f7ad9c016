use std::{fmt, io};

use chrono::NaiveDate;
use tracing::warn;

use crate::errors::StoreError;
use crate::storage::Catalog;

use super::system_clock::{Clock, SystemClock};
use super::ui::formatting::{error_text, header_text, section_text, success_text, warning_text};
use super::ui::{Interaction, Terminal};

pub const UPDATE_FAILED: &str = "Database could not be updated.";
pub const DELETE_REFERENCED: &str = "Delete failed because the record is referenced elsewhere.";

/// Everything a flow needs: the terminal it talks to, the record store and a
/// clock. Fields are public to the crate so a prompt can borrow the terminal
/// while its validator borrows the catalog.
pub struct Session {
    pub(crate) terminal: Box<dyn Terminal>,
    pub(crate) catalog: Catalog,
    clock: Box<dyn Clock>,
}

impl Session {
    pub fn new(terminal: Box<dyn Terminal>, catalog: Catalog) -> Self {
        Self {
            terminal,
            catalog,
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn say(&mut self, text: impl fmt::Display) -> io::Result<()> {
        self.terminal.write(&format!("{text}\n"))
    }

    /// Clears the screen and prints a `=== Title ===` header.
    pub fn heading(&mut self, title: &str) -> io::Result<()> {
        self.terminal.clear_screen()?;
        self.say(format!("{}\n", header_text(title)))
    }

    pub fn section(&mut self, title: &str) -> io::Result<()> {
        self.say(format!("\n{}\n", section_text(title)))
    }

    pub fn success(&mut self, message: impl fmt::Display) -> io::Result<()> {
        self.say(success_text(message))
    }

    pub fn warning(&mut self, message: impl fmt::Display) -> io::Result<()> {
        self.say(warning_text(message))
    }

    pub fn error(&mut self, message: impl fmt::Display) -> io::Result<()> {
        self.say(error_text(message))
    }

    /// Reports a failed create or update. The flow discards its draft.
    pub fn report_update_failure(&mut self, err: &StoreError) -> io::Result<()> {
        warn!(error = %err, "record store rejected a write");
        self.error(UPDATE_FAILED)?;
        self.say(err)
    }

    pub fn report_delete_failure(&mut self, err: &StoreError) -> io::Result<()> {
        warn!(error = %err, "record store rejected a delete");
        match err {
            StoreError::Referenced(_) | StoreError::Constraint(_) => {
                self.error(DELETE_REFERENCED)?
            }
            StoreError::NotFound(_) | StoreError::Storage(_) => self.error(UPDATE_FAILED)?,
        }
        self.say(err)
    }
}

impl Interaction for Session {
    fn terminal(&mut self) -> &mut dyn Terminal {
        self.terminal.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ui::test_mode::{ScriptedTerminal, Transcript};
    use crate::storage::catalog::tests::seeded;
    use crate::storage::JsonStorage;

    fn session_with(catalog: Catalog) -> (Session, Transcript) {
        let term = ScriptedTerminal::from_script("");
        let transcript = term.transcript();
        (Session::new(Box::new(term), catalog), transcript)
    }

    #[test]
    fn referenced_delete_is_reported_and_record_kept() {
        let (mut session, transcript) = session_with(seeded());
        // Bob still has a book, so the store refuses to drop him.
        let err = session.catalog.delete_author(2).unwrap_err();
        assert!(matches!(err, StoreError::Referenced(_)));

        session.report_delete_failure(&err).unwrap();
        let output = transcript.output();
        assert!(output.contains(DELETE_REFERENCED));
        assert!(output.contains("Record is referenced by 1 book(s)"));
        assert!(session.catalog().author(2).is_some());
    }

    #[test]
    fn failed_delete_write_reports_update_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let catalog = seeded().with_backend(JsonStorage::new(blocker.join("catalog.json")));
        let (mut session, transcript) = session_with(catalog);

        let err = session.catalog.delete_author(1).unwrap_err();
        session.report_delete_failure(&err).unwrap();
        let output = transcript.output();
        assert!(output.contains(UPDATE_FAILED));
        assert!(!output.contains(DELETE_REFERENCED));
        assert!(session.catalog().author(1).is_some());
    }
}
