//! Catalog menus. Each module builds its [`Menu`] from the live catalog and
//! runs it on the shared [`Session`].

pub mod author_menu;
pub mod book_menu;
pub mod main_menu;
pub mod publisher_menu;
pub mod store_menu;

use tracing::debug;

use crate::cli::flows::FlowOutcome;
use crate::cli::session::Session;
use crate::cli::ui::{LoopControl, MenuEntry};

/// Menu entry that runs `flow` and returns to the same menu whatever the
/// flow's outcome.
pub(crate) fn flow_entry<T: 'static>(
    label: &str,
    flow: fn(&mut Session) -> FlowOutcome<T>,
) -> MenuEntry<Session> {
    let name = label.to_string();
    MenuEntry::new(label, move |session: &mut Session| {
        if flow(session)?.is_canceled() {
            debug!(flow = %name, "flow canceled");
        }
        Ok(LoopControl::Continue)
    })
}
