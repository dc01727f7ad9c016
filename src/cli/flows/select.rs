use tracing::debug;

use crate::cli::session::Session;
use crate::cli::ui::menu::parse_choice;
use crate::cli::ui::{PromptSpec, Prompted};

use super::{FlowOutcome, FlowResult};

/// Position reserved for "create new" in a select-or-create list.
pub const CREATE_NEW: usize = 1;

pub struct Candidate<T> {
    pub id: u32,
    pub label: String,
    pub value: T,
}

/// The default choice text: the position of `current` in the list (offset
/// past the create-new slot), or empty when nothing is being edited.
pub fn default_choice<T>(candidates: &[Candidate<T>], current: Option<u32>) -> String {
    current
        .and_then(|id| candidates.iter().position(|c| c.id == id))
        .map(|index| (index + CREATE_NEW + 1).to_string())
        .unwrap_or_default()
}

/// Lets the user pick an existing record or create one inline at position 1.
///
/// A canceled choice propagates as [`FlowResult::Canceled`]. When the user
/// opts to create, whatever the create flow yields becomes the result, with
/// a cancel inside it reported as [`FlowResult::Absent`].
pub fn select_or_create<T>(
    session: &mut Session,
    noun: &str,
    candidates: Vec<Candidate<T>>,
    current: Option<u32>,
    create: impl FnOnce(&mut Session) -> FlowOutcome<T>,
) -> FlowOutcome<T> {
    session.section(&format!("Select or create a new {noun}"))?;
    session.say(format!("{CREATE_NEW}. Create new {noun}"))?;
    for (index, candidate) in candidates.iter().enumerate() {
        session.say(format!("{}. {}", index + CREATE_NEW + 1, candidate.label))?;
    }
    session.say("")?;

    let options = candidates.len() + 1;
    let choice = PromptSpec::new(
        "Choice",
        "Invalid input. Please select from the list above.",
        move |input| parse_choice(input, options),
    )
    .with_validator(move |input| parse_choice(input, options).is_some())
    .with_default(default_choice(&candidates, current))
    .ask(session.terminal.as_mut())?;

    let Prompted::Value(choice) = choice else {
        debug!(noun, "selection canceled");
        return Ok(FlowResult::Canceled);
    };

    if choice == CREATE_NEW {
        return Ok(match create(session)? {
            FlowResult::Canceled => FlowResult::Absent,
            other => other,
        });
    }

    Ok(candidates
        .into_iter()
        .nth(choice - CREATE_NEW - 1)
        .map_or(FlowResult::Absent, |candidate| {
            FlowResult::Completed(candidate.value)
        }))
}
