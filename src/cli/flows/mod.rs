//! Multi-step tasks built from validated prompts.
//!
//! Every flow returns a [`FlowResult`]. Any canceled prompt aborts the whole
//! flow before its persistence call; store failures are reported to the user
//! and end the flow without retry.

pub mod author_flow;
pub mod book_flow;
pub mod publisher_flow;
pub mod select;
pub mod store_flow;

use std::io;

use chrono::NaiveDate;

use crate::domain::book::parse_isbn13;
use crate::errors::CliError;

use super::ui::{PromptSpec, Prompted, Terminal};

#[derive(Debug, Clone, PartialEq)]
pub enum FlowResult<T> {
    Completed(T),
    /// Ended without a value: a failed write, a duplicate, a declined
    /// confirmation or a missing record.
    Absent,
    /// The user pressed Escape.
    Canceled,
}

impl<T> FlowResult<T> {
    pub fn value(self) -> Option<T> {
        match self {
            FlowResult::Completed(value) => Some(value),
            FlowResult::Absent | FlowResult::Canceled => None,
        }
    }

    pub fn is_canceled(&self) -> bool {
        matches!(self, FlowResult::Canceled)
    }

    /// The completed value, or this outcome re-typed so the caller can
    /// return it as its own.
    pub fn completed<U>(self) -> Result<T, FlowResult<U>> {
        match self {
            FlowResult::Completed(value) => Ok(value),
            FlowResult::Absent => Err(FlowResult::Absent),
            FlowResult::Canceled => Err(FlowResult::Canceled),
        }
    }
}

pub type FlowOutcome<T> = Result<FlowResult<T>, CliError>;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Accepts `yyyy-mm-dd` and `yyyy/mm/dd`.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y/%m/%d"))
        .ok()
}

pub fn parse_past_date(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    parse_date(input).filter(|date| *date <= today)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Asks for an id accepted only when `exists` finds it in the store.
pub(crate) fn ask_existing_id(
    term: &mut dyn Terminal,
    label: &str,
    error: &str,
    exists: impl Fn(u32) -> bool,
) -> io::Result<Prompted<u32>> {
    PromptSpec::new(label, error, |input| {
        input.trim().parse::<u32>().ok().filter(|id| exists(*id))
    })
    .with_validator(|input| input.trim().parse::<u32>().map_or(false, &exists))
    .ask(term)
}

/// Asks for a 13-digit ISBN that `exists` finds in the store.
pub(crate) fn ask_existing_isbn(
    term: &mut dyn Terminal,
    label: &str,
    exists: impl Fn(i64) -> bool,
) -> io::Result<Prompted<i64>> {
    PromptSpec::new(
        label,
        "Invalid ISBN13. ISBN13 must be an existing ISBN13.",
        |input| parse_isbn13(input).filter(|isbn| exists(*isbn)),
    )
    .with_validator(|input| parse_isbn13(input).map_or(false, &exists))
    .ask(term)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_accept_dash_or_slash() {
        let expected = NaiveDate::from_ymd_opt(1849, 1, 22);
        assert_eq!(parse_date("1849-01-22"), expected);
        assert_eq!(parse_date(" 1849/01/22 "), expected);
        assert_eq!(parse_date("22/01/1849"), None);
    }

    #[test]
    fn future_dates_are_rejected() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert!(parse_past_date("2024-06-01", today).is_some());
        assert!(parse_past_date("2024-06-02", today).is_none());
    }

    #[test]
    fn completed_retypes_non_values() {
        let canceled: FlowResult<u32> = FlowResult::Canceled;
        assert_eq!(canceled.completed::<String>(), Err(FlowResult::Canceled));
        let done = FlowResult::Completed(3);
        assert_eq!(done.completed::<String>(), Ok(3));
    }
}
