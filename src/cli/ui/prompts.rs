use std::{io, str::FromStr};

use tracing::debug;

use super::line_editor;
use super::terminal::Terminal;

/// Result of a validated prompt. Cancellation is its own variant and never
/// doubles as a zero or empty value.
#[derive(Debug, Clone, PartialEq)]
pub enum Prompted<T> {
    Value(T),
    Canceled,
}

impl<T> Prompted<T> {
    pub fn value(self) -> Option<T> {
        match self {
            Prompted::Value(value) => Some(value),
            Prompted::Canceled => None,
        }
    }

    pub fn is_canceled(&self) -> bool {
        matches!(self, Prompted::Canceled)
    }
}

type Predicate<'a> = Box<dyn Fn(&str) -> bool + 'a>;
type Converter<'a, T> = Box<dyn Fn(&str) -> Option<T> + 'a>;

/// One field request: label, error text, optional pre-filled value, a
/// validity predicate and a conversion to the typed value.
pub struct PromptSpec<'a, T> {
    label: String,
    error_message: String,
    default_value: String,
    validate: Option<Predicate<'a>>,
    convert: Converter<'a, T>,
}

impl<'a> PromptSpec<'a, String> {
    /// Free text. Without a validator any non-blank input is accepted.
    pub fn text(label: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self::new(label, error_message, |input| Some(input.to_string()))
    }
}

impl<'a, T: FromStr + 'a> PromptSpec<'a, T> {
    /// Input parsed with `FromStr`; unparsable text is invalid.
    pub fn parsed(label: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self::new(label, error_message, |input| input.trim().parse().ok())
    }
}

impl<'a, T> PromptSpec<'a, T> {
    pub fn new(
        label: impl Into<String>,
        error_message: impl Into<String>,
        convert: impl Fn(&str) -> Option<T> + 'a,
    ) -> Self {
        Self {
            label: label.into(),
            error_message: error_message.into(),
            default_value: String::new(),
            validate: None,
            convert: Box::new(convert),
        }
    }

    /// Pre-seeds the input buffer, typically with the current value in edit
    /// flows.
    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = default_value.into();
        self
    }

    pub fn with_validator(mut self, validate: impl Fn(&str) -> bool + 'a) -> Self {
        self.validate = Some(Box::new(validate));
        self
    }

    /// Converted value when `input` passes validation. A conversion that
    /// fails after validation passed still counts as invalid.
    pub fn accept(&self, input: &str) -> Option<T> {
        let valid = match &self.validate {
            Some(validate) => validate(input),
            None => !input.trim().is_empty(),
        };
        if valid {
            (self.convert)(input)
        } else {
            None
        }
    }

    /// Prompts until the input is valid or the user presses Escape.
    ///
    /// Invalid input prints the error, pauses, clears the prompt region and
    /// asks again with the rejected text left in the buffer for editing.
    pub fn ask(&self, term: &mut dyn Terminal) -> io::Result<Prompted<T>> {
        let start_row = term.cursor_row()?;
        let prompt = format!("{}: ", self.label);
        let mut working = self.default_value.clone();

        loop {
            let session = line_editor::read_line(term, &prompt, &working)?;
            if session.canceled {
                debug!(label = %self.label, "prompt canceled");
                return Ok(Prompted::Canceled);
            }
            if let Some(value) = self.accept(&session.buffer) {
                return Ok(Prompted::Value(value));
            }

            term.write(&format!("{} Try again.\n", self.error_message))?;
            term.pause();
            term.clear_below(start_row)?;
            working = session.buffer;
        }
    }
}

/// Asks a `y/n` question. `n` is a regular answer, distinct from Escape.
pub fn confirm(term: &mut dyn Terminal, question: &str) -> io::Result<Prompted<bool>> {
    PromptSpec::new(format!("{question} (y/n)"), "Answer y or n.", |input| {
        match input.trim().to_ascii_lowercase().as_str() {
            "y" => Some(true),
            "n" => Some(false),
            _ => None,
        }
    })
    .with_validator(|input| matches!(input.trim().to_ascii_lowercase().as_str(), "y" | "n"))
    .ask(term)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ui::test_mode::ScriptedTerminal;
    use crate::domain::book::parse_isbn13;

    fn isbn_prompt<'a>() -> PromptSpec<'a, i64> {
        PromptSpec::new(
            "ISBN13",
            "Invalid ISBN13. ISBN13 must be unique and contain 13 integers.",
            parse_isbn13,
        )
        .with_validator(|input| parse_isbn13(input).is_some())
    }

    #[test]
    fn short_isbn_retries_with_text_preserved() {
        // "12345" is rejected; the retry starts from "12345" and the user
        // completes it to 13 digits.
        let mut term = ScriptedTerminal::from_script("12345<ENTER>67890123<ENTER>");
        let transcript = term.transcript();
        let result = isbn_prompt().ask(&mut term).unwrap();

        assert_eq!(result, Prompted::Value(1_234_567_890_123));
        let output = transcript.output();
        assert!(output.contains("Invalid ISBN13."));
        assert!(output.contains("Try again."));
        assert!(output.contains("ISBN13: 12345\n"));
        assert_eq!(transcript.count("ISBN13: 12345"), 2);
        assert_eq!(transcript.pauses(), 1);
        assert_eq!(transcript.clears(), 1);
    }

    #[test]
    fn escape_returns_canceled_without_value() {
        let mut term = ScriptedTerminal::from_script("<ESC>");
        assert_eq!(isbn_prompt().ask(&mut term).unwrap(), Prompted::Canceled);
    }

    #[test]
    fn escape_during_retry_still_cancels() {
        let mut term = ScriptedTerminal::from_script("abc<ENTER><ESC>");
        assert!(isbn_prompt().ask(&mut term).unwrap().is_canceled());
    }

    #[test]
    fn confirming_default_reproduces_it() {
        let mut term = ScriptedTerminal::from_script("<ENTER>");
        let spec = PromptSpec::text("Title", "Invalid Title").with_default("Röda rummet");
        assert_eq!(
            spec.ask(&mut term).unwrap(),
            Prompted::Value("Röda rummet".to_string())
        );

        let mut term = ScriptedTerminal::from_script("<ENTER>");
        let pages = PromptSpec::<u32>::parsed("Pages", "Invalid pages").with_default("0");
        assert_eq!(pages.ask(&mut term).unwrap(), Prompted::Value(0));
    }

    #[test]
    fn blank_text_is_rejected_without_validator() {
        let mut term = ScriptedTerminal::from_script("   <ENTER><BS><BS><BS>Strindberg<ENTER>");
        let spec = PromptSpec::text("Last name", "Invalid Last name.");
        assert_eq!(
            spec.ask(&mut term).unwrap(),
            Prompted::Value("Strindberg".to_string())
        );
    }

    #[test]
    fn never_returns_value_rejected_by_validator() {
        let spec = PromptSpec::<i32>::parsed("Quantity", "Invalid quantity.")
            .with_validator(|input| input.trim().parse::<i32>().map_or(false, |v| v > 0));
        for input in ["0", "-4", "x", "", "7"] {
            let accepted = spec.accept(input);
            let valid = input.trim().parse::<i32>().map_or(false, |v| v > 0);
            assert_eq!(accepted.is_some(), valid, "input {input:?}");
        }
    }

    #[test]
    fn validator_pass_with_failing_conversion_is_invalid() {
        let spec = PromptSpec::<u8>::parsed("Small", "Too big").with_validator(|_| true);
        assert_eq!(spec.accept("300"), None);
        assert_eq!(spec.accept("30"), Some(30));
    }

    #[test]
    fn confirm_distinguishes_no_from_cancel() {
        let mut term = ScriptedTerminal::from_script("N<ENTER>");
        assert_eq!(confirm(&mut term, "Delete?").unwrap(), Prompted::Value(false));

        let mut term = ScriptedTerminal::from_script("maybe<ENTER><BS><BS><BS><BS><BS>y<ENTER>");
        assert_eq!(confirm(&mut term, "Delete?").unwrap(), Prompted::Value(true));

        let mut term = ScriptedTerminal::from_script("<ESC>");
        assert_eq!(confirm(&mut term, "Delete?").unwrap(), Prompted::Canceled);
    }
}
