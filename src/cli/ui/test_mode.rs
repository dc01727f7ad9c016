//! Scripted terminal used by unit tests and by the binary when
//! `BOOKSTORE_TEST_KEYS` is set.
//!
//! A script is literal text plus `<ENTER>`, `<ESC>`, `<BS>` and `<CTRL-C>`
//! tokens, e.g. `2<ENTER>Tolkien<ESC>`. A raw newline also counts as Enter.
//! Pauses and press-any-key waits are recorded but never sleep or consume
//! keys.

use std::{
    cell::RefCell,
    collections::VecDeque,
    env,
    io::{self, Write},
    rc::Rc,
};

use super::terminal::{Key, Terminal};

pub const SCRIPT_ENV: &str = "BOOKSTORE_TEST_KEYS";

#[derive(Debug, Default)]
struct Recording {
    output: String,
    pauses: usize,
    confirmations: usize,
    clears: usize,
}

/// Shared view of what a [`ScriptedTerminal`] has printed and how often it
/// paused. Stays readable after the terminal moves into a session.
#[derive(Debug, Clone, Default)]
pub struct Transcript(Rc<RefCell<Recording>>);

impl Transcript {
    pub fn output(&self) -> String {
        self.0.borrow().output.clone()
    }

    pub fn pauses(&self) -> usize {
        self.0.borrow().pauses
    }

    pub fn confirmations(&self) -> usize {
        self.0.borrow().confirmations
    }

    pub fn clears(&self) -> usize {
        self.0.borrow().clears
    }

    pub fn count(&self, needle: &str) -> usize {
        self.0.borrow().output.matches(needle).count()
    }
}

pub struct ScriptedTerminal {
    keys: VecDeque<Key>,
    transcript: Transcript,
    echo: bool,
}

impl ScriptedTerminal {
    pub fn new(keys: Vec<Key>) -> Self {
        Self {
            keys: keys.into(),
            transcript: Transcript::default(),
            echo: false,
        }
    }

    pub fn from_script(script: &str) -> Self {
        Self::new(parse_key_script(script))
    }

    /// Builds a terminal from `BOOKSTORE_TEST_KEYS` when it is set.
    pub fn from_env() -> Option<Self> {
        env::var(SCRIPT_ENV)
            .ok()
            .map(|raw| Self::from_script(&raw).with_echo(true))
    }

    /// Mirrors everything written to stdout as well as the transcript.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn transcript(&self) -> Transcript {
        self.transcript.clone()
    }

    pub fn remaining(&self) -> usize {
        self.keys.len()
    }

    fn record(&self, text: &str) -> io::Result<()> {
        self.transcript.0.borrow_mut().output.push_str(text);
        if self.echo {
            let mut stdout = io::stdout();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
        Ok(())
    }
}

impl Terminal for ScriptedTerminal {
    fn read_key(&mut self) -> io::Result<Key> {
        self.keys
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "key script exhausted"))
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        if self.keys.is_empty() {
            return Ok(None);
        }
        let mut line = String::new();
        while let Some(key) = self.keys.pop_front() {
            match key {
                Key::Enter => break,
                Key::Backspace => {
                    line.pop();
                }
                Key::Char(ch) => line.push(ch),
                Key::Interrupt => {
                    return Err(io::Error::new(io::ErrorKind::Interrupted, "interrupted"))
                }
                Key::Esc | Key::Other => {}
            }
        }
        self.record(&format!("{line}\n"))?;
        Ok(Some(line))
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.record(text)
    }

    fn cursor_row(&mut self) -> io::Result<u16> {
        let rows = self.transcript.0.borrow().output.matches('\n').count();
        Ok(u16::try_from(rows).unwrap_or(u16::MAX))
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        self.transcript.0.borrow_mut().clears += 1;
        Ok(())
    }

    fn clear_below(&mut self, _row: u16) -> io::Result<()> {
        self.transcript.0.borrow_mut().clears += 1;
        Ok(())
    }

    fn set_raw(&mut self, _enabled: bool) -> io::Result<()> {
        Ok(())
    }

    fn pause(&mut self) {
        self.transcript.0.borrow_mut().pauses += 1;
    }

    fn wait_for_key(&mut self) -> io::Result<()> {
        self.transcript.0.borrow_mut().confirmations += 1;
        Ok(())
    }
}

pub fn parse_key_script(raw: &str) -> Vec<Key> {
    let mut keys = Vec::new();
    let mut rest = raw;
    while let Some(ch) = rest.chars().next() {
        if ch == '<' {
            if let Some(end) = rest.find('>') {
                if let Some(key) = parse_token(&rest[1..end]) {
                    keys.push(key);
                    rest = &rest[end + 1..];
                    continue;
                }
            }
        }
        keys.push(match ch {
            '\n' => Key::Enter,
            other => Key::Char(other),
        });
        rest = &rest[ch.len_utf8()..];
    }
    keys
}

fn parse_token(token: &str) -> Option<Key> {
    match token.to_ascii_uppercase().as_str() {
        "ENTER" | "RETURN" => Some(Key::Enter),
        "ESC" | "ESCAPE" => Some(Key::Esc),
        "BS" | "BACKSPACE" => Some(Key::Backspace),
        "CTRL-C" => Some(Key::Interrupt),
        _ => None,
    }
}
