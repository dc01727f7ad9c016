use std::io;

use super::terminal::{Key, Terminal};

pub const CANCEL_NOTICE: &str = "Input canceled.";

/// Outcome of one line capture.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InputSession {
    pub buffer: String,
    pub canceled: bool,
}

/// Captures one line with trailing-backspace editing.
///
/// `initial` is echoed after the prompt and pre-seeds the buffer. Enter
/// confirms; Escape cancels, prints a notice and pauses so it can be read.
/// The buffer is returned as typed in both cases.
pub fn read_line(term: &mut dyn Terminal, prompt: &str, initial: &str) -> io::Result<InputSession> {
    let mut session = InputSession {
        buffer: initial.to_string(),
        canceled: false,
    };
    term.write(prompt)?;
    term.write(initial)?;

    term.set_raw(true)?;
    let captured = capture(term, &mut session);
    term.set_raw(false)?;
    captured?;

    if session.canceled {
        term.write(&format!("\n{CANCEL_NOTICE}\n"))?;
        term.pause();
    } else {
        term.write("\n")?;
    }
    Ok(session)
}

fn capture(term: &mut dyn Terminal, session: &mut InputSession) -> io::Result<()> {
    loop {
        match term.read_key()? {
            Key::Enter => return Ok(()),
            Key::Esc => {
                session.canceled = true;
                return Ok(());
            }
            Key::Backspace => {
                if session.buffer.pop().is_some() {
                    term.write("\u{8} \u{8}")?;
                }
            }
            Key::Char(ch) if !ch.is_control() => {
                session.buffer.push(ch);
                let mut encoded = [0u8; 4];
                term.write(ch.encode_utf8(&mut encoded))?;
            }
            Key::Interrupt => {
                return Err(io::Error::new(io::ErrorKind::Interrupted, "input interrupted"))
            }
            Key::Char(_) | Key::Other => {}
        }
    }
}
