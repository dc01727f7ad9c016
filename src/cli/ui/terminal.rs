//! Terminal seam for every prompt and menu.
//!
//! The engine only talks to [`Terminal`]; [`CrosstermTerminal`] drives a real
//! console and `test_mode::ScriptedTerminal` replays a key script.

use std::{
    io::{self, Stdout, Write},
    thread,
    time::Duration,
};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{self, ClearType},
    ExecutableCommand,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Esc,
    Backspace,
    Char(char),
    /// Ctrl-C. Terminates the program rather than canceling a prompt.
    Interrupt,
    Other,
}

impl From<KeyEvent> for Key {
    fn from(key: KeyEvent) -> Self {
        // AltGr arrives as Control+Alt on Windows and must still type text.
        let chord = key.modifiers.contains(KeyModifiers::CONTROL)
            && !key.modifiers.contains(KeyModifiers::ALT);
        if chord {
            return match key.code {
                KeyCode::Char('c') | KeyCode::Char('C') => Key::Interrupt,
                _ => Key::Other,
            };
        }
        match key.code {
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Esc,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Char(ch) => Key::Char(ch),
            _ => Key::Other,
        }
    }
}

pub trait Terminal {
    /// Blocks for one raw keystroke.
    fn read_key(&mut self) -> io::Result<Key>;

    /// Reads one line-buffered line without the trailing newline. `None` means
    /// end of input.
    fn read_line(&mut self) -> io::Result<Option<String>>;

    fn write(&mut self, text: &str) -> io::Result<()>;

    fn cursor_row(&mut self) -> io::Result<u16>;

    fn clear_screen(&mut self) -> io::Result<()>;

    /// Clears everything from `row` down and parks the cursor there.
    fn clear_below(&mut self, row: u16) -> io::Result<()>;

    fn set_raw(&mut self, enabled: bool) -> io::Result<()>;

    /// Fixed visual delay after an error or cancel notice. Not interruptible.
    fn pause(&mut self);

    /// Blocks until any key is pressed, without a timeout.
    fn wait_for_key(&mut self) -> io::Result<()>;
}

pub struct CrosstermTerminal {
    stdout: Stdout,
    pause: Duration,
    raw: bool,
}

impl CrosstermTerminal {
    pub fn new(pause: Duration) -> Self {
        Self {
            stdout: io::stdout(),
            pause,
            raw: false,
        }
    }
}

impl Terminal for CrosstermTerminal {
    fn read_key(&mut self) -> io::Result<Key> {
        loop {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => return Ok(Key::from(key)),
                _ => continue,
            }
        }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        self.set_raw(false)?;
        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        if self.raw {
            write!(self.stdout, "{}", text.replace('\n', "\r\n"))?;
        } else {
            write!(self.stdout, "{text}")?;
        }
        self.stdout.flush()
    }

    fn cursor_row(&mut self) -> io::Result<u16> {
        cursor::position().map(|(_, row)| row)
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        self.stdout.execute(terminal::Clear(ClearType::All))?;
        self.stdout.execute(cursor::MoveTo(0, 0))?;
        Ok(())
    }

    fn clear_below(&mut self, row: u16) -> io::Result<()> {
        self.stdout.execute(cursor::MoveTo(0, row))?;
        self.stdout.execute(terminal::Clear(ClearType::FromCursorDown))?;
        Ok(())
    }

    fn set_raw(&mut self, enabled: bool) -> io::Result<()> {
        if enabled == self.raw {
            return Ok(());
        }
        if enabled {
            terminal::enable_raw_mode()?;
        } else {
            terminal::disable_raw_mode()?;
        }
        self.raw = enabled;
        Ok(())
    }

    fn pause(&mut self) {
        thread::sleep(self.pause);
    }

    fn wait_for_key(&mut self) -> io::Result<()> {
        self.set_raw(true)?;
        let key = self.read_key();
        self.set_raw(false)?;
        match key? {
            Key::Interrupt => Err(io::Error::new(io::ErrorKind::Interrupted, "interrupted")),
            _ => Ok(()),
        }
    }
}

impl Drop for CrosstermTerminal {
    fn drop(&mut self) {
        if self.raw {
            let _ = terminal::disable_raw_mode();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_events_map_to_editor_keys() {
        let plain = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(Key::from(plain(KeyCode::Enter)), Key::Enter);
        assert_eq!(Key::from(plain(KeyCode::Esc)), Key::Esc);
        assert_eq!(Key::from(plain(KeyCode::Backspace)), Key::Backspace);
        assert_eq!(Key::from(plain(KeyCode::Char('å'))), Key::Char('å'));
        assert_eq!(Key::from(plain(KeyCode::Left)), Key::Other);
    }

    #[test]
    fn control_c_is_an_interrupt_not_a_character() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(Key::from(ctrl_c), Key::Interrupt);
        let ctrl_u = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert_eq!(Key::from(ctrl_u), Key::Other);
    }

    #[test]
    fn altgr_characters_are_typed() {
        let altgr = KeyModifiers::CONTROL | KeyModifiers::ALT;
        for ch in ['@', '$', '{'] {
            assert_eq!(Key::from(KeyEvent::new(KeyCode::Char(ch), altgr)), Key::Char(ch));
        }
    }
}
