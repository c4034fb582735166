//! Keyboard capture for the wizard loop.
//!
//! The controller is written against [`WizardInput`]; the crossterm-backed
//! implementation lives here and tests script their own. Raw mode is a
//! scoped resource: [`RawModeGuard`] releases it on drop so no exit path
//! leaves the terminal wedged.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use dialoguer::{theme::ColorfulTheme, Confirm};

/// Navigation-relevant keys recognized by the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Esc,
    Backspace,
    Char(char),
    Unknown,
}

/// A key press plus the modifiers the wizard chords on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub ctrl: bool,
    pub shift: bool,
}

impl KeyPress {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            shift: false,
        }
    }

    pub fn ctrl(key: Key) -> Self {
        Self {
            key,
            ctrl: true,
            shift: false,
        }
    }

    pub fn ctrl_shift(key: Key) -> Self {
        Self {
            key,
            ctrl: true,
            shift: true,
        }
    }
}

/// Input seam the wizard controller is written against.
pub trait WizardInput {
    /// Waits up to `timeout` for a key press; `None` on timeout.
    fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<KeyPress>>;

    /// Asks the user a yes/no question (reset, abandon).
    fn confirm(&mut self, prompt: &str) -> io::Result<bool>;
}

/// Releases raw mode on drop.
pub struct RawModeGuard {
    active: bool,
}

impl RawModeGuard {
    pub fn activate() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self { active: true })
    }

    pub fn deactivate(&mut self) {
        if self.active {
            let _ = terminal::disable_raw_mode();
            self.active = false;
        }
    }

    pub fn reactivate(&mut self) -> io::Result<()> {
        if !self.active {
            terminal::enable_raw_mode()?;
            self.active = true;
        }
        Ok(())
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        self.deactivate();
    }
}

/// Crossterm-backed input with an owned raw-mode guard.
pub struct TerminalInput {
    guard: RawModeGuard,
    theme: ColorfulTheme,
}

impl TerminalInput {
    pub fn activate() -> io::Result<Self> {
        Ok(Self {
            guard: RawModeGuard::activate()?,
            theme: ColorfulTheme::default(),
        })
    }
}

impl WizardInput for TerminalInput {
    fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<KeyPress>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(map_key_event(key))),
            _ => Ok(None),
        }
    }

    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        // dialoguer manages the terminal itself; leave raw mode around it.
        self.guard.deactivate();
        println!();
        let answer = Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
        self.guard.reactivate()?;
        Ok(answer)
    }
}

fn map_key_event(key: KeyEvent) -> KeyPress {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    let code = match key.code {
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Char(ch) => Key::Char(ch),
        _ => Key::Unknown,
    };
    KeyPress {
        key: code,
        ctrl,
        shift,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chords_carry_their_modifiers() {
        let event = KeyEvent::new(
            KeyCode::Char('z'),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT,
        );
        assert_eq!(map_key_event(event), KeyPress::ctrl_shift(Key::Char('z')));

        let event = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(map_key_event(event), KeyPress::ctrl(Key::Char('s')));
    }

    #[test]
    fn plain_characters_keep_their_case() {
        let event = KeyEvent::new(KeyCode::Char('D'), KeyModifiers::SHIFT);
        let press = map_key_event(event);
        assert_eq!(press.key, Key::Char('D'));
        assert!(press.shift);
        assert!(!press.ctrl);
    }
}
