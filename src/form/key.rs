//! Logical key events consumed by the form engine.
//!
//! The engine never looks at raw terminal input. Surfaces translate whatever
//! they read into [`KeyEvent`]s, and tests build them directly or through
//! [`parse_key_script`].

use std::collections::VecDeque;

use crossterm::event::{KeyCode, KeyEvent as TermKeyEvent, KeyModifiers};

/// Key identity without modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    Esc,
    Backspace,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    /// Anything the engine has no binding for (function keys, media keys, ...).
    Other,
}

/// Modifier flags carried alongside a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub control: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        control: false,
        alt: false,
        shift: false,
    };

    pub const CONTROL: Modifiers = Modifiers {
        control: true,
        alt: false,
        shift: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    pub fn ch(ch: char) -> Self {
        Self::plain(Key::Char(ch))
    }

    pub fn ctrl(ch: char) -> Self {
        Self::new(Key::Char(ch), Modifiers::CONTROL)
    }

    /// Returns the character this event inserts, if any.
    ///
    /// Letters, digits, whitespace, punctuation and symbols count as printable
    /// unless a control or alt modifier is held.
    pub fn printable(&self) -> Option<char> {
        if self.modifiers.control || self.modifiers.alt {
            return None;
        }
        match self.key {
            Key::Char(ch) if is_printable(ch) => Some(ch),
            _ => None,
        }
    }

    pub fn is_printable(&self) -> bool {
        self.printable().is_some()
    }

    pub fn is_ctrl(&self, ch: char) -> bool {
        self.modifiers.control
            && matches!(self.key, Key::Char(c) if c.eq_ignore_ascii_case(&ch))
    }
}

fn is_printable(ch: char) -> bool {
    if ch.is_control() {
        return false;
    }
    ch.is_alphanumeric() || ch.is_whitespace() || ch.is_ascii_punctuation() || !ch.is_ascii()
}

impl From<TermKeyEvent> for KeyEvent {
    fn from(event: TermKeyEvent) -> Self {
        let modifiers = Modifiers {
            control: event.modifiers.contains(KeyModifiers::CONTROL),
            alt: event.modifiers.contains(KeyModifiers::ALT),
            shift: event.modifiers.contains(KeyModifiers::SHIFT),
        };
        let key = match event.code {
            KeyCode::Char(ch) => Key::Char(ch),
            KeyCode::Enter => Key::Enter,
            KeyCode::Tab => Key::Tab,
            KeyCode::Esc => Key::Esc,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            _ => Key::Other,
        };
        Self { key, modifiers }
    }
}

/// Parses a textual key script into batches of key events.
///
/// Batches are separated by `|`, keys inside a batch by `,`. Named keys are
/// `ENTER`, `TAB`, `ESC`, `BS`/`BACKSPACE`, `LEFT`, `RIGHT`, `UP`, `DOWN`,
/// `HOME`, `END`, `SPACE`, `COMMA`, `PIPE` and `^X` for control chords. Any
/// other token is typed character by character, so `Jane` is four keys.
pub fn parse_key_script(raw: &str) -> VecDeque<Vec<KeyEvent>> {
    raw.split('|')
        .filter_map(|segment| {
            let events: Vec<KeyEvent> = segment
                .split(',')
                .flat_map(|token| parse_token(token.trim()))
                .collect();
            if events.is_empty() {
                None
            } else {
                Some(events)
            }
        })
        .collect()
}

fn parse_token(token: &str) -> Vec<KeyEvent> {
    if token.is_empty() {
        return Vec::new();
    }
    let named = match token.to_ascii_uppercase().as_str() {
        "ENTER" | "RETURN" => Some(Key::Enter),
        "TAB" => Some(Key::Tab),
        "ESC" | "ESCAPE" => Some(Key::Esc),
        "BS" | "BACKSPACE" => Some(Key::Backspace),
        "LEFT" => Some(Key::Left),
        "RIGHT" => Some(Key::Right),
        "UP" => Some(Key::Up),
        "DOWN" => Some(Key::Down),
        "HOME" => Some(Key::Home),
        "END" => Some(Key::End),
        "SPACE" => Some(Key::Char(' ')),
        "COMMA" => Some(Key::Char(',')),
        "PIPE" => Some(Key::Char('|')),
        _ => None,
    };
    if let Some(key) = named {
        return vec![KeyEvent::plain(key)];
    }
    let mut chars = token.chars();
    if let (Some('^'), Some(ch), None) = (chars.next(), chars.next(), chars.next()) {
        return vec![KeyEvent::ctrl(ch.to_ascii_lowercase())];
    }
    token.chars().map(KeyEvent::ch).collect()
}
