//! # Keypad
//!
//! The keys of the on-screen pad and the event each one sends. Rendering is
//! up to the host; this module only says what the keys are and what they
//! are labelled.
//!
//! ## Default Layout
//! ```text
//! ┌─────┬─────┬─────┬─────┐
//! │  7  │  8  │  9  │  ÷  │
//! ├─────┼─────┼─────┼─────┤
//! │  4  │  5  │  6  │  ×  │
//! ├─────┼─────┼─────┼─────┤
//! │  1  │  2  │  3  │  -  │
//! ├─────┼─────┼─────┼─────┤
//! │  .  │  0  │  ⌫  │  +  │
//! ├─────┴─────┴─────┴─────┤
//! │         Done          │
//! └───────────────────────┘
//! ```
//! The separator key shows the locale's decimal separator.

use std::fmt;
use std::str::FromStr;

use crate::config::LocaleSettings;
use crate::error::CalcError;
use crate::types::{InputEvent, Operator};

/// Label of the backspace key.
pub const BACKSPACE_LABEL: &str = "⌫";

/// Label of the commit key.
pub const DONE_LABEL: &str = "Done";

/// A key on the pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Digit(u8),
    Separator,
    Operator(Operator),
    Backspace,
    Done,
}

impl Key {
    /// The event sent when the key is pressed.
    pub const fn event(&self) -> InputEvent {
        match *self {
            Key::Digit(d) => InputEvent::Digit(d),
            Key::Separator => InputEvent::Separator,
            Key::Operator(op) => InputEvent::Operator(op),
            Key::Backspace => InputEvent::Backspace,
            Key::Done => InputEvent::Equals,
        }
    }

    /// The key's caption under `locale`.
    pub fn label(&self, locale: &LocaleSettings) -> String {
        match self {
            Key::Digit(d) => d.to_string(),
            Key::Separator => locale.decimal_separator.clone(),
            Key::Operator(op) => op.glyph().to_string(),
            Key::Backspace => BACKSPACE_LABEL.to_string(),
            Key::Done => DONE_LABEL.to_string(),
        }
    }
}

impl From<Key> for InputEvent {
    fn from(key: Key) -> Self {
        key.event()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Digit(d) => write!(f, "{d}"),
            Key::Separator => write!(f, "."),
            Key::Operator(op) => write!(f, "{op}"),
            Key::Backspace => f.write_str(BACKSPACE_LABEL),
            Key::Done => write!(f, "="),
        }
    }
}

/// Parses the short tokens used by the replay harness.
///
/// `0`-`9`, `.`, `+`, `-`, `*`/`x`/`×`, `/`/`÷`, `<`/`bs`/`⌫`, `=`/`done`.
impl FromStr for Key {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s.to_lowercase().as_str() {
            "." | "," => Key::Separator,
            "+" => Key::Operator(Operator::Addition),
            "-" => Key::Operator(Operator::Subtraction),
            "*" | "x" | "×" => Key::Operator(Operator::Multiplication),
            "/" | "÷" => Key::Operator(Operator::Division),
            "<" | "bs" | "⌫" => Key::Backspace,
            "=" | "done" => Key::Done,
            digit if digit.len() == 1 && digit.as_bytes()[0].is_ascii_digit() => {
                Key::Digit(digit.as_bytes()[0] - b'0')
            }
            _ => return Err(CalcError::UnknownToken(s.to_string())),
        };
        Ok(key)
    }
}

/// Rows of the default pad, top to bottom.
pub fn layout() -> Vec<Vec<Key>> {
    use crate::types::Operator::*;

    vec![
        vec![Key::Digit(7), Key::Digit(8), Key::Digit(9), Key::Operator(Division)],
        vec![Key::Digit(4), Key::Digit(5), Key::Digit(6), Key::Operator(Multiplication)],
        vec![Key::Digit(1), Key::Digit(2), Key::Digit(3), Key::Operator(Subtraction)],
        vec![Key::Separator, Key::Digit(0), Key::Backspace, Key::Operator(Addition)],
        vec![Key::Done],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_covers_every_event() {
        let keys: Vec<Key> = layout().into_iter().flatten().collect();
        assert_eq!(keys.len(), 17);

        for d in 0..=9 {
            assert!(keys.contains(&Key::Digit(d)));
        }
        for op in Operator::ALL {
            assert!(keys.contains(&Key::Operator(op)));
        }
        assert!(keys.contains(&Key::Separator));
        assert!(keys.contains(&Key::Backspace));
        assert!(keys.contains(&Key::Done));
    }

    #[test]
    fn test_key_events() {
        assert_eq!(Key::Digit(3).event(), InputEvent::Digit(3));
        assert_eq!(Key::Done.event(), InputEvent::Equals);
        assert_eq!(
            InputEvent::from(Key::Operator(Operator::Division)),
            InputEvent::Operator(Operator::Division)
        );
    }

    #[test]
    fn test_separator_label_follows_locale() {
        assert_eq!(Key::Separator.label(&LocaleSettings::default()), ".");
        assert_eq!(Key::Separator.label(&LocaleSettings::euro()), ",");
        assert_eq!(Key::Backspace.label(&LocaleSettings::default()), "⌫");
        assert_eq!(
            Key::Operator(Operator::Multiplication).label(&LocaleSettings::default()),
            "×"
        );
    }

    #[test]
    fn test_token_parsing() {
        assert_eq!("7".parse::<Key>().unwrap(), Key::Digit(7));
        assert_eq!("x".parse::<Key>().unwrap(), Key::Operator(Operator::Multiplication));
        assert_eq!("DONE".parse::<Key>().unwrap(), Key::Done);
        assert_eq!("bs".parse::<Key>().unwrap(), Key::Backspace);
        assert!("12".parse::<Key>().is_err());
        assert!("%".parse::<Key>().is_err());
    }
}
