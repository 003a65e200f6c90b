//! Button labels of the keypad and parsing of typed key sequences.

use crate::KeyError;

/// The button grid, row by row.
pub const LAYOUT: &[&[&str]] = &[
    &["AC", "DEL", "(", ")"],
    &["x2", "x3", "√", "3√"],
    &["log", "%", "+/-", "÷"],
    &["7", "8", "9", "x"],
    &["4", "5", "6", "-"],
    &["1", "2", "3", "+"],
    &["0", ".", "="],
];

/// A single button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Appends the label (after remapping, see [`crate::Keypad::append`]).
    Append(&'static str),
    Backspace,
    ToggleSign,
    Clear,
    Equals,
}

impl Key {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "AC" | "C" => Some(Key::Clear),
            "DEL" => Some(Key::Backspace),
            "+/-" => Some(Key::ToggleSign),
            "=" => Some(Key::Equals),
            _ => LAYOUT
                .iter()
                .flat_map(|row| row.iter())
                .find(|&&l| l == label)
                .map(|&l| Key::Append(l)),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Key::Append(label) => label,
            Key::Backspace => "DEL",
            Key::ToggleSign => "+/-",
            Key::Clear => "AC",
            Key::Equals => "=",
        }
    }
}

/// Splits a typed line into key presses.
///
/// Each whitespace separated word that is a label is one key (`x2`, `3√`,
/// `log`, `DEL`). Any other word is read one char at a time, so `2x3=`
/// presses `2`, `x`, `3` and `=`.
pub fn parse_line(line: &str) -> Result<Vec<Key>, KeyError> {
    let mut keys = Vec::new();
    for word in line.split_whitespace() {
        if let Some(key) = Key::from_label(word) {
            keys.push(key);
            continue;
        }
        for (i, c) in word.char_indices() {
            let label = &word[i..i + c.len_utf8()];
            let key = Key::from_label(label).ok_or_else(|| KeyError::Unknown(label.to_owned()))?;
            keys.push(key);
        }
    }
    Ok(keys)
}
