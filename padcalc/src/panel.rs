//! Text rendering of the calculator display and button grid.

use padcalc_core::{Keypad, LAYOUT};
use termion::{color, style};

/// Width of one button cell in the printed grid.
const CELL: usize = 5;

pub struct Panel {
    color: bool,
}

impl Panel {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// The display: pending input, then the answer once there is one.
    pub fn render(&self, keypad: &Keypad) -> String {
        match keypad.answer() {
            Some(_) => format!("  {}\n{}", keypad.input(), self.answer_line(keypad)),
            None => format!("  {}", keypad.input()),
        }
    }

    /// The answer, or the input when nothing has been evaluated yet.
    pub fn answer_line(&self, keypad: &Keypad) -> String {
        let Some(answer) = keypad.answer() else {
            return format!("= {}", keypad.input());
        };
        let text = padcalc_core::render_answer(answer);
        match (self.color, answer.is_ok()) {
            (false, _) => format!("= {text}"),
            (true, true) => format!(
                "= {}{}{}{}",
                style::Bold,
                color::Fg(color::Green),
                text,
                style::Reset
            ),
            (true, false) => format!(
                "= {}{}{}",
                color::Fg(color::Red),
                text,
                color::Fg(color::Reset)
            ),
        }
    }

    pub fn error(&self, message: impl std::fmt::Display) -> String {
        if self.color {
            format!("{}{message}{}", color::Fg(color::Red), color::Fg(color::Reset))
        } else {
            message.to_string()
        }
    }

    /// The button grid, one row per line.
    pub fn layout(&self) -> String {
        LAYOUT
            .iter()
            .map(|row| {
                row.iter()
                    .map(|label| format!("{label:^width$}", width = CELL))
                    .collect::<Vec<_>>()
                    .join("|")
                    .trim_end()
                    .to_owned()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
