use serde::Deserialize;
use tracing::debug;

use crate::{evaluate, format_number, EvalError, Key};

/// Outcome of pressing `=`.
pub type Answer = Result<f64, EvalError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct KeypadSettings {
    /// Longest expression the display accepts, in chars.
    pub max_input: usize,
    /// Decimals an answer is rounded to.
    pub precision: u32,
}

impl Default for KeypadSettings {
    fn default() -> Self {
        Self {
            max_input: 14,
            precision: 3,
        }
    }
}

/// Calculator state: the expression being typed and the last answer.
///
/// Every operation consumes the state and returns the next one. Once the
/// answer is [`EvalError::InvalidExpression`], appends and sign toggles are
/// ignored until [`Keypad::clear`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Keypad {
    input: String,
    answer: Option<Answer>,
    settings: KeypadSettings,
}

/// Keys whose label differs from what they insert.
fn remap_token(label: &str) -> &str {
    match label {
        "x2" => "**2",
        "x3" => "**3",
        "3√" => "**(1/3)",
        "log" => "Math.log10(",
        _ => label,
    }
}

fn flip_sign(expr: &str) -> String {
    if let Some(rest) = expr.strip_prefix('-') {
        format!("+{rest}")
    } else if let Some(rest) = expr.strip_prefix('+') {
        format!("-{rest}")
    } else {
        format!("-{expr}")
    }
}

impl Keypad {
    pub fn new(settings: KeypadSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn answer(&self) -> Option<&Answer> {
        self.answer.as_ref()
    }

    pub fn answer_text(&self) -> Option<String> {
        self.answer.as_ref().map(crate::render_answer)
    }

    pub fn settings(&self) -> KeypadSettings {
        self.settings
    }

    fn is_locked(&self) -> bool {
        matches!(self.answer, Some(Err(EvalError::InvalidExpression(_))))
    }

    fn fits(&self, candidate: &str) -> bool {
        candidate.chars().count() <= self.settings.max_input
    }

    /// The rendered numeric answer, if there is one.
    fn seed(&self) -> Option<String> {
        match self.answer {
            Some(Ok(value)) => Some(format_number(value)),
            _ => None,
        }
    }

    pub fn press(self, key: &Key) -> Self {
        match *key {
            Key::Append(label) => self.append(label),
            Key::Backspace => self.backspace(),
            Key::ToggleSign => self.toggle_sign(),
            Key::Clear => self.clear(),
            Key::Equals => self.evaluate(),
        }
    }

    /// Appends a key's text. Continuing after a numeric answer starts a new
    /// expression from that answer.
    pub fn append(mut self, label: &str) -> Self {
        if self.is_locked() {
            debug!(label, "keystroke ignored until cleared");
            return self;
        }

        let token = remap_token(label);
        let mut candidate = self.seed().unwrap_or_else(|| self.input.clone());
        candidate.push_str(token);
        if !self.fits(&candidate) {
            debug!(label, max = self.settings.max_input, "input is full");
            return self;
        }

        self.input = candidate;
        self.answer = None;
        self
    }

    pub fn backspace(mut self) -> Self {
        if let Some(seed) = self.seed() {
            self.input = seed;
        }
        self.answer = None;
        self.input.pop();
        self
    }

    pub fn toggle_sign(mut self) -> Self {
        if self.is_locked() {
            return self;
        }

        let flipped = flip_sign(&self.seed().unwrap_or_else(|| self.input.clone()));
        if !self.fits(&flipped) {
            debug!(max = self.settings.max_input, "input is full");
            return self;
        }

        self.input = flipped;
        self.answer = None;
        self
    }

    pub fn clear(self) -> Self {
        Self::new(self.settings)
    }

    /// Evaluates the current input. An empty input leaves the state as is.
    pub fn evaluate(mut self) -> Self {
        if self.input.is_empty() {
            return self;
        }
        self.answer = Some(evaluate(&self.input, self.settings.precision));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{Keypad, KeypadSettings};
    use crate::{keys::parse_line, EvalError};

    fn type_keys(keypad: Keypad, line: &str) -> Keypad {
        parse_line(line)
            .unwrap()
            .iter()
            .fold(keypad, |pad, key| pad.press(key))
    }

    fn typed(line: &str) -> Keypad {
        type_keys(Keypad::default(), line)
    }

    #[test]
    fn test_multiply() {
        let pad = typed("2x3=");
        assert_eq!(pad.input(), "2x3");
        assert_eq!(pad.answer(), Some(&Ok(6.0)));
        assert_eq!(pad.answer_text().as_deref(), Some("6"));
    }

    #[test]
    fn test_unbalanced() {
        let pad = typed("(2+3=");
        assert_eq!(pad.answer(), Some(&Err(EvalError::UnbalancedBrackets)));
        assert_eq!(
            pad.answer_text().as_deref(),
            Some("Brackets are not balanced!")
        );
    }

    #[test]
    fn test_divide_by_zero() {
        let pad = typed("5÷0=");
        assert_eq!(pad.answer(), Some(&Ok(f64::INFINITY)));
        assert_eq!(pad.answer_text().as_deref(), Some("Infinity"));
    }

    #[test]
    fn test_square_root() {
        assert_eq!(typed("√144=").answer(), Some(&Ok(12.0)));
    }

    #[test]
    fn test_continue_from_answer() {
        let pad = typed("2x3=");
        let pad = type_keys(pad, "+");
        assert_eq!(pad.input(), "6+");
        assert_eq!(pad.answer(), None);
        let pad = type_keys(pad, "4=");
        assert_eq!(pad.input(), "6+4");
        assert_eq!(pad.answer(), Some(&Ok(10.0)));
    }

    #[test]
    fn test_max_input() {
        let pad = typed("12345678901234");
        assert_eq!(pad.input(), "12345678901234");
        let pad = type_keys(pad, "5");
        assert_eq!(pad.input(), "12345678901234");

        // a remapped token counts at its inserted length
        let pad = typed("123456789012 log");
        assert_eq!(pad.input(), "123456789012");
    }

    #[test]
    fn test_max_input_from_settings() {
        let pad = Keypad::new(KeypadSettings {
            max_input: 3,
            precision: 1,
        });
        let pad = type_keys(pad, "1÷3=");
        assert_eq!(pad.answer(), Some(&Ok(0.3)));
        // "0.3+" does not fit, so the answer stays up
        let pad = type_keys(pad, "+");
        assert_eq!(pad.input(), "1÷3");
        assert_eq!(pad.answer(), Some(&Ok(0.3)));
    }

    #[test]
    fn test_remapped_tokens() {
        assert_eq!(typed("3 x2").input(), "3**2");
        assert_eq!(typed("2 x3 =").answer(), Some(&Ok(8.0)));
        assert_eq!(typed("27 3√").input(), "27**(1/3)");
        assert_eq!(typed("27 3√ =").answer(), Some(&Ok(3.0)));
        assert_eq!(typed("log 100").input(), "Math.log10(100");
        assert_eq!(typed("log 10)=").answer(), Some(&Ok(1.0)));
        // the closing bracket no longer fits
        assert_eq!(
            typed("log 100)=").answer(),
            Some(&Err(EvalError::UnbalancedBrackets))
        );
    }

    #[test]
    fn test_invalid_input_locks_keypad() {
        let pad = typed("2+=");
        assert!(matches!(
            pad.answer(),
            Some(Err(EvalError::InvalidExpression(_)))
        ));
        assert_eq!(pad.answer_text().as_deref(), Some("Invalid Input!!"));

        let locked = type_keys(pad.clone(), "3 +/-");
        assert_eq!(locked, pad);

        let pad = type_keys(pad, "AC");
        assert_eq!(pad, Keypad::default());
        assert_eq!(type_keys(pad, "3").input(), "3");
    }

    #[test]
    fn test_unbalanced_keeps_editing_input() {
        let pad = typed("(2+3=");
        let pad = type_keys(pad, ")");
        assert_eq!(pad.input(), "(2+3)");
        assert_eq!(pad.answer(), None);
        assert_eq!(type_keys(pad, "=").answer(), Some(&Ok(5.0)));
    }

    #[test]
    fn test_backspace() {
        assert_eq!(typed("123 DEL").input(), "12");
        assert_eq!(typed("DEL").input(), "");

        let pad = typed("10÷4= DEL");
        assert_eq!(pad.input(), "2.");
        assert_eq!(pad.answer(), None);

        let pad = typed("2+= DEL");
        assert_eq!(pad.input(), "2");
        assert_eq!(pad.answer(), None);
    }

    #[test]
    fn test_toggle_sign() {
        assert_eq!(typed("5 +/-").input(), "-5");
        assert_eq!(typed("5 +/- +/-").input(), "+5");
        assert_eq!(typed("5 +/- +/- +/-").input(), "-5");
        assert_eq!(typed("+/-").input(), "-");

        let pad = typed("2x3= +/-");
        assert_eq!(pad.input(), "-6");
        assert_eq!(pad.answer(), None);
        assert_eq!(type_keys(pad, "=").answer(), Some(&Ok(-6.0)));

        let pad = typed("3-8= +/-");
        assert_eq!(pad.input(), "+5");
    }

    #[test]
    fn test_toggle_sign_respects_max_input() {
        let pad = typed("12345678901234 +/-");
        assert_eq!(pad.input(), "12345678901234");
    }

    #[test]
    fn test_evaluate_empty_is_noop() {
        assert_eq!(typed("="), Keypad::default());
    }

    #[test]
    fn test_continue_from_exponent_answer() {
        let pad = typed("10000000 x3 =");
        assert_eq!(pad.answer_text().as_deref(), Some("1e+21"));
        let pad = type_keys(pad, "+1=");
        assert_eq!(pad.input(), "1e+21+1");
        assert_eq!(pad.answer(), Some(&Ok(1e21)));
    }

    #[test]
    fn test_continue_from_non_finite() {
        let pad = typed("5÷0= -1=");
        assert_eq!(pad.input(), "Infinity-1");
        assert_eq!(pad.answer(), Some(&Ok(f64::INFINITY)));
    }
}
