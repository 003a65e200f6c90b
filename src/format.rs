use crate::keypad::Answer;

/// Renders a number the way a browser would print it: `NaN`, `Infinity`,
/// signless zero, exponent notation outside `[1e-6, 1e21)`.
///
/// This text is also what a new expression is seeded with when typing
/// continues from an answer, so it must parse back to the same number.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        let sign = if value.is_sign_negative() { "-" } else { "" };
        return format!("{sign}Infinity");
    }
    if value == 0.0 {
        return "0".to_owned();
    }

    let abs = value.abs();
    if !(1e-6..1e21).contains(&abs) {
        let repr = format!("{value:e}");
        return match repr.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => repr,
        };
    }
    value.to_string()
}

/// Display text for an answer: the number, or the error message.
pub fn render_answer(answer: &Answer) -> String {
    match answer {
        Ok(value) => format_number(*value),
        Err(err) => err.to_string(),
    }
}
