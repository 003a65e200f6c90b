use tracing::debug;

use crate::{is_balanced, normalize, CalcCtx, EvalError};

/// Normalizes, bracket checks and evaluates a keypad expression, rounding
/// the result to `precision` decimals.
///
/// NaN is returned as is. Infinities survive rounding unchanged.
pub fn evaluate(input: &str, precision: u32) -> Result<f64, EvalError> {
    let expr = normalize(input);
    if !is_balanced(&expr) {
        debug!(input, "brackets are not balanced");
        return Err(EvalError::UnbalancedBrackets);
    }

    let value = CalcCtx::new().evaluate_input(&expr).map_err(|err| {
        debug!(input, %err, "invalid expression");
        EvalError::from(err)
    })?;

    if value.is_nan() {
        return Ok(value);
    }
    let rounded = round_to(value, precision);
    debug!(input, value, rounded, "evaluated");
    Ok(rounded)
}

/// Decimals past this are beyond what an `f64` carries.
pub const MAX_PRECISION: u32 = 15;

/// Scales by `10^decimals`, rounds half up like `Math.round`, scales back.
/// `decimals` is capped at [`MAX_PRECISION`].
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals.min(MAX_PRECISION) as i32);
    round_half_up(value * factor) / factor
}

pub fn round3(value: f64) -> f64 {
    round_to(value, 3)
}

/// Nearest integer, ties toward positive infinity: `-2.5` rounds to `-2`.
fn round_half_up(x: f64) -> f64 {
    let r = x.round();
    if x - r == 0.5 {
        r + 1.0
    } else {
        r
    }
}
