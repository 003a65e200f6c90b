//! Keypad calculator engine.
//!
//! A [`Keypad`] accumulates button presses into an expression, and on `=`
//! the expression is normalized ([`normalize`]), bracket checked
//! ([`is_balanced`]) and evaluated by a small recursive descent evaluator.
//! Results are kept as `Result<f64, EvalError>`, the presentation layer
//! decides how to render them ([`render_answer`]).

mod brackets;
mod error;
mod evaluator;
mod format;
mod keypad;
pub mod keys;
mod lexer;
mod normalize;
mod parser;

use core::fmt;
use std::collections::HashMap;

pub use brackets::is_balanced;
pub use error::{EvalError, KeyError};
pub use evaluator::{evaluate, round3, round_to, MAX_PRECISION};
pub use format::{format_number, render_answer};
pub use keypad::{Answer, Keypad, KeypadSettings};
pub use keys::{Key, LAYOUT};
pub use lexer::{Op, Span};
pub use normalize::normalize;
pub use parser::{Expr, ExprError, MAX_TOKENS};

#[derive(Debug, Clone, Copy)]
pub enum Value {
    Real(f64),
    Function(Function),
}

impl Value {
    #[inline]
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(r) => Some(*r),
            Value::Function(_) => None,
        }
    }
}

pub type Function = fn(&mut CalcCtx, Vec<Value>) -> Result<Value, ExprError>;

/// Evaluation scope. [`CalcCtx::new`] is seeded with the builtins the
/// keypad can produce (`Math.sqrt`, `Math.log10`) and the non-finite
/// constants an answer may render as (`Infinity`, `NaN`).
#[derive(Debug, Clone)]
pub struct CalcCtx {
    scope: HashMap<String, Value>,
}

impl Default for CalcCtx {
    fn default() -> Self {
        let mut ctx = Self::empty();
        ctx.set_var("Math.sqrt", sqrt as Function);
        ctx.set_var("Math.log10", log10 as Function);
        ctx.set_var("sqrt", sqrt as Function);
        ctx.set_var("log10", log10 as Function);
        ctx.set_var("Infinity", f64::INFINITY);
        ctx.set_var("NaN", f64::NAN);
        ctx
    }
}

impl CalcCtx {
    pub fn new() -> Self {
        Self::default()
    }

    /// A scope without any builtins.
    pub fn empty() -> Self {
        Self {
            scope: HashMap::new(),
        }
    }

    pub fn get_var(&self, var: &str) -> Option<Value> {
        self.scope.get(var).copied()
    }
    pub fn set_var(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.scope.insert(name.into(), value.into());
    }

    pub fn evaluate_input(&mut self, input: &str) -> Result<f64, ExprError> {
        let expr = Expr::parse(input)?;
        tracing::trace!(%expr, "parsed");
        match expr.eval(self)? {
            Value::Real(n) => Ok(n),
            other => Err(ExprError::NotANumber(other.to_string())),
        }
    }
}

/// Builtins take their first argument, ignore the rest, and treat a
/// missing argument as NaN.
fn first_arg(args: &[Value]) -> Result<f64, ExprError> {
    match args.first() {
        None => Ok(f64::NAN),
        Some(v) => v.as_real().ok_or_else(|| ExprError::NotANumber(v.to_string())),
    }
}

fn sqrt(_: &mut CalcCtx, args: Vec<Value>) -> Result<Value, ExprError> {
    first_arg(&args).map(f64::sqrt).map(Value::Real)
}

fn log10(_: &mut CalcCtx, args: Vec<Value>) -> Result<Value, ExprError> {
    first_arg(&args).map(f64::log10).map(Value::Real)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Real(n) => f.write_str(&format_number(*n)),
            Value::Function(_) => f.write_str("<function>"),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl From<Function> for Value {
    fn from(value: Function) -> Self {
        Value::Function(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{CalcCtx, ExprError, Value};

    #[test]
    fn test_builtins_are_seeded() {
        let ctx = CalcCtx::new();
        for name in ["Math.sqrt", "Math.log10", "sqrt", "log10"] {
            assert!(matches!(ctx.get_var(name), Some(Value::Function(_))), "{name}");
        }
        assert_eq!(
            ctx.get_var("Infinity").and_then(|v| v.as_real()),
            Some(f64::INFINITY)
        );
        assert!(CalcCtx::empty().get_var("Math.sqrt").is_none());
    }

    #[test]
    fn test_set_var() {
        let mut ctx = CalcCtx::new();
        ctx.set_var("ans", 6.0);
        assert_eq!(ctx.evaluate_input("ans*2"), Ok(12.0));
    }

    #[test]
    fn test_function_result_is_not_a_number() {
        let mut ctx = CalcCtx::new();
        assert_eq!(
            ctx.evaluate_input("Math.sqrt"),
            Err(ExprError::NotANumber("<function>".to_owned()))
        );
        assert_eq!(
            ctx.evaluate_input("Math.sqrt(Math.log10)"),
            Err(ExprError::NotANumber("<function>".to_owned()))
        );
    }
}
