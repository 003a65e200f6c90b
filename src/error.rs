use thiserror::Error;

use crate::ExprError;

/// Why pressing `=` did not produce a number. The messages are what the
/// display shows in place of an answer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("Brackets are not balanced!")]
    UnbalancedBrackets,

    #[error("Invalid Input!!")]
    InvalidExpression(#[from] ExprError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("no such key: `{0}`")]
    Unknown(String),
}
