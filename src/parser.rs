use core::fmt;

use thiserror::Error;

use crate::{
    lexer::{Lexer, Op, Span, Token, TokenKind},
    CalcCtx, Value,
};

/// Why an expression could not be parsed or evaluated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExprError {
    #[error("unexpected token `{token}` ({span})")]
    UnexpectedToken { token: String, span: Span },
    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("invalid number `{number}`: {reason} ({span})")]
    InvalidNumber {
        number: String,
        span: Span,
        reason: String,
    },
    #[error("undefined variable `{0}`")]
    UndefinedVariable(String),

    #[error("operator `{0}` expects numbers")]
    ExpectedNumber(Op),
    #[error("`{0}` is not a function")]
    ExpectedFunction(String),
    #[error("`{0}` is not a number")]
    NotANumber(String),

    #[error("expression too long: {tokens} tokens, at most {max}")]
    TooLong { tokens: usize, max: usize },
}

/// Upper bound on tokens per expression. Parsing and evaluation recurse
/// once per nesting level, and nesting is bounded by the token count.
pub const MAX_TOKENS: usize = 256;

impl From<&Token<'_>> for ExprError {
    fn from(tok: &Token<'_>) -> Self {
        match tok.kind {
            TokenKind::End => ExprError::UnexpectedEnd,
            kind => ExprError::UnexpectedToken {
                token: kind.to_string(),
                span: tok.span,
            },
        }
    }
}

type Result<T> = ::std::result::Result<T, ExprError>;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr<'s> {
    Im(f64),
    Var(&'s str),
    MonOp(Op, Box<Expr<'s>>),
    BinOp(Op, Box<Expr<'s>>, Box<Expr<'s>>),
    ApplyFunction(Box<Expr<'s>>, Vec<Expr<'s>>),
}

impl<'s> Expr<'s> {
    #[inline]
    fn expect_token<D>(lex: &mut Lexer<'s>, token: TokenKind<'s>, default: D) -> Result<D> {
        match lex.get_peek() {
            Some(peeked) if peeked.kind == token => {
                lex.set_next();
                Ok(default)
            }
            Some(peeked) => Err(peeked.into()),
            None => Err(ExprError::UnexpectedEnd),
        }
    }
    fn parse_list(lex: &mut Lexer<'s>, closing: TokenKind<'s>) -> Result<Vec<Self>> {
        let mut args = vec![];
        while lex.peek_tok() != closing {
            args.push(Self::parse_binop(lex, 0)?);
            if lex.peek_tok() != TokenKind::Comma {
                break;
            }
            lex.set_next();
        }
        Self::expect_token(lex, closing, args)
    }

    /// Decimal literals only. A leading zero followed by another digit is
    /// rejected, as a legacy octal literal would be in strict mode.
    pub fn parse_number(num: &'s str, span: Span) -> Result<Expr<'s>> {
        let invalid = |reason: String| ExprError::InvalidNumber {
            number: num.to_owned(),
            span,
            reason,
        };
        let bytes = num.as_bytes();
        if bytes.len() > 1 && bytes[0] == b'0' && bytes[1].is_ascii_digit() {
            return Err(invalid("leading zero".to_owned()));
        }
        num.parse::<f64>()
            .map(Expr::Im)
            .map_err(|err| invalid(err.to_string()))
    }

    fn parse_primitive(lex: &mut Lexer<'s>) -> Result<Expr<'s>> {
        match lex.next_tok() {
            TokenKind::Ident(s) => Ok(Self::Var(s)),
            TokenKind::Num(n) => Self::parse_number(n, lex.span()),
            TokenKind::OpenParen => {
                let expr = Self::parse_binop(lex, 0)?;
                Self::expect_token(lex, TokenKind::CloseParen, expr)
            }
            TokenKind::End => Err(ExprError::UnexpectedEnd),
            _ => Err(lex.get_prev().map_or(ExprError::UnexpectedEnd, Into::into)),
        }
    }
    fn parse_apply(lex: &mut Lexer<'s>) -> Result<Expr<'s>> {
        let mut out = Self::parse_primitive(lex)?;
        while let TokenKind::OpenParen = lex.peek_tok() {
            lex.set_next();
            let args = Self::parse_list(lex, TokenKind::CloseParen)?;
            out = Self::ApplyFunction(Box::new(out), args)
        }
        Ok(out)
    }
    /// Unary signs and the right associative `**`. A signed operand may not
    /// be the base of `**` unless parenthesised: `-2**2` is rejected.
    fn parse_monop(lex: &mut Lexer<'s>, signed: bool) -> Result<Expr<'s>> {
        match lex.peek_tok() {
            TokenKind::Op(op) if matches!(op, Op::Add | Op::Sub) => {
                lex.set_next();
                let arg = Self::parse_monop(lex, true)?;
                Ok(Self::MonOp(op, Box::new(arg)))
            }
            _ => {
                let base = Self::parse_apply(lex)?;
                match lex.get_peek() {
                    Some(tok) if tok.kind == TokenKind::Op(Op::Pow) => {
                        if signed {
                            return Err(tok.into());
                        }
                        lex.set_next();
                        let exp = Self::parse_monop(lex, false)?;
                        Ok(Self::BinOp(Op::Pow, Box::new(base), Box::new(exp)))
                    }
                    _ => Ok(base),
                }
            }
        }
    }
    fn parse_binop(lex: &mut Lexer<'s>, prec: u8) -> Result<Expr<'s>> {
        let mut lhs = Self::parse_monop(lex, false)?;
        loop {
            match lex.peek_tok() {
                TokenKind::Op(op) if op.is_infix() && prec <= op.prec() => {
                    lex.set_next();
                    let rhs = Self::parse_binop(lex, op.prec() + 1)?;
                    lhs = Self::BinOp(op, Box::new(lhs), Box::new(rhs));
                }
                _ => break Ok(lhs),
            }
        }
    }
    pub fn parse(input: &'s str) -> Result<Expr<'s>> {
        let mut lex = Lexer::new(input);
        if lex.tokens.len() > MAX_TOKENS {
            return Err(ExprError::TooLong {
                tokens: lex.tokens.len(),
                max: MAX_TOKENS,
            });
        }
        match (Self::parse_binop(&mut lex, 0)?, lex.get_next()) {
            (_, Some(t)) => Err((&t).into()),
            (out, _) => Ok(out),
        }
    }
}

impl<'s> Expr<'s> {
    pub fn eval(&self, ctx: &mut CalcCtx) -> Result<Value> {
        match self {
            Self::Im(v) => Ok(Value::Real(*v)),
            Self::Var(var) => match ctx.get_var(var) {
                Some(v) => Ok(v),
                None => Err(ExprError::UndefinedVariable((*var).to_owned())),
            },
            Expr::MonOp(op, expr) => Self::eval_monop(ctx, *op, expr),
            Expr::BinOp(op, lhs, rhs) => Self::eval_binop(ctx, *op, lhs, rhs),
            Expr::ApplyFunction(n, args) => Self::eval_apply(ctx, n, args),
        }
    }

    fn eval_apply(ctx: &mut CalcCtx, func: &Self, args: &[Self]) -> Result<Value> {
        let callee = func.eval(ctx)?;
        let args_values = args
            .iter()
            .map(|x| x.eval(ctx))
            .collect::<Result<Vec<_>>>()?;
        match callee {
            Value::Function(function) => (function)(ctx, args_values),
            v => Err(ExprError::ExpectedFunction(v.to_string())),
        }
    }

    #[inline]
    fn eval_binop(ctx: &mut CalcCtx, op: Op, lhs: &Self, rhs: &Self) -> Result<Value> {
        use Value::Real as R;

        #[rustfmt::skip]
        let out = match (op, lhs.eval(ctx)?, rhs.eval(ctx)?) {
            (Op::Add, R(x), R(y)) => R(x + y),
            (Op::Sub, R(x), R(y)) => R(x - y),
            (Op::Mul, R(x), R(y)) => R(x * y),
            (Op::Div, R(x), R(y)) => R(x / y),
            (Op::Rem, R(x), R(y)) => R(x % y),
            (Op::Pow, R(x), R(y)) => R(pow(x, y)),

            _ => return Err(ExprError::ExpectedNumber(op)),
        };

        Ok(out)
    }

    #[inline]
    fn eval_monop(ctx: &mut CalcCtx, op: Op, expr: &Self) -> Result<Value> {
        match (op, expr.eval(ctx)?) {
            (Op::Add, Value::Real(x)) => Ok(Value::Real(x)),
            (Op::Sub, Value::Real(x)) => Ok(Value::Real(-x)),
            _ => Err(ExprError::ExpectedNumber(op)),
        }
    }
}

/// `powf` with the ECMAScript exceptions: a NaN exponent is always NaN, and
/// so is `±1 ** ±Infinity`.
fn pow(base: f64, exp: f64) -> f64 {
    if exp.is_nan() || (base.abs() == 1.0 && exp.is_infinite()) {
        return f64::NAN;
    }
    base.powf(exp)
}

impl fmt::Display for Expr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Im(im) => write!(f, "{im}"),
            Expr::Var(v) => f.write_str(v),
            Expr::MonOp(op, expr) => write!(f, "({op}{expr})"),
            Expr::BinOp(op, lhs, rhs) => write!(f, "({lhs} {op} {rhs})"),
            Expr::ApplyFunction(name, args) => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
        }
    }
}
