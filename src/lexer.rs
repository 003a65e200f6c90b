use core::fmt;
use std::iter::Peekable;

pub struct Lexer<'s> {
    pub input: &'s str,
    pub tokens: Vec<Token<'s>>,
    pub idx: usize,
}

impl<'s> Lexer<'s> {
    pub fn new(input: &'s str) -> Self {
        let mut stream = input.char_indices().peekable();
        let tokens = (0..)
            .map(|_| Self::parse_token(input, &mut stream))
            .take_while(Option::is_some)
            .flatten()
            .collect::<Vec<_>>();

        Self {
            input,
            tokens,
            idx: 0,
        }
    }
}

impl<'s> Lexer<'s> {
    /// Consumes chars matching `pred`, returning the byte offset just past the last one.
    fn eat_while<IT: Iterator<Item = (usize, char)>>(
        stream: &mut Peekable<IT>,
        mut end: usize,
        pred: impl Fn(char) -> bool,
    ) -> usize {
        while let Some((i, c)) = stream.next_if(|&(_, c)| pred(c)) {
            end = i + c.len_utf8();
        }
        end
    }

    fn parse_token<IT: Iterator<Item = (usize, char)>>(
        input: &'s str,
        stream: &mut Peekable<IT>,
    ) -> Option<Token<'s>> {
        while stream.next_if(|(_, c)| c.is_whitespace()).is_some() {}
        let (i, c) = stream.next()?;
        let after = i + c.len_utf8();

        if matches!(c, '.' | '0'..='9') {
            let mut end = Self::eat_while(stream, after, |c| c.is_ascii_digit() || c == '.');
            if let Some(len) = exponent_len(&input[end..]) {
                end += len;
                while stream.next_if(|&(j, _)| j < end).is_some() {}
            }
            return Some(Token::num(&input[i..end], i, end));
        } else if c.is_alphabetic() {
            // `Math.sqrt` lexes as a single dotted identifier
            let end = Self::eat_while(stream, after, |c| c.is_alphanumeric() || c == '.');
            return Some(Token::new(TokenKind::Ident(&input[i..end]), i, end));
        } else if c == '*' && stream.next_if(|&(_, c)| c == '*').is_some() {
            return Some(Token::op(Op::Pow, i, after + 1));
        } else if matches!(c, '+' | '-') && stream.next_if(|&(_, n)| n == c).is_some() {
            return Some(Token::new(TokenKind::Update(&input[i..after + 1]), i, after + 1));
        }

        Some(match c {
            '(' => Token::new(TokenKind::OpenParen, i, after),
            ')' => Token::new(TokenKind::CloseParen, i, after),
            ',' => Token::new(TokenKind::Comma, i, after),
            '+' => Token::op(Op::Add, i, after),
            '-' => Token::op(Op::Sub, i, after),
            '*' => Token::op(Op::Mul, i, after),
            '/' => Token::op(Op::Div, i, after),
            '%' => Token::op(Op::Rem, i, after),
            _ => Token::new(TokenKind::Unknown(c), i, after),
        })
    }
}

/// Length of an exponent suffix (`e21`, `e+21`, `E-7`) at the start of
/// `rest`. At least one digit is required.
fn exponent_len(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    if !matches!(bytes.first(), Some(b'e' | b'E')) {
        return None;
    }
    let sign = usize::from(matches!(bytes.get(1), Some(b'+' | b'-')));
    let digits = bytes[1 + sign..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    (digits > 0).then_some(1 + sign + digits)
}

impl<'s> Lexer<'s> {
    #[inline(always)]
    pub fn get_peek(&self) -> Option<&Token<'s>> {
        self.tokens.get(self.idx)
    }

    /// The most recently consumed token.
    pub fn get_prev(&self) -> Option<&Token<'s>> {
        self.idx.checked_sub(1).and_then(|idx| self.tokens.get(idx))
    }

    #[inline(always)]
    pub fn get_next(&mut self) -> Option<Token<'s>> {
        let tok = self.tokens.get(self.idx).copied();
        if tok.is_some() {
            self.idx += 1;
        }
        tok
    }

    #[inline(always)]
    pub fn peek_tok(&self) -> TokenKind<'s> {
        match self.get_peek() {
            Some(x) => x.kind,
            None => TokenKind::End,
        }
    }
    #[inline(always)]
    pub fn next_tok(&mut self) -> TokenKind<'s> {
        match self.get_next() {
            Some(x) => x.kind,
            None => TokenKind::End,
        }
    }

    #[inline(always)]
    pub fn set_next(&mut self) {
        if self.idx < self.tokens.len() {
            self.idx += 1;
        }
    }

    #[inline(always)]
    pub fn span(&self) -> Span {
        self.get_prev().map(|tok| tok.span).unwrap_or(Span {
            begin: self.input.len(),
            end: self.input.len(),
        })
    }
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Op {
    Add = 1,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}
impl Op {
    #[inline]
    pub const fn prec(self) -> u8 {
        match self {
            Op::Add | Op::Sub => 1,
            Op::Mul | Op::Div | Op::Rem => 2,
            Op::Pow => 3,
        }
    }

    /// Operators handled by precedence climbing. `**` binds tighter than
    /// unary signs and is parsed separately.
    #[inline]
    pub const fn is_infix(self) -> bool {
        !matches!(self, Op::Pow)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TokenKind<'s> {
    Op(Op),
    Unknown(char),
    Num(&'s str),
    Ident(&'s str),
    /// `++` or `--`, never valid between operands.
    Update(&'s str),
    Comma,
    OpenParen,
    CloseParen,
    End,
}

/// Byte range of a token, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Span {
    pub begin: usize,
    pub end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Token<'s> {
    pub span: Span,
    pub kind: TokenKind<'s>,
}

impl<'s> Token<'s> {
    const fn new(kind: TokenKind<'s>, begin: usize, end: usize) -> Self {
        Self {
            span: Span { begin, end },
            kind,
        }
    }
    const fn op(op: Op, begin: usize, end: usize) -> Self {
        Self::new(TokenKind::Op(op), begin, end)
    }
    const fn num(num: &'s str, begin: usize, end: usize) -> Self {
        Self::new(TokenKind::Num(num), begin, end)
    }
}
impl Op {
    pub const fn as_str(self) -> &'static str {
        match self {
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Div => "/",
            Op::Rem => "%",
            Op::Pow => "**",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.begin, self.end)
    }
}

impl fmt::Display for TokenKind<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Op(op) => f.write_str(op.as_str()),
            TokenKind::Unknown(c) => write!(f, "{c}"),
            TokenKind::Num(n) => write!(f, "{n}"),
            TokenKind::Ident(s) | TokenKind::Update(s) => f.write_str(s),
            TokenKind::End => f.write_str("end"),
            TokenKind::OpenParen => f.write_str("("),
            TokenKind::CloseParen => f.write_str(")"),
            TokenKind::Comma => f.write_str(","),
        }
    }
}
