//! Restricted arithmetic evaluator for inline `math <expr>` fragments
//!
//! Grammar (`x` is accepted as multiplication):
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor (('*' | 'x' | '/') factor)*
//! factor := number | '-' factor | '(' expr ')'
//! ```
//!
//! Nothing outside this grammar is ever evaluated.

use log::trace;

/// Nesting limit for parentheses and unary minus
const MAX_DEPTH: usize = 64;

/// Keyword introducing an inline expression
const INLINE_KEYWORD: &str = "math";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExprError {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("unexpected token {0}")]
    UnexpectedToken(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("expression nested too deeply")]
    TooDeep,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Num(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

fn tokenize(src: &str) -> Result<Vec<Token>, ExprError> {
    let mut tokens = Vec::new();
    let mut chars = src.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '0'..='9' | '.' => {
                let mut end = start;
                while let Some(&(i, d)) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        end = i + d.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let text = &src[start..end];
                let value = text
                    .parse::<f64>()
                    .map_err(|_| ExprError::InvalidNumber(text.to_string()))?;
                tokens.push(Token::Num(value));
            }
            _ => {
                let token = match c {
                    '+' => Token::Plus,
                    '-' => Token::Minus,
                    '*' | 'x' | 'X' => Token::Star,
                    '/' => Token::Slash,
                    '(' => Token::LParen,
                    ')' => Token::RParen,
                    other => return Err(ExprError::UnexpectedChar(other)),
                };
                tokens.push(token);
                chars.next();
            }
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.peek();
        self.pos += 1;
        token
    }

    fn descend(&mut self) -> Result<(), ExprError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ExprError::TooDeep);
        }
        Ok(())
    }

    fn expr(&mut self) -> Result<f64, ExprError> {
        let mut value = self.term()?;
        while let Some(token @ (Token::Plus | Token::Minus)) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            value = if token == Token::Plus {
                value + rhs
            } else {
                value - rhs
            };
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, ExprError> {
        let mut value = self.factor()?;
        while let Some(token @ (Token::Star | Token::Slash)) = self.peek() {
            self.pos += 1;
            let rhs = self.factor()?;
            value = if token == Token::Star {
                value * rhs
            } else {
                if rhs == 0.0 {
                    return Err(ExprError::DivisionByZero);
                }
                value / rhs
            };
        }
        Ok(value)
    }

    fn factor(&mut self) -> Result<f64, ExprError> {
        match self.next() {
            Some(Token::Num(value)) => Ok(value),
            Some(Token::Minus) => {
                self.descend()?;
                let value = -self.factor()?;
                self.depth -= 1;
                Ok(value)
            }
            Some(Token::LParen) => {
                self.descend()?;
                let value = self.expr()?;
                match self.next() {
                    Some(Token::RParen) => {
                        self.depth -= 1;
                        Ok(value)
                    }
                    Some(other) => Err(ExprError::UnexpectedToken(format!("{other:?}"))),
                    None => Err(ExprError::UnexpectedEnd),
                }
            }
            Some(other) => Err(ExprError::UnexpectedToken(format!("{other:?}"))),
            None => Err(ExprError::UnexpectedEnd),
        }
    }
}

/// Evaluate an arithmetic expression
pub fn evaluate(src: &str) -> Result<f64, ExprError> {
    let tokens = tokenize(src)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    if let Some(extra) = parser.peek() {
        return Err(ExprError::UnexpectedToken(format!("{extra:?}")));
    }
    trace!("🧮 {src:?} = {value}");
    Ok(value)
}

/// Render a result without a trailing `.0` for whole numbers
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

fn is_expr_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | '*' | '/' | '(' | ')' | 'x' | 'X' | ' ' | '\t')
}

/// Length of the arithmetic run at the start of `text`
///
/// The run ends at the first non-arithmetic character or at a `)` with no
/// matching `(` inside the run.
fn expression_len(text: &str) -> usize {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => return i,
            ')' => depth -= 1,
            c if !is_expr_char(c) => return i,
            _ => {}
        }
    }
    text.len()
}

/// Whether `text` opens with something an expression can start with
fn starts_expression(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() || c == '(' || c == '-' => true,
        Some('.') => chars.next().is_some_and(|c| c.is_ascii_digit()),
        _ => false,
    }
}

/// Replace every `math <expr>` fragment in `text` with its value
///
/// The expression must start with a digit, `(`, `-` or `.digit`; it runs
/// until the arithmetic characters end, trimmed back to end on a digit or
/// `)`. Anything else after the keyword leaves it as plain text.
pub fn expand_inline_math(text: &str) -> Result<String, ExprError> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(at) = rest.find(INLINE_KEYWORD) {
        let before = &rest[..at];
        let after_keyword = &rest[at + INLINE_KEYWORD.len()..];
        let at_word_start = !before
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == '_');
        let spaced = after_keyword.starts_with([' ', '\t']);
        let body = after_keyword.trim_start_matches([' ', '\t']);

        let expr = body[..expression_len(body)]
            .trim_end_matches(|c: char| !(c.is_ascii_digit() || c == ')'));

        if !at_word_start || !spaced || !starts_expression(body) || expr.is_empty() {
            out.push_str(&rest[..at + INLINE_KEYWORD.len()]);
            rest = after_keyword;
            continue;
        }

        let value = evaluate(expr)?;
        out.push_str(before);
        out.push_str(&format_number(value));
        rest = &body[expr.len()..];
    }

    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence() {
        assert_eq!(evaluate("2 + 3 * 4").unwrap(), 14.0);
        assert_eq!(evaluate("(2 + 3) * 4").unwrap(), 20.0);
        assert_eq!(evaluate("10 - 4 - 3").unwrap(), 3.0);
        assert_eq!(evaluate("8 / 4 / 2").unwrap(), 1.0);
    }

    #[test]
    fn test_x_is_multiplication() {
        assert_eq!(evaluate("6x7").unwrap(), 42.0);
        assert_eq!(evaluate("2 X 2.5").unwrap(), 5.0);
    }

    #[test]
    fn test_unary_minus_and_decimals() {
        assert_eq!(evaluate("-3 + 5").unwrap(), 2.0);
        assert_eq!(evaluate("--2").unwrap(), 2.0);
        assert_eq!(evaluate("0.5 * 3").unwrap(), 1.5);
    }

    #[test]
    fn test_errors() {
        assert_eq!(evaluate("1 / 0"), Err(ExprError::DivisionByZero));
        assert_eq!(evaluate("2 +"), Err(ExprError::UnexpectedEnd));
        assert_eq!(evaluate("(1 + 2"), Err(ExprError::UnexpectedEnd));
        assert_eq!(evaluate("1..2"), Err(ExprError::InvalidNumber("1..2".into())));
        assert_eq!(evaluate("__import__"), Err(ExprError::UnexpectedChar('_')));
        assert!(matches!(evaluate("1 2"), Err(ExprError::UnexpectedToken(_))));
        assert!(matches!(evaluate(""), Err(ExprError::UnexpectedEnd)));
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}1{}", "(".repeat(200), ")".repeat(200));
        assert_eq!(evaluate(&deep), Err(ExprError::TooDeep));
        let negs = format!("{}1", "-".repeat(200));
        assert_eq!(evaluate(&negs), Err(ExprError::TooDeep));
        let ok = format!("{}1{}", "(".repeat(10), ")".repeat(10));
        assert_eq!(evaluate(&ok).unwrap(), 1.0);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(42.0), "42");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(2.5), "2.5");
    }

    #[test]
    fn test_expand_inline_math() {
        assert_eq!(
            expand_inline_math("total: math 2x3 items").unwrap(),
            "total: 6 items"
        );
        assert_eq!(
            expand_inline_math("math (1+2)*3 and math 10/4").unwrap(),
            "9 and 2.5"
        );
        assert_eq!(
            expand_inline_math("math 2x3 xylophone").unwrap(),
            "6 xylophone"
        );
    }

    #[test]
    fn test_expand_leaves_plain_words() {
        assert_eq!(expand_inline_math("math is fun").unwrap(), "math is fun");
        assert_eq!(expand_inline_math("aftermath 3").unwrap(), "aftermath 3");
        assert_eq!(expand_inline_math("math3").unwrap(), "math3");
        assert_eq!(expand_inline_math("no keyword").unwrap(), "no keyword");
    }

    #[test]
    fn test_expand_stops_at_unmatched_paren() {
        assert_eq!(
            expand_inline_math("(the answer is math 2+2)").unwrap(),
            "(the answer is 4)"
        );
        assert_eq!(
            expand_inline_math("(math (1+1)*3) wins").unwrap(),
            "(6) wins"
        );
    }

    #[test]
    fn test_expand_needs_expression_start() {
        assert_eq!(expand_inline_math("I like math .").unwrap(), "I like math .");
        assert_eq!(expand_inline_math("math + more").unwrap(), "math + more");
        assert_eq!(expand_inline_math("math -").unwrap(), "math -");
        assert_eq!(expand_inline_math("about math .5x4").unwrap(), "about 2");
        assert_eq!(expand_inline_math("total: math 3x4.").unwrap(), "total: 12.");
    }

    #[test]
    fn test_expand_propagates_errors() {
        assert_eq!(
            expand_inline_math("math 1/0"),
            Err(ExprError::DivisionByZero)
        );
    }
}
