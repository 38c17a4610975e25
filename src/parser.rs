use crate::{
    error::ExpressionError,
    expression::{funexpr, Expression},
    hoist::MAX_DEPTH,
};
use anyhow::{bail, ensure, Result};
use tracing::trace;

pub(crate) struct Parser {}

impl Parser {
    fn skip_whitespace_and_comments(source: &mut &[u8]) {
        let mut is_comment = false;
        for i in 0..source.len() {
            let ch = source[i];
            if ch == b'#' {
                is_comment = true;
            }
            if ch == b'\n' {
                is_comment = false;
            }
            if ch <= b' ' || is_comment {
                continue;
            }
            *source = &source[i..];
            return;
        }
        *source = &source[source.len()..];
    }

    fn peek(source: &mut &[u8]) -> Option<u8> {
        Self::skip_whitespace_and_comments(source);
        source.first().copied()
    }

    fn expect_close(source: &mut &[u8]) -> Result<()> {
        match Self::peek(source) {
            Some(b')') => {
                *source = &source[1..];
                Ok(())
            }
            Some(ch) => bail!("Invalid character: [{}]", ch as char),
            None => bail!("Premature end of expression."),
        }
    }

    fn enter(depth: usize) -> Result<usize> {
        ensure!(
            depth < MAX_DEPTH,
            ExpressionError::TooDeep {
                depth: depth + 1,
                limit: MAX_DEPTH,
            }
        );
        Ok(depth + 1)
    }

    fn parse_number(source: &mut &[u8]) -> Result<f64> {
        let s = *source;
        let digits = |mut i: usize| {
            while i < s.len() && s[i].is_ascii_digit() {
                i += 1;
            }
            i
        };
        let mut len = digits(0);
        if s.get(len) == Some(&b'.') {
            len = digits(len + 1);
        }
        if matches!(s.get(len), Some(b'e' | b'E')) {
            let mut start = len + 1;
            if matches!(s.get(start), Some(b'+' | b'-')) {
                start += 1;
            }
            let end = digits(start);
            ensure!(end > start, "Malformed number literal.");
            len = end;
        }
        let literal = std::str::from_utf8(&s[..len])?;
        let value = literal.parse::<f64>()?;
        ensure!(value.is_finite(), "Number literal out of range: [{}]", literal);
        *source = &s[len..];
        Ok(value)
    }

    fn parse_identifier(source: &mut &[u8]) -> Result<String> {
        Self::skip_whitespace_and_comments(source);
        let len = source
            .iter()
            .take_while(|ch| ch.is_ascii_alphanumeric() || **ch == b'_')
            .count();
        match source.first() {
            Some(ch) if len > 0 && !ch.is_ascii_digit() => {}
            Some(ch) => bail!("Invalid character: [{}]", *ch as char),
            None => bail!("Unexpected end of source."),
        }
        let name = String::from_utf8(source[..len].to_vec())?;
        *source = &source[len..];
        Ok(name)
    }

    // Consumes `(a, b, ...)`.
    fn parse_arguments(source: &mut &[u8], depth: usize) -> Result<Vec<Expression>> {
        match Self::peek(source) {
            Some(b'(') => *source = &source[1..],
            Some(ch) => bail!("Invalid character: [{}]", ch as char),
            None => bail!("Premature end of expression."),
        }
        let mut args = Vec::new();
        if Self::peek(source) == Some(b')') {
            *source = &source[1..];
            return Ok(args);
        }
        loop {
            args.push(Self::parse_sum(source, depth)?);
            match Self::peek(source) {
                Some(b',') => *source = &source[1..],
                Some(b')') => {
                    *source = &source[1..];
                    return Ok(args);
                }
                Some(ch) => bail!("Invalid character: [{}]", ch as char),
                None => bail!("Premature end of expression."),
            }
        }
    }

    fn parse_primary(source: &mut &[u8], depth: usize) -> Result<Expression> {
        match Self::peek(source) {
            None => bail!("Unexpected end of source."),
            Some(b'(') => {
                *source = &source[1..];
                let e = Self::parse_sum(source, depth)?;
                Self::expect_close(source)?;
                Ok(e)
            }
            Some(b')') => bail!("Mismatched close-parenthesis!"),
            Some(ch) if ch.is_ascii_digit() => Ok(Expression::constant(Self::parse_number(source)?)),
            Some(ch) if ch.is_ascii_alphabetic() || ch == b'_' => {
                let name = Self::parse_identifier(source)?;
                if Self::peek(source) != Some(b'(') {
                    return Ok(Expression::variable(name));
                }
                let args = Self::parse_arguments(source, depth)?;
                ensure!(args.len() <= 3, "Too many arguments to [{}].", name);
                Ok(funexpr(&name, args))
            }
            Some(ch) => bail!("Invalid character: [{}]", ch as char),
        }
    }

    fn parse_postfix(source: &mut &[u8], depth: usize) -> Result<Expression> {
        let mut e = Self::parse_primary(source, depth)?;
        loop {
            match Self::peek(source) {
                Some(b'.') => {
                    *source = &source[1..];
                    let name = Self::parse_identifier(source)?;
                    let args = Self::parse_arguments(source, depth)?;
                    ensure!(args.len() <= 2, "Too many arguments to [{}].", name);
                    e = e.method(name, args);
                }
                Some(b'(') => {
                    *source = &source[1..];
                    let arg = Self::parse_sum(source, depth)?;
                    Self::expect_close(source)?;
                    e = e.apply(&arg);
                }
                _ => return Ok(e),
            }
        }
    }

    fn parse_unary(source: &mut &[u8], depth: usize) -> Result<Expression> {
        let depth = Self::enter(depth)?;
        if Self::peek(source) != Some(b'-') {
            return Self::parse_postfix(source, depth);
        }
        *source = &source[1..];
        // A minus sign glued to a literal is part of the literal.
        if source.first().map_or(false, u8::is_ascii_digit) {
            return Ok(Expression::constant(-Self::parse_number(source)?));
        }
        Ok(-Self::parse_unary(source, depth)?)
    }

    fn parse_product(source: &mut &[u8], depth: usize) -> Result<Expression> {
        let mut e = Self::parse_unary(source, depth)?;
        // Each operator pushes the left operand one level deeper.
        let mut levels = depth + 1;
        loop {
            match Self::peek(source) {
                Some(b'*') => {
                    *source = &source[1..];
                    levels = Self::enter(levels)?;
                    e = e * Self::parse_unary(source, depth)?;
                }
                Some(b'/') => {
                    *source = &source[1..];
                    levels = Self::enter(levels)?;
                    e = e / Self::parse_unary(source, depth)?;
                }
                _ => return Ok(e),
            }
        }
    }

    fn parse_sum(source: &mut &[u8], depth: usize) -> Result<Expression> {
        let mut e = Self::parse_product(source, depth)?;
        // Each operator pushes the left operand one level deeper.
        let mut levels = depth + 1;
        loop {
            match Self::peek(source) {
                Some(b'+') => {
                    *source = &source[1..];
                    levels = Self::enter(levels)?;
                    e = e + Self::parse_product(source, depth)?;
                }
                Some(b'-') => {
                    *source = &source[1..];
                    levels = Self::enter(levels)?;
                    e = e - Self::parse_product(source, depth)?;
                }
                _ => return Ok(e),
            }
        }
    }

    pub fn parse(source: &str) -> Result<Expression> {
        let mut b = source.as_bytes();
        let e = Self::parse_sum(&mut b, 0)?;
        match Self::peek(&mut b) {
            None => {}
            Some(b')') => bail!("Unmatched trailing close-parenthesis."),
            Some(ch) => bail!("Invalid character: [{}]", ch as char),
        }
        e.check_depth(MAX_DEPTH)?;
        trace!("parsed {} bytes into {}", source.len(), e);
        Ok(e)
    }
}

/// Parses the text form produced by [`Expression::printme`].
///
/// ```
/// use deft_expression::{parse, Expression};
/// let x = Expression::variable("x");
/// let y = Expression::variable("y");
/// assert_eq!(parse("x * 2.0 + y").unwrap(), &x * 2.0 + &y);
/// assert!(parse("x * (2.0").is_err());
/// ```
pub fn parse(source: &str) -> Result<Expression> {
    Parser::parse(source)
}
