//! Literal-only reader for test-case data.
//!
//! Accepts numbers, single- or double-quoted strings, arrays, objects (with
//! bare or quoted keys), `true`, `false`, `null` and `undefined` (read as
//! null). Trailing commas are allowed. Anything else is rejected: this is
//! never an expression evaluator.

use serde_json::{Map, Number, Value};

use crate::error::LiteralError;

/// Parse a single literal value. The whole input must be consumed.
pub fn parse_literal(src: &str) -> Result<Value, LiteralError> {
    let mut reader = Reader::new(src);
    reader.skip_whitespace();
    let value = reader.value()?;
    reader.skip_whitespace();
    if !reader.at_end() {
        return Err(LiteralError::new(reader.pos, "unexpected trailing input"));
    }
    Ok(value)
}

/// Parse a comma-separated argument list, e.g. the text between the
/// parentheses of `sum(1, [2, 3], 'x')`. Empty input yields no arguments.
pub fn parse_arguments(src: &str) -> Result<Vec<Value>, LiteralError> {
    let mut reader = Reader::new(src);
    let mut args = Vec::new();

    reader.skip_whitespace();
    while !reader.at_end() {
        args.push(reader.value()?);
        reader.skip_whitespace();
        match reader.peek() {
            None => break,
            Some(',') => {
                reader.bump();
                reader.skip_whitespace();
            }
            Some(c) => {
                return Err(LiteralError::new(
                    reader.pos,
                    format!("expected ',' between arguments, found '{}'", c),
                ))
            }
        }
    }

    Ok(args)
}

struct Reader<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), LiteralError> {
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(LiteralError::new(
                self.pos - c.len_utf8(),
                format!("expected '{}', found '{}'", expected, c),
            )),
            None => Err(LiteralError::new(
                self.pos,
                format!("expected '{}', found end of input", expected),
            )),
        }
    }

    fn value(&mut self) -> Result<Value, LiteralError> {
        match self.peek() {
            Some('[') => self.array(),
            Some('{') => self.object(),
            Some(q @ ('"' | '\'')) => self.string(q).map(Value::String),
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.number(),
            Some(c) if is_ident_start(c) => self.keyword(),
            Some(c) => Err(LiteralError::new(
                self.pos,
                format!("unexpected character '{}'", c),
            )),
            None => Err(LiteralError::new(self.pos, "expected a value")),
        }
    }

    fn keyword(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        let word = self.identifier();
        match word {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            "null" | "undefined" | "None" => Ok(Value::Null),
            "True" => Ok(Value::Bool(true)),
            "False" => Ok(Value::Bool(false)),
            other => Err(LiteralError::new(
                start,
                format!("'{}' is not a literal", other),
            )),
        }
    }

    fn identifier(&mut self) -> &'a str {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if is_ident_continue(c)) {
            self.bump();
        }
        &self.src[start..self.pos]
    }

    fn number(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        if matches!(self.peek(), Some('-' | '+')) {
            self.bump();
        }
        let digits_start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '_') {
            self.bump();
        }
        let mut is_float = false;
        if self.peek() == Some('.') {
            is_float = true;
            self.bump();
            while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '_') {
                self.bump();
            }
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            is_float = true;
            self.bump();
            if matches!(self.peek(), Some('-' | '+')) {
                self.bump();
            }
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.bump();
            }
        }

        let text: String = self.src[start..self.pos]
            .chars()
            .filter(|c| *c != '_' && *c != '+')
            .collect();
        if !self.src[digits_start..self.pos]
            .chars()
            .any(|c| c.is_ascii_digit())
        {
            return Err(LiteralError::new(start, "malformed number"));
        }

        if !is_float {
            if let Ok(n) = text.parse::<i64>() {
                return Ok(Value::Number(n.into()));
            }
        }
        text.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| LiteralError::new(start, format!("malformed number '{}'", text)))
    }

    fn string(&mut self, quote: char) -> Result<String, LiteralError> {
        let start = self.pos;
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(LiteralError::new(start, "unterminated string")),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => {
                    let escaped = self
                        .bump()
                        .ok_or_else(|| LiteralError::new(start, "unterminated string"))?;
                    match escaped {
                        'n' => out.push('\n'),
                        't' => out.push('\t'),
                        'r' => out.push('\r'),
                        '0' => out.push('\0'),
                        'u' => out.push(self.unicode_escape()?),
                        other => out.push(other),
                    }
                }
                Some(c) => out.push(c),
            }
        }
    }

    fn unicode_escape(&mut self) -> Result<char, LiteralError> {
        let start = self.pos;
        let hex = self
            .rest()
            .get(..4)
            .ok_or_else(|| LiteralError::new(start, "short unicode escape"))?;
        let code = u32::from_str_radix(hex, 16)
            .map_err(|_| LiteralError::new(start, "invalid unicode escape"))?;
        self.pos += 4;
        char::from_u32(code).ok_or_else(|| LiteralError::new(start, "invalid unicode scalar"))
    }

    fn array(&mut self) -> Result<Value, LiteralError> {
        self.expect('[')?;
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.peek() == Some(']') {
                self.bump();
                return Ok(Value::Array(items));
            }
            items.push(self.value()?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(']') => {}
                _ => return Err(LiteralError::new(self.pos, "expected ',' or ']' in array")),
            }
        }
    }

    fn object(&mut self) -> Result<Value, LiteralError> {
        self.expect('{')?;
        let mut map = Map::new();
        loop {
            self.skip_whitespace();
            let key = match self.peek() {
                Some('}') => {
                    self.bump();
                    return Ok(Value::Object(map));
                }
                Some(q @ ('"' | '\'')) => self.string(q)?,
                Some(c) if is_ident_start(c) => self.identifier().to_string(),
                Some(c) if c.is_ascii_digit() => {
                    let start = self.pos;
                    while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                        self.bump();
                    }
                    self.src[start..self.pos].to_string()
                }
                _ => return Err(LiteralError::new(self.pos, "expected an object key")),
            };
            self.skip_whitespace();
            self.expect(':')?;
            self.skip_whitespace();
            let value = self.value()?;
            map.insert(key, value);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some('}') => {}
                _ => return Err(LiteralError::new(self.pos, "expected ',' or '}' in object")),
            }
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
