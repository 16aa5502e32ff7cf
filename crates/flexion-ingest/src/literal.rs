//! Sandboxed evaluation of JS-flavored literal expressions
//!
//! Last resort of the extraction cascade, used only on trusted,
//! locally-authored input. Reads objects, arrays, strings in all three quote
//! styles, numbers, booleans, and null - and nothing else. A bare identifier
//! in value position evaluates to its own name as a string, matching the
//! flattening the quote normalizer applies to template interpolations.
//! Function calls, spreads, and arithmetic abort the parse.

use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Errors from the literal evaluator
#[derive(Error, Debug)]
pub enum LiteralError {
    /// Input ended mid-expression
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// A character that no literal form can start or continue with
    #[error("unexpected character '{0}' at offset {1}")]
    Unexpected(char, usize),

    /// A numeric token that did not parse
    #[error("invalid number at offset {0}")]
    InvalidNumber(usize),

    /// A malformed escape sequence inside a string
    #[error("invalid escape at offset {0}")]
    InvalidEscape(usize),
}

/// Evaluate one self-contained literal expression
pub(crate) fn parse(text: &str) -> Result<Value, LiteralError> {
    let mut reader = Reader {
        chars: text.chars().collect(),
        pos: 0,
    };
    reader.skip_trivia();
    let value = reader.value()?;
    reader.skip_trivia();
    if reader.peek() == Some(';') {
        reader.bump();
        reader.skip_trivia();
    }
    match reader.peek() {
        None => Ok(value),
        Some(c) => Err(LiteralError::Unexpected(c, reader.pos)),
    }
}

struct Reader {
    chars: Vec<char>,
    pos: usize,
}

impl Reader {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.pos += 1;
                }
                Some('/') if self.chars.get(self.pos + 1) == Some(&'/') => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.pos += 1;
                    }
                }
                Some('/') if self.chars.get(self.pos + 1) == Some(&'*') => {
                    self.pos += 2;
                    while self.pos < self.chars.len()
                        && !(self.chars[self.pos] == '*'
                            && self.chars.get(self.pos + 1) == Some(&'/'))
                    {
                        self.pos += 1;
                    }
                    self.pos = (self.pos + 2).min(self.chars.len());
                }
                _ => return,
            }
        }
    }

    fn value(&mut self) -> Result<Value, LiteralError> {
        self.skip_trivia();
        match self.peek() {
            None => Err(LiteralError::UnexpectedEof),
            Some('{') => self.object(),
            Some('[') => self.array(),
            Some(q @ ('"' | '\'' | '`')) => self.string(q).map(Value::String),
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => self.number(),
            Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {
                let ident = self.ident();
                Ok(match ident.as_str() {
                    "true" => Value::Bool(true),
                    "false" => Value::Bool(false),
                    "null" | "undefined" => Value::Null,
                    _ => Value::String(ident),
                })
            }
            Some(c) => Err(LiteralError::Unexpected(c, self.pos)),
        }
    }

    fn object(&mut self) -> Result<Value, LiteralError> {
        self.bump();
        let mut map = Map::new();
        loop {
            self.skip_trivia();
            match self.peek() {
                Some('}') => {
                    self.bump();
                    return Ok(Value::Object(map));
                }
                None => return Err(LiteralError::UnexpectedEof),
                _ => {}
            }

            let key = self.key()?;
            self.skip_trivia();
            match self.bump() {
                Some(':') => {}
                Some(c) => return Err(LiteralError::Unexpected(c, self.pos - 1)),
                None => return Err(LiteralError::UnexpectedEof),
            }
            let value = self.value()?;
            map.insert(key, value);

            self.skip_trivia();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some('}') => {}
                Some(c) => return Err(LiteralError::Unexpected(c, self.pos)),
                None => return Err(LiteralError::UnexpectedEof),
            }
        }
    }

    fn array(&mut self) -> Result<Value, LiteralError> {
        self.bump();
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            match self.peek() {
                Some(']') => {
                    self.bump();
                    return Ok(Value::Array(items));
                }
                None => return Err(LiteralError::UnexpectedEof),
                _ => {}
            }

            items.push(self.value()?);

            self.skip_trivia();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(']') => {}
                Some(c) => return Err(LiteralError::Unexpected(c, self.pos)),
                None => return Err(LiteralError::UnexpectedEof),
            }
        }
    }

    fn key(&mut self) -> Result<String, LiteralError> {
        match self.peek() {
            Some(q @ ('"' | '\'' | '`')) => self.string(q),
            Some(c) if c.is_alphabetic() || c == '_' || c == '$' => Ok(self.ident()),
            Some(c) => Err(LiteralError::Unexpected(c, self.pos)),
            None => Err(LiteralError::UnexpectedEof),
        }
    }

    fn ident(&mut self) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '$' {
                out.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        out
    }

    fn string(&mut self, quote: char) -> Result<String, LiteralError> {
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(LiteralError::UnexpectedEof),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => {
                    let esc = self.bump().ok_or(LiteralError::UnexpectedEof)?;
                    match esc {
                        'n' => out.push('\n'),
                        't' => out.push('\t'),
                        'r' => out.push('\r'),
                        '0' => out.push('\0'),
                        'u' => {
                            let mut code = 0u32;
                            for _ in 0..4 {
                                let digit = self
                                    .bump()
                                    .and_then(|c| c.to_digit(16))
                                    .ok_or(LiteralError::InvalidEscape(self.pos))?;
                                code = code * 16 + digit;
                            }
                            out.push(
                                char::from_u32(code)
                                    .ok_or(LiteralError::InvalidEscape(self.pos))?,
                            );
                        }
                        other => out.push(other),
                    }
                }
                Some('$') if quote == '`' && self.peek() == Some('{') => {
                    // interpolation flattens to its source text
                    self.bump();
                    let mut depth = 1usize;
                    while depth > 0 {
                        match self.bump() {
                            None => return Err(LiteralError::UnexpectedEof),
                            Some('{') => {
                                depth += 1;
                                out.push('{');
                            }
                            Some('}') => {
                                depth -= 1;
                                if depth > 0 {
                                    out.push('}');
                                }
                            }
                            Some(c) => out.push(c),
                        }
                    }
                }
                Some(c) => out.push(c),
            }
        }
    }

    fn number(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        let mut token = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-') {
                token.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        if let Ok(int) = token.parse::<i64>() {
            return Ok(Value::Number(Number::from(int)));
        }
        token
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or(LiteralError::InvalidNumber(start))
    }
}
