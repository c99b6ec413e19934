//! Streaming recursive-descent JSON reader.
//!
//! [`JsonReader`] consumes a character stream and exposes two layers: token
//! classification ([`next_token`](JsonReader::next_token) peeks at the next
//! significant character without consuming it) and parse operations that each
//! consume exactly one complete JSON value while enforcing separators and a
//! configurable nesting limit.
//!
//! Two leniencies beyond RFC 8259 are accepted on read: case-insensitive
//! literals (`TRUE`, `Null`) and legacy URL-style `%XX` / `%uXXXX` escapes
//! inside strings. The writer never emits either form.

use std::fmt;
use std::iter::Peekable;

use crate::error::{Error, SyntaxError};
use crate::value::{
    JsonArray, JsonObject, JsonString, JsonValue, Number, FALSE_LITERAL, NULL_LITERAL, TRUE_LITERAL,
};
use crate::writer;

/// The nesting limit used by newly created readers.
pub const DEFAULT_MAX_DEPTH: usize = 20;

/// Classification of the next significant character on the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    BeginArray,
    EndArray,
    BeginObject,
    EndObject,
    /// The `,` between elements or members.
    ValueSeparator,
    /// The `:` between a member name and its value.
    NameSeparator,
    String,
    Number,
    Boolean,
    Null,
    /// The end of the input stream.
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenKind::BeginArray => "begin-array",
            TokenKind::EndArray => "end-array",
            TokenKind::BeginObject => "begin-object",
            TokenKind::EndObject => "end-object",
            TokenKind::ValueSeparator => "value-separator",
            TokenKind::NameSeparator => "name-separator",
            TokenKind::String => "string",
            TokenKind::Number => "number",
            TokenKind::Boolean => "boolean",
            TokenKind::Null => "null",
            TokenKind::Eof => "end of input",
        })
    }
}

/// Structure parse state shared by object and array parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StructState {
    Initial,
    /// A separator was consumed; an element must follow.
    RequireValue,
    /// An element was parsed; a separator or close may follow.
    SeparatorValid,
}

/// A streaming JSON reader over any character iterator.
///
/// ```
/// use jsontext::{JsonReader, TokenKind};
///
/// let mut reader = JsonReader::new("[1, 2]".chars());
/// assert_eq!(reader.next_token()?, TokenKind::BeginArray);
/// let items = reader.parse_array()?;
/// assert_eq!(items.len(), 2);
/// # Ok::<(), jsontext::Error>(())
/// ```
#[derive(Debug)]
pub struct JsonReader<I: Iterator<Item = char>> {
    src: Peekable<I>,
    depth: usize,
    max_depth: usize,
    closed: bool,
}

impl<'a> From<&'a str> for JsonReader<std::str::Chars<'a>> {
    fn from(input: &'a str) -> Self {
        JsonReader::new(input.chars())
    }
}

impl<I: Iterator<Item = char>> JsonReader<I> {
    /// Creates a reader over `src` with the default nesting limit.
    pub fn new(src: I) -> Self {
        Self {
            src: src.peekable(),
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
            closed: false,
        }
    }

    /// The configured nesting limit.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Sets the nesting limit.
    ///
    /// # Panics
    /// If `limit` is zero.
    pub fn set_max_depth(&mut self, limit: usize) {
        assert!(limit > 0, "the nesting limit must be at least 1");
        self.max_depth = limit;
    }

    /// The number of structures currently being parsed.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Closes the reader; idempotent and irreversible. Every subsequent
    /// operation fails with [`Error::Closed`].
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Whether [`close`](JsonReader::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Classifies the next significant token without consuming it.
    ///
    /// Leading whitespace is skipped (and consumed).
    ///
    /// # Errors
    /// [`SyntaxError::UnexpectedCharacter`] if the next character cannot
    /// start any token, or [`Error::Closed`].
    pub fn next_token(&mut self) -> Result<TokenKind, Error> {
        self.ensure_open()?;
        let Some(ch) = self.peek_significant() else {
            return Ok(TokenKind::Eof);
        };
        Ok(match ch {
            writer::BEGIN_ARRAY => TokenKind::BeginArray,
            writer::END_ARRAY => TokenKind::EndArray,
            writer::BEGIN_OBJECT => TokenKind::BeginObject,
            writer::END_OBJECT => TokenKind::EndObject,
            writer::NAME_SEPARATOR => TokenKind::NameSeparator,
            writer::VALUE_SEPARATOR => TokenKind::ValueSeparator,
            '"' => TokenKind::String,
            'n' | 'N' => TokenKind::Null,
            't' | 'T' | 'f' | 'F' => TokenKind::Boolean,
            '.' | '-' | '+' | '0'..='9' => TokenKind::Number,
            other => return Err(SyntaxError::UnexpectedCharacter(other).into()),
        })
    }

    /// Parses the next complete JSON value of any kind.
    ///
    /// # Errors
    /// [`Error::UnexpectedToken`] if the pending token cannot start a value
    /// (a separator, a close, or end of input); otherwise the errors of the
    /// delegated parse routine.
    pub fn parse_next(&mut self) -> Result<JsonValue, Error> {
        let kind = self.next_token()?;
        self.parse_token(kind)
    }

    /// Parses an object and all contained values.
    ///
    /// # Errors
    /// [`Error::UnexpectedToken`] if the next token is not begin-object;
    /// [`SyntaxError`] for malformed members, duplicate keys, or nesting
    /// beyond the limit.
    pub fn parse_object(&mut self) -> Result<JsonObject, Error> {
        self.expect_next(TokenKind::BeginObject, "a begin-object token")?;
        self.enter()?;
        let mut state = StructState::Initial;
        let mut object = JsonObject::new();
        self.advance();
        loop {
            let key = match self.next_token()? {
                TokenKind::String => {
                    if state == StructState::SeparatorValid {
                        return Err(SyntaxError::MalformedObject.into());
                    }
                    let key = self.parse_string_raw()?;
                    if self.next_token()? != TokenKind::NameSeparator {
                        return Err(SyntaxError::MalformedObject.into());
                    }
                    self.advance();
                    key
                }
                TokenKind::ValueSeparator => {
                    if state != StructState::SeparatorValid {
                        return Err(SyntaxError::MalformedObject.into());
                    }
                    self.advance();
                    // Empty members are illegal.
                    state = StructState::RequireValue;
                    continue;
                }
                TokenKind::EndObject => {
                    if state == StructState::RequireValue {
                        return Err(SyntaxError::MalformedObject.into());
                    }
                    self.advance();
                    self.leave();
                    return Ok(object);
                }
                _ => return Err(SyntaxError::MalformedObject.into()),
            };
            match self.next_token()? {
                TokenKind::EndArray
                | TokenKind::EndObject
                | TokenKind::NameSeparator
                | TokenKind::ValueSeparator
                | TokenKind::Eof => return Err(SyntaxError::MalformedObject.into()),
                kind => {
                    let value = self.parse_token(kind)?;
                    if object.contains_key(&key) {
                        return Err(SyntaxError::DuplicateKey(key).into());
                    }
                    object.insert(key, value);
                    state = StructState::SeparatorValid;
                }
            }
        }
    }

    /// Parses an array and all contained values.
    ///
    /// # Errors
    /// [`Error::UnexpectedToken`] if the next token is not begin-array;
    /// [`SyntaxError`] for malformed elements or nesting beyond the limit.
    pub fn parse_array(&mut self) -> Result<JsonArray, Error> {
        self.expect_next(TokenKind::BeginArray, "a begin-array token")?;
        self.enter()?;
        let mut state = StructState::Initial;
        let mut items = JsonArray::new();
        self.advance();
        loop {
            match self.next_token()? {
                TokenKind::EndArray => {
                    if state == StructState::RequireValue {
                        return Err(SyntaxError::MalformedArray.into());
                    }
                    self.advance();
                    self.leave();
                    return Ok(items);
                }
                TokenKind::ValueSeparator => {
                    if state != StructState::SeparatorValid {
                        return Err(SyntaxError::MalformedArray.into());
                    }
                    self.advance();
                    // Empty elements are illegal.
                    state = StructState::RequireValue;
                }
                TokenKind::EndObject | TokenKind::NameSeparator | TokenKind::Eof => {
                    return Err(SyntaxError::MalformedArray.into());
                }
                kind => {
                    if state == StructState::SeparatorValid {
                        return Err(SyntaxError::MalformedArray.into());
                    }
                    items.push(self.parse_token(kind)?);
                    state = StructState::SeparatorValid;
                }
            }
        }
    }

    /// Parses a string scalar.
    ///
    /// # Errors
    /// [`Error::UnexpectedToken`] if the next token is not a string;
    /// [`SyntaxError`] for unterminated text or invalid escapes.
    pub fn parse_string(&mut self) -> Result<JsonString, Error> {
        Ok(JsonString::new(self.parse_string_raw()?))
    }

    /// Parses a number scalar.
    ///
    /// # Errors
    /// [`Error::UnexpectedToken`] if the next token is not a number;
    /// [`SyntaxError::MalformedNumber`] if the captured text is not a finite
    /// double.
    pub fn parse_number(&mut self) -> Result<Number, Error> {
        self.expect_next(TokenKind::Number, "a number token")?;
        let mut text = String::new();
        while let Some(ch) = self.peek() {
            if !is_number_component(ch) {
                break;
            }
            text.push(ch);
            self.advance();
        }
        let value: f64 = text
            .parse()
            .map_err(|_| SyntaxError::MalformedNumber)?;
        Number::new(value).map_err(|_| Error::Syntax(SyntaxError::MalformedNumber))
    }

    /// Parses a boolean literal, case-insensitively.
    ///
    /// # Errors
    /// [`Error::UnexpectedToken`] if the next token is not a boolean;
    /// [`SyntaxError::MalformedBoolean`] otherwise.
    pub fn parse_boolean(&mut self) -> Result<bool, Error> {
        self.expect_next(TokenKind::Boolean, "a boolean token")?;
        let is_false = matches!(self.peek(), Some('f' | 'F'));
        let literal = if is_false { FALSE_LITERAL } else { TRUE_LITERAL };
        if self.match_literal(literal) {
            Ok(!is_false)
        } else {
            Err(SyntaxError::MalformedBoolean.into())
        }
    }

    /// Parses a null literal, case-insensitively.
    ///
    /// # Errors
    /// [`Error::UnexpectedToken`] if the next token is not a null;
    /// [`SyntaxError::MalformedNull`] otherwise.
    pub fn parse_null(&mut self) -> Result<(), Error> {
        self.expect_next(TokenKind::Null, "a null token")?;
        if self.match_literal(NULL_LITERAL) {
            Ok(())
        } else {
            Err(SyntaxError::MalformedNull.into())
        }
    }

    fn parse_token(&mut self, kind: TokenKind) -> Result<JsonValue, Error> {
        match kind {
            TokenKind::BeginArray => Ok(JsonValue::Array(self.parse_array()?)),
            TokenKind::BeginObject => Ok(JsonValue::Object(self.parse_object()?)),
            TokenKind::String => Ok(JsonValue::String(self.parse_string()?)),
            TokenKind::Number => Ok(JsonValue::Number(self.parse_number()?)),
            TokenKind::Boolean => Ok(JsonValue::Bool(self.parse_boolean()?)),
            TokenKind::Null => {
                self.parse_null()?;
                Ok(JsonValue::Null)
            }
            found => Err(Error::UnexpectedToken {
                expected: "a token that starts a value",
                found,
            }),
        }
    }

    fn parse_string_raw(&mut self) -> Result<String, Error> {
        self.expect_next(TokenKind::String, "a string token")?;
        let mut buf = String::new();
        self.advance();
        loop {
            let Some(ch) = self.read() else {
                return Err(SyntaxError::MalformedString.into());
            };
            match ch {
                '"' => return Ok(buf),
                '%' => {
                    // Legacy URL-style escape, accepted on read only.
                    let unit = self.read_percent_escape()?;
                    self.push_code_unit(&mut buf, unit)?;
                }
                '\\' => {
                    let Some(escape) = self.read() else {
                        return Err(SyntaxError::MalformedString.into());
                    };
                    match escape {
                        '"' => buf.push('"'),
                        '/' => buf.push('/'),
                        '\\' => buf.push('\\'),
                        'b' => buf.push('\u{8}'),
                        'f' => buf.push('\u{C}'),
                        'n' => buf.push('\n'),
                        'r' => buf.push('\r'),
                        't' => buf.push('\t'),
                        'u' => {
                            let unit = self.read_hex4()?;
                            self.push_code_unit(&mut buf, unit)?;
                        }
                        _ => return Err(SyntaxError::MalformedString.into()),
                    }
                }
                other => buf.push(other),
            }
        }
    }

    /// Reads the escape following `%`: either `uXXXX` for a code unit or two
    /// hex digits for a byte value.
    fn read_percent_escape(&mut self) -> Result<u16, Error> {
        match self.read() {
            Some('u') => self.read_hex4(),
            Some(high) => {
                let low = self.read().ok_or(SyntaxError::TruncatedEscape)?;
                Ok(u16::from(hex_digit(high)? << 4 | hex_digit(low)?))
            }
            None => Err(SyntaxError::TruncatedEscape.into()),
        }
    }

    fn read_hex4(&mut self) -> Result<u16, Error> {
        let mut unit = 0u16;
        for _ in 0..4 {
            let ch = self.read().ok_or(SyntaxError::TruncatedEscape)?;
            unit = unit << 4 | u16::from(hex_digit(ch)?);
        }
        Ok(unit)
    }

    /// Appends one decoded UTF-16 code unit, pairing surrogates.
    ///
    /// The value model stores Unicode scalar values, so a high surrogate must
    /// be immediately followed by an escaped low surrogate; anything else is
    /// a syntax error.
    fn push_code_unit(&mut self, buf: &mut String, unit: u16) -> Result<(), Error> {
        match unit {
            0xD800..=0xDBFF => {
                let low = self.read_low_surrogate(unit)?;
                let combined =
                    0x10000 + (u32::from(unit - 0xD800) << 10) + u32::from(low - 0xDC00);
                match char::from_u32(combined) {
                    Some(ch) => buf.push(ch),
                    None => return Err(SyntaxError::UnpairedSurrogate(unit).into()),
                }
            }
            0xDC00..=0xDFFF => return Err(SyntaxError::UnpairedSurrogate(unit).into()),
            _ => match char::from_u32(u32::from(unit)) {
                Some(ch) => buf.push(ch),
                // Unreachable: every non-surrogate u16 is a scalar value.
                None => return Err(SyntaxError::UnpairedSurrogate(unit).into()),
            },
        }
        Ok(())
    }

    fn read_low_surrogate(&mut self, high: u16) -> Result<u16, Error> {
        let unit = match (self.read(), self.read()) {
            (Some('\\' | '%'), Some('u')) => self.read_hex4()?,
            _ => return Err(SyntaxError::UnpairedSurrogate(high).into()),
        };
        if (0xDC00..=0xDFFF).contains(&unit) {
            Ok(unit)
        } else {
            Err(SyntaxError::UnpairedSurrogate(unit).into())
        }
    }

    fn match_literal(&mut self, literal: &str) -> bool {
        // Assumes `literal` is lower case.
        literal
            .chars()
            .all(|expected| self.read().is_some_and(|ch| ch.to_ascii_lowercase() == expected))
    }

    fn expect_next(&mut self, expected: TokenKind, description: &'static str) -> Result<(), Error> {
        let found = self.next_token()?;
        if found == expected {
            Ok(())
        } else {
            Err(Error::UnexpectedToken {
                expected: description,
                found,
            })
        }
    }

    fn enter(&mut self) -> Result<(), Error> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(SyntaxError::DepthExceeded(self.max_depth).into());
        }
        Ok(())
    }

    fn leave(&mut self) {
        debug_assert!(self.depth > 0);
        self.depth -= 1;
    }

    /// Skips whitespace, then peeks at the next character.
    fn peek_significant(&mut self) -> Option<char> {
        while let Some(&ch) = self.src.peek() {
            if ch.is_whitespace() {
                self.src.next();
            } else {
                return Some(ch);
            }
        }
        None
    }

    fn peek(&mut self) -> Option<char> {
        self.src.peek().copied()
    }

    fn read(&mut self) -> Option<char> {
        self.src.next()
    }

    fn advance(&mut self) {
        let _ = self.src.next();
    }

    fn ensure_open(&self) -> Result<(), Error> {
        if self.closed {
            Err(Error::Closed)
        } else {
            Ok(())
        }
    }
}

fn is_number_component(ch: char) -> bool {
    ch.is_ascii_digit() || matches!(ch, '-' | '+' | '.' | 'e' | 'E')
}

fn hex_digit(ch: char) -> Result<u8, Error> {
    match ch {
        '0'..='9' => Ok(ch as u8 - b'0'),
        'a'..='f' => Ok(ch as u8 - b'a' + 10),
        'A'..='F' => Ok(ch as u8 - b'A' + 10),
        _ => Err(SyntaxError::InvalidHexDigit(ch).into()),
    }
}
