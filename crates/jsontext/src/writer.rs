//! Grammar-validating JSON writer.
//!
//! [`JsonWriter`] emits JSON tokens to any [`fmt::Write`] sink while a
//! transition table proves, before each character leaves the writer, that the
//! call sequence still produces well-formed output. Element separators are
//! inserted automatically; callers never emit them. Whitespace layout is
//! delegated to a [`Style`], so [`Indented`] output goes through exactly the
//! same grammar machine as [`Compact`] output.

use std::fmt::{self, Write};

use crate::error::Error;
use crate::value::{encode_into, Number, FALSE_LITERAL, NULL_LITERAL, TRUE_LITERAL};

pub(crate) const BEGIN_ARRAY: char = '[';
pub(crate) const END_ARRAY: char = ']';
pub(crate) const BEGIN_OBJECT: char = '{';
pub(crate) const END_OBJECT: char = '}';
pub(crate) const VALUE_SEPARATOR: char = ',';
pub(crate) const NAME_SEPARATOR: char = ':';

/// The token kinds tracked by the writer's grammar machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// Nothing has been written yet.
    None,
    BeginArray,
    EndArray,
    BeginObject,
    EndObject,
    /// An object member name, including its `:` separator.
    Name,
    /// A complete scalar literal.
    Value,
}

impl Token {
    fn is_struct_end(self) -> bool {
        matches!(self, Token::EndArray | Token::EndObject)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Token::None => "nothing",
            Token::BeginArray => "begin-array",
            Token::EndArray => "end-array",
            Token::BeginObject => "begin-object",
            Token::EndObject => "end-object",
            Token::Name => "name",
            Token::Value => "value",
        })
    }
}

/// The structure kinds that can be open on the writer's stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructKind {
    Array,
    Object,
}

impl fmt::Display for StructKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StructKind::Array => "array",
            StructKind::Object => "object",
        })
    }
}

#[derive(Clone, Copy)]
enum Transition {
    /// Always legal.
    Ok,
    /// Never legal.
    Err,
    /// Legal only while the current structure is an object.
    InObject,
    /// Legal only while the current structure is an array.
    InArray,
    /// Legal only while some structure is open.
    InStruct,
}

use Transition::{Err as E, InArray as A, InObject as O, InStruct as S, Ok as K};

/// Indexed by (last token, next token), in [`Token`] declaration order.
const TRANSITIONS: [[Transition; 7]; 7] = [
    [E, K, E, K, E, E, E], // after nothing
    [E, K, A, K, E, E, K], // after begin-array
    [E, S, A, S, O, O, S], // after end-array
    [E, E, E, E, O, K, E], // after begin-object
    [E, S, A, S, O, O, S], // after end-object
    [E, K, E, K, E, E, K], // after name
    [E, K, A, K, O, O, K], // after value
];

/// Decides what whitespace precedes each token.
///
/// Invoked after grammar validation and automatic separator insertion, so a
/// style can never change what tokens are legal, only how they are laid out.
pub trait Style {
    /// Writes the whitespace that should precede `token`.
    ///
    /// `current` is the innermost open structure before `token` takes effect.
    ///
    /// # Errors
    /// Propagates failures from the underlying sink.
    fn before_token<W: Write>(
        &mut self,
        out: &mut W,
        token: Token,
        current: Option<StructKind>,
    ) -> fmt::Result;
}

/// Single-line output without any inter-token whitespace.
#[derive(Debug, Default, Clone, Copy)]
pub struct Compact;

impl Style for Compact {
    fn before_token<W: Write>(
        &mut self,
        _out: &mut W,
        _token: Token,
        _current: Option<StructKind>,
    ) -> fmt::Result {
        Ok(())
    }
}

/// Pretty-printed output.
///
/// Every array element starts on a fresh indented line. Inside an object,
/// names and nested structures start a fresh line while scalar values stay on
/// the name's line after a single space.
#[derive(Debug, Clone)]
pub struct Indented {
    unit: String,
    level: usize,
}

impl Indented {
    /// Creates a style indenting by `unit` per nesting level.
    pub fn new(unit: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            level: 0,
        }
    }

    fn write_indent<W: Write>(&self, out: &mut W) -> fmt::Result {
        for _ in 0..self.level {
            out.write_str(&self.unit)?;
        }
        Ok(())
    }
}

impl Default for Indented {
    fn default() -> Self {
        Self::new("\t")
    }
}

impl Style for Indented {
    fn before_token<W: Write>(
        &mut self,
        out: &mut W,
        token: Token,
        current: Option<StructKind>,
    ) -> fmt::Result {
        match current {
            Some(StructKind::Array) => out.write_char('\n')?,
            // Scalars stay on the member name's line.
            Some(StructKind::Object) if token != Token::Value => out.write_char('\n')?,
            _ => {}
        }
        match token {
            Token::BeginArray | Token::BeginObject => {
                self.write_indent(out)?;
                self.level += 1;
            }
            Token::EndArray | Token::EndObject => {
                debug_assert!(self.level > 0);
                self.level = self.level.saturating_sub(1);
                self.write_indent(out)?;
            }
            Token::Name => self.write_indent(out)?,
            Token::Value => {
                if current == Some(StructKind::Object) {
                    out.write_char(' ')?;
                } else {
                    self.write_indent(out)?;
                }
            }
            Token::None => {}
        }
        Ok(())
    }
}

/// A streaming JSON writer that rejects any call sequence whose output would
/// not be well-formed JSON.
///
/// The writer owns its sink; pass `&mut String` (or any `&mut W`) to keep
/// ownership on the caller's side, or recover an owned sink with
/// [`into_inner`](JsonWriter::into_inner).
///
/// ```
/// use jsontext::JsonWriter;
///
/// let mut out = String::new();
/// let mut writer = JsonWriter::new(&mut out);
/// writer.write_begin_object()?;
/// writer.write_name("id")?;
/// writer.write_value("17")?;
/// writer.write_end_object()?;
/// assert_eq!(out, r#"{"id":17}"#);
/// # Ok::<(), jsontext::Error>(())
/// ```
#[derive(Debug)]
pub struct JsonWriter<W, S = Compact> {
    out: W,
    style: S,
    last: Token,
    stack: Vec<StructKind>,
    closed: bool,
}

impl<W: Write> JsonWriter<W> {
    /// Creates a compact writer over `out`.
    pub fn new(out: W) -> Self {
        Self::styled(out, Compact)
    }
}

impl<W: Write> JsonWriter<W, Indented> {
    /// Creates a pretty-printing writer over `out`, indenting with one tab
    /// per level.
    pub fn indented(out: W) -> Self {
        Self::styled(out, Indented::default())
    }
}

impl<W: Write, S: Style> JsonWriter<W, S> {
    /// Creates a writer over `out` with an explicit layout style.
    pub fn styled(out: W, style: S) -> Self {
        Self {
            out,
            style,
            last: Token::None,
            stack: Vec::new(),
            closed: false,
        }
    }

    /// Writes the start of an array.
    ///
    /// # Errors
    /// [`Error::InvalidWrite`] if an array cannot start here, [`Error::Closed`]
    /// after [`close`](JsonWriter::close), or [`Error::Sink`].
    pub fn write_begin_array(&mut self) -> Result<(), Error> {
        self.write_token(Token::BeginArray, BEGIN_ARRAY)
    }

    /// Writes the end of the innermost array.
    ///
    /// # Errors
    /// See [`write_begin_array`](JsonWriter::write_begin_array).
    pub fn write_end_array(&mut self) -> Result<(), Error> {
        self.write_token(Token::EndArray, END_ARRAY)
    }

    /// Writes the start of an object.
    ///
    /// # Errors
    /// See [`write_begin_array`](JsonWriter::write_begin_array).
    pub fn write_begin_object(&mut self) -> Result<(), Error> {
        self.write_token(Token::BeginObject, BEGIN_OBJECT)
    }

    /// Writes the end of the innermost object.
    ///
    /// # Errors
    /// See [`write_begin_array`](JsonWriter::write_begin_array).
    pub fn write_end_object(&mut self) -> Result<(), Error> {
        self.write_token(Token::EndObject, END_OBJECT)
    }

    /// Writes an object member name (encoded) followed by `:`.
    ///
    /// # Errors
    /// See [`write_begin_array`](JsonWriter::write_begin_array).
    pub fn write_name(&mut self, name: &str) -> Result<(), Error> {
        self.ensure_open()?;
        self.pre_write(Token::Name)?;
        encode_into(&mut self.out, name)?;
        self.out.write_char(NAME_SEPARATOR)?;
        self.post_write(Token::Name);
        Ok(())
    }

    /// Writes a pre-encoded scalar literal verbatim.
    ///
    /// The caller is responsible for `raw` being a single valid JSON scalar
    /// (an encoded string, a number, `true`, `false`, or `null`); the grammar
    /// machine only validates its position.
    ///
    /// # Errors
    /// See [`write_begin_array`](JsonWriter::write_begin_array).
    pub fn write_value(&mut self, raw: &str) -> Result<(), Error> {
        self.ensure_open()?;
        self.pre_write(Token::Value)?;
        self.out.write_str(raw)?;
        self.post_write(Token::Value);
        Ok(())
    }

    /// Encodes `value` and writes it as a string scalar.
    ///
    /// # Errors
    /// See [`write_begin_array`](JsonWriter::write_begin_array).
    pub fn write_string(&mut self, value: &str) -> Result<(), Error> {
        self.ensure_open()?;
        self.pre_write(Token::Value)?;
        encode_into(&mut self.out, value)?;
        self.post_write(Token::Value);
        Ok(())
    }

    /// Writes a number scalar.
    ///
    /// # Errors
    /// See [`write_begin_array`](JsonWriter::write_begin_array).
    pub fn write_number(&mut self, value: Number) -> Result<(), Error> {
        self.ensure_open()?;
        self.pre_write(Token::Value)?;
        write!(self.out, "{value}")?;
        self.post_write(Token::Value);
        Ok(())
    }

    /// Writes a boolean scalar.
    ///
    /// # Errors
    /// See [`write_begin_array`](JsonWriter::write_begin_array).
    pub fn write_bool(&mut self, value: bool) -> Result<(), Error> {
        self.write_value(if value { TRUE_LITERAL } else { FALSE_LITERAL })
    }

    /// Writes a null scalar.
    ///
    /// # Errors
    /// See [`write_begin_array`](JsonWriter::write_begin_array).
    pub fn write_null(&mut self) -> Result<(), Error> {
        self.write_value(NULL_LITERAL)
    }

    /// The innermost open structure, if any.
    pub fn current_struct(&self) -> Option<StructKind> {
        self.stack.last().copied()
    }

    /// The number of currently open structures.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Closes the writer; idempotent and irreversible. Every subsequent write
    /// fails with [`Error::Closed`].
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Whether [`close`](JsonWriter::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Consumes the writer and returns the underlying sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_token(&mut self, token: Token, ch: char) -> Result<(), Error> {
        self.ensure_open()?;
        self.pre_write(token)?;
        self.out.write_char(ch)?;
        self.post_write(token);
        Ok(())
    }

    fn pre_write(&mut self, token: Token) -> Result<(), Error> {
        let current = self.current_struct();
        match TRANSITIONS[self.last as usize][token as usize] {
            Transition::Ok => {}
            Transition::Err => return Err(self.invalid(token)),
            Transition::InObject => self.check(current == Some(StructKind::Object), token)?,
            Transition::InArray => self.check(current == Some(StructKind::Array), token)?,
            Transition::InStruct => self.check(current.is_some(), token)?,
        }
        // Strict name/value pairing inside objects, which the table alone
        // cannot express.
        self.check(
            !(current == Some(StructKind::Object)
                && token != Token::EndObject
                && token != Token::Name
                && self.last != Token::Name),
            token,
        )?;
        if !token.is_struct_end() && (self.last.is_struct_end() || self.last == Token::Value) {
            self.out.write_char(VALUE_SEPARATOR)?;
        }
        self.style.before_token(&mut self.out, token, current)?;
        Ok(())
    }

    fn post_write(&mut self, token: Token) {
        self.last = token;
        match token {
            Token::BeginArray => self.stack.push(StructKind::Array),
            Token::BeginObject => self.stack.push(StructKind::Object),
            Token::EndArray => {
                debug_assert_eq!(self.stack.last(), Some(&StructKind::Array));
                self.stack.pop();
            }
            Token::EndObject => {
                debug_assert_eq!(self.stack.last(), Some(&StructKind::Object));
                self.stack.pop();
            }
            Token::None | Token::Name | Token::Value => {}
        }
    }

    fn check(&self, condition: bool, attempted: Token) -> Result<(), Error> {
        if condition {
            Ok(())
        } else {
            Err(self.invalid(attempted))
        }
    }

    fn invalid(&self, attempted: Token) -> Error {
        Error::InvalidWrite {
            last: self.last,
            attempted,
            current: self.current_struct(),
        }
    }

    fn ensure_open(&self) -> Result<(), Error> {
        if self.closed {
            Err(Error::Closed)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::{Indented, JsonWriter, StructKind, Token};
    use crate::error::Error;

    fn compact() -> JsonWriter<String> {
        JsonWriter::new(String::new())
    }

    #[test]
    fn empty_structures() {
        let mut writer = compact();
        writer.write_begin_object().unwrap();
        writer.write_end_object().unwrap();
        assert_eq!(writer.into_inner(), "{}");

        let mut writer = compact();
        writer.write_begin_array().unwrap();
        writer.write_end_array().unwrap();
        assert_eq!(writer.into_inner(), "[]");
    }

    #[test]
    fn separators_are_inserted_automatically() {
        let mut writer = compact();
        writer.write_begin_array().unwrap();
        writer.write_value("1").unwrap();
        writer.write_value("2").unwrap();
        writer.write_value("3").unwrap();
        writer.write_end_array().unwrap();
        assert_eq!(writer.into_inner(), "[1,2,3]");
    }

    #[test]
    fn nested_structures() {
        let mut writer = compact();
        writer.write_begin_object().unwrap();
        writer.write_name("a").unwrap();
        writer.write_value("1").unwrap();
        writer.write_name("b").unwrap();
        writer.write_begin_array().unwrap();
        writer.write_bool(true).unwrap();
        writer.write_null().unwrap();
        writer.write_end_array().unwrap();
        writer.write_end_object().unwrap();
        assert_eq!(writer.into_inner(), r#"{"a":1,"b":[true,null]}"#);
    }

    #[test]
    fn names_are_encoded() {
        let mut writer = compact();
        writer.write_begin_object().unwrap();
        writer.write_name("a\"b").unwrap();
        writer.write_string("x\ny").unwrap();
        writer.write_end_object().unwrap();
        assert_eq!(writer.into_inner(), "{\"a\\\"b\":\"x\\ny\"}");
    }

    #[test]
    fn top_level_scalar_is_rejected() {
        let mut writer = compact();
        let error = writer.write_value("1").unwrap_err();
        assert_eq!(
            error,
            Error::InvalidWrite {
                last: Token::None,
                attempted: Token::Value,
                current: None,
            }
        );
    }

    #[test]
    fn name_outside_object_is_rejected() {
        let mut writer = compact();
        writer.write_begin_array().unwrap();
        assert!(matches!(
            writer.write_name("a"),
            Err(Error::InvalidWrite {
                attempted: Token::Name,
                ..
            })
        ));
    }

    #[test]
    fn value_without_name_inside_object_is_rejected() {
        let mut writer = compact();
        writer.write_begin_object().unwrap();
        assert!(matches!(
            writer.write_value("1"),
            Err(Error::InvalidWrite { .. })
        ));
    }

    #[test]
    fn consecutive_names_are_rejected() {
        let mut writer = compact();
        writer.write_begin_object().unwrap();
        writer.write_name("a").unwrap();
        assert!(matches!(
            writer.write_name("b"),
            Err(Error::InvalidWrite { .. })
        ));
    }

    #[test]
    fn mismatched_close_is_rejected() {
        let mut writer = compact();
        writer.write_begin_object().unwrap();
        let error = writer.write_end_array().unwrap_err();
        assert_eq!(
            error,
            Error::InvalidWrite {
                last: Token::BeginObject,
                attempted: Token::EndArray,
                current: Some(StructKind::Object),
            }
        );
    }

    #[test]
    fn nothing_may_follow_a_complete_document() {
        let mut writer = compact();
        writer.write_begin_array().unwrap();
        writer.write_end_array().unwrap();
        assert!(matches!(
            writer.write_value("1"),
            Err(Error::InvalidWrite { .. })
        ));
    }

    #[test]
    fn failed_write_emits_nothing() {
        let mut writer = compact();
        writer.write_begin_object().unwrap();
        writer.write_value("1").unwrap_err();
        assert_eq!(writer.into_inner(), "{");
    }

    #[test]
    fn closed_writer_fails_fast() {
        let mut writer = compact();
        writer.close();
        writer.close();
        assert_eq!(writer.write_begin_array(), Err(Error::Closed));
        assert!(writer.is_closed());
    }

    #[test]
    fn indented_array_layout() {
        let mut writer = JsonWriter::indented(String::new());
        writer.write_begin_array().unwrap();
        writer.write_value("1").unwrap();
        writer.write_begin_object().unwrap();
        writer.write_name("a").unwrap();
        writer.write_bool(true).unwrap();
        writer.write_end_object().unwrap();
        writer.write_end_array().unwrap();
        assert_eq!(
            writer.into_inner(),
            "[\n\t1,\n\t{\n\t\t\"a\": true\n\t}\n]"
        );
    }

    #[test_case("  ", "[\n  1\n]"; "two spaces")]
    #[test_case("", "[\n1\n]"; "empty unit")]
    fn indent_unit_is_configurable(unit: &str, expected: &str) {
        let mut writer = JsonWriter::styled(String::new(), Indented::new(unit));
        writer.write_begin_array().unwrap();
        writer.write_value("1").unwrap();
        writer.write_end_array().unwrap();
        assert_eq!(writer.into_inner(), expected);
    }

    #[test]
    fn indented_scalars_in_objects_stay_inline() {
        let mut writer = JsonWriter::indented(String::new());
        writer.write_begin_object().unwrap();
        writer.write_name("a").unwrap();
        writer.write_value("1").unwrap();
        writer.write_name("b").unwrap();
        writer.write_value("2").unwrap();
        writer.write_end_object().unwrap();
        assert_eq!(
            writer.into_inner(),
            "{\n\t\"a\": 1,\n\t\"b\": 2\n}"
        );
    }

    #[test]
    fn writer_over_borrowed_sink() {
        let mut out = String::new();
        let mut writer = JsonWriter::new(&mut out);
        writer.write_begin_array().unwrap();
        writer.write_end_array().unwrap();
        drop(writer);
        assert_eq!(out, "[]");
    }
}
