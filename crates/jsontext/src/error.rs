use std::fmt;

use crate::reader::TokenKind;
use crate::writer::{StructKind, Token};

/// Errors reported by the reader, the writer, and value construction.
///
/// The variants fall into three groups: [`Error::Syntax`] means the input
/// text is not valid JSON; [`Error::InvalidWrite`], [`Error::UnexpectedToken`]
/// and [`Error::NonFinite`] mean a caller violated an operation's
/// precondition; [`Error::Closed`] means the session was used after
/// [`close`](crate::JsonReader::close).
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The input text violates the JSON grammar.
    Syntax(SyntaxError),
    /// A write call whose output would not be well-formed JSON.
    InvalidWrite {
        /// The most recently written token.
        last: Token,
        /// The token the caller attempted to write.
        attempted: Token,
        /// The innermost open structure, if any.
        current: Option<StructKind>,
    },
    /// A parse routine was invoked while a different token kind is pending.
    UnexpectedToken {
        /// What the invoked routine requires next.
        expected: &'static str,
        /// The token actually pending on the stream.
        found: TokenKind,
    },
    /// A number was constructed from an infinite or NaN value.
    NonFinite(f64),
    /// The session has been closed; no further operations are possible.
    Closed,
    /// The underlying character sink reported a failure.
    Sink(fmt::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Syntax(error) => error.fmt(f),
            Error::InvalidWrite {
                last,
                attempted,
                current,
            } => {
                write!(f, "cannot write {attempted} after {last} ")?;
                match current {
                    Some(kind) => write!(f, "inside an open {kind}"),
                    None => f.write_str("outside any open structure"),
                }
            }
            Error::UnexpectedToken { expected, found } => {
                write!(f, "expected {expected}, but the next token is {found}")
            }
            Error::NonFinite(value) => {
                write!(f, "JSON numbers must be finite, got {value}")
            }
            Error::Closed => f.write_str("the session has been closed"),
            Error::Sink(_) => f.write_str("the underlying character sink failed"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Sink(error) => Some(error),
            _ => None,
        }
    }
}

impl From<fmt::Error> for Error {
    fn from(error: fmt::Error) -> Self {
        Error::Sink(error)
    }
}

impl From<SyntaxError> for Error {
    fn from(error: SyntaxError) -> Self {
        Error::Syntax(error)
    }
}

/// Ways in which input text can fail to conform to the JSON grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// A character that cannot start any token.
    UnexpectedCharacter(char),
    /// A structurally invalid object (bad key, separator, or close).
    MalformedObject,
    /// A structurally invalid array (bad separator or close).
    MalformedArray,
    /// An unterminated string or an unknown escape.
    MalformedString,
    /// Number text that does not parse to a finite double.
    MalformedNumber,
    /// A literal that is neither `true` nor `false`.
    MalformedBoolean,
    /// A literal that is not `null`.
    MalformedNull,
    /// A non-hexadecimal digit inside a character escape.
    InvalidHexDigit(char),
    /// A character escape cut short by end of input.
    TruncatedEscape,
    /// A surrogate code unit without its counterpart.
    UnpairedSurrogate(u16),
    /// An object key that was already present.
    DuplicateKey(String),
    /// Nesting beyond the configured maximum depth.
    DepthExceeded(usize),
    /// Non-whitespace input after the end of the document.
    TrailingCharacters,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxError::UnexpectedCharacter(ch) => {
                write!(f, "character {ch:?} does not start any valid JSON token")
            }
            SyntaxError::MalformedObject => f.write_str("malformed JSON object"),
            SyntaxError::MalformedArray => f.write_str("malformed JSON array"),
            SyntaxError::MalformedString => f.write_str("malformed JSON string"),
            SyntaxError::MalformedNumber => f.write_str("malformed JSON number"),
            SyntaxError::MalformedBoolean => f.write_str("malformed JSON boolean literal"),
            SyntaxError::MalformedNull => f.write_str("malformed JSON null literal"),
            SyntaxError::InvalidHexDigit(ch) => {
                write!(f, "invalid hexadecimal digit {ch:?} in character escape")
            }
            SyntaxError::TruncatedEscape => {
                f.write_str("character escape is truncated by end of input")
            }
            SyntaxError::UnpairedSurrogate(unit) => {
                write!(f, "unpaired surrogate \\u{unit:04X} in string escape")
            }
            SyntaxError::DuplicateKey(key) => write!(f, "duplicate object key {key:?}"),
            SyntaxError::DepthExceeded(limit) => {
                write!(f, "maximum nesting depth of {limit} exceeded")
            }
            SyntaxError::TrailingCharacters => {
                f.write_str("unexpected characters after the end of the document")
            }
        }
    }
}
