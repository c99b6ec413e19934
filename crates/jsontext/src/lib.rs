//! # jsontext
//!
//! A validating streaming JSON text codec: a value model, a grammar-checking
//! writer, and a recursive-descent reader over character streams.
//!
//! The writer proves, call by call, that its output is well-formed JSON; the
//! reader accepts exactly the JSON grammar (plus case-insensitive literals
//! and legacy `%XX` / `%uXXXX` string escapes on read) and decodes into
//! [`JsonValue`] trees. Both are usable in a streaming fashion without
//! materializing a tree.
//!
//! ```
//! use jsontext::{parse, JsonValue, JsonWriter};
//!
//! let value = parse(r#"{"name": "demo", "tags": [1, 2]}"#)?;
//! assert_eq!(value.get("name").and_then(JsonValue::as_str), Some("demo"));
//!
//! let mut writer = JsonWriter::new(String::new());
//! writer.write_begin_array()?;
//! writer.write_string("demo")?;
//! writer.write_end_array()?;
//! assert_eq!(writer.into_inner(), r#"["demo"]"#);
//! # Ok::<(), jsontext::Error>(())
//! ```

mod error;
mod reader;
mod value;
mod writer;

pub use error::{Error, SyntaxError};
pub use reader::{JsonReader, TokenKind, DEFAULT_MAX_DEPTH};
pub use value::{JsonArray, JsonObject, JsonString, JsonValue, Kind, Number};
pub use writer::{Compact, Indented, JsonWriter, StructKind, Style, Token};

/// Parses `input` as a single complete JSON document.
///
/// Unlike a streaming [`JsonReader`], this rejects any non-whitespace input
/// after the first value.
///
/// # Errors
/// [`Error::Syntax`] for malformed input, including
/// [`SyntaxError::TrailingCharacters`] for text after the document;
/// [`Error::UnexpectedToken`] if the input starts with a token that cannot
/// start a value.
pub fn parse(input: &str) -> Result<JsonValue, Error> {
    let mut reader = JsonReader::new(input.chars());
    let value = reader.parse_next()?;
    match reader.next_token() {
        Ok(TokenKind::Eof) => Ok(value),
        Ok(_) | Err(_) => Err(Error::Syntax(SyntaxError::TrailingCharacters)),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse, Error, SyntaxError};

    #[test]
    fn parse_accepts_surrounding_whitespace() {
        assert!(parse(" {\"a\": 1}\n").is_ok());
    }

    #[test]
    fn parse_accepts_top_level_scalars() {
        assert_eq!(parse("TRUE").unwrap().as_bool(), Some(true));
        assert!(parse(" null ").unwrap().is_null());
    }

    #[test]
    fn parse_rejects_trailing_input() {
        assert_eq!(
            parse("{} x"),
            Err(Error::Syntax(SyntaxError::TrailingCharacters))
        );
        assert_eq!(
            parse("[1] [2]"),
            Err(Error::Syntax(SyntaxError::TrailingCharacters))
        );
    }

    #[test]
    fn parse_rejects_empty_input() {
        assert!(matches!(parse(""), Err(Error::UnexpectedToken { .. })));
    }
}
