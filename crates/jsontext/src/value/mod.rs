//! The JSON value model.

mod number;
mod object;
mod string;

use std::fmt::{self, Write};
use std::str::FromStr;

pub use number::Number;
pub use object::JsonObject;
pub use string::JsonString;

pub(crate) use string::encode_into;

use crate::error::Error;
use crate::writer::{JsonWriter, Style};

/// An ordered JSON array.
pub type JsonArray = Vec<JsonValue>;

pub(crate) const TRUE_LITERAL: &str = "true";
pub(crate) const FALSE_LITERAL: &str = "false";
pub(crate) const NULL_LITERAL: &str = "null";

/// A JSON value: exactly one of the JSON kinds, fixed at construction.
///
/// Scalars are immutable; containers hold further `JsonValue`s and may be
/// mutated through [`as_array_mut`](JsonValue::as_array_mut) /
/// [`as_object_mut`](JsonValue::as_object_mut). Absence is expressed with
/// [`JsonValue::Null`], never with an out-of-band sentinel.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum JsonValue {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(JsonString),
    Array(JsonArray),
    Object(JsonObject),
}

/// The type tag of a [`JsonValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl JsonValue {
    /// The kind of this value.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            JsonValue::Null => Kind::Null,
            JsonValue::Bool(_) => Kind::Boolean,
            JsonValue::Number(_) => Kind::Number,
            JsonValue::String(_) => Kind::String,
            JsonValue::Array(_) => Kind::Array,
            JsonValue::Object(_) => Kind::Object,
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            JsonValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_number(&self) -> Option<Number> {
        match self {
            JsonValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().map(Number::get)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&JsonArray> {
        match self {
            JsonValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut JsonArray> {
        match self {
            JsonValue::Array(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&JsonObject> {
        match self {
            JsonValue::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut JsonObject> {
        match self {
            JsonValue::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Looks up an object member; `None` for other kinds or missing keys.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.as_object()?.get(key)
    }

    /// Looks up an array element; `None` for other kinds or out of range.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&JsonValue> {
        self.as_array()?.get(index)
    }

    /// Walks this value and issues the corresponding writer calls.
    ///
    /// Scalars pass their already-encoded text; containers recurse in order.
    ///
    /// # Errors
    /// Propagates writer errors, including the grammar rejection of a scalar
    /// at the top level.
    pub fn write<W: Write, S: Style>(&self, writer: &mut JsonWriter<W, S>) -> Result<(), Error> {
        match self {
            JsonValue::Null => writer.write_value(NULL_LITERAL),
            JsonValue::Bool(value) => {
                writer.write_value(if *value { TRUE_LITERAL } else { FALSE_LITERAL })
            }
            JsonValue::Number(value) => writer.write_value(&value.to_string()),
            JsonValue::String(value) => writer.write_value(value.encoded()),
            JsonValue::Array(items) => {
                writer.write_begin_array()?;
                for item in items {
                    item.write(writer)?;
                }
                writer.write_end_array()
            }
            JsonValue::Object(object) => {
                writer.write_begin_object()?;
                for (key, value) in object.iter() {
                    writer.write_name(key)?;
                    value.write(writer)?;
                }
                writer.write_end_object()
            }
        }
    }

    /// Renders this value as compact JSON text.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Renders this value as pretty-printed JSON text, indented with tabs.
    #[must_use]
    pub fn to_text_pretty(&self) -> String {
        if !matches!(self, JsonValue::Array(_) | JsonValue::Object(_)) {
            // Scalars have no layout to speak of.
            return self.to_string();
        }
        let mut out = String::new();
        let mut writer = JsonWriter::indented(&mut out);
        self.write(&mut writer)
            .expect("a value tree always produces a legal write sequence");
        out
    }
}

/// Renders compact JSON text.
impl fmt::Display for JsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonValue::Null => f.write_str(NULL_LITERAL),
            JsonValue::Bool(value) => {
                f.write_str(if *value { TRUE_LITERAL } else { FALSE_LITERAL })
            }
            JsonValue::Number(value) => write!(f, "{value}"),
            JsonValue::String(value) => f.write_str(value.encoded()),
            JsonValue::Array(_) | JsonValue::Object(_) => {
                let mut writer = JsonWriter::new(&mut *f);
                self.write(&mut writer).map_err(|_| fmt::Error)
            }
        }
    }
}

impl FromStr for JsonValue {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Error> {
        crate::parse(input)
    }
}

impl From<bool> for JsonValue {
    fn from(value: bool) -> Self {
        JsonValue::Bool(value)
    }
}

impl From<Number> for JsonValue {
    fn from(value: Number) -> Self {
        JsonValue::Number(value)
    }
}

impl From<JsonString> for JsonValue {
    fn from(value: JsonString) -> Self {
        JsonValue::String(value)
    }
}

impl From<&str> for JsonValue {
    fn from(value: &str) -> Self {
        JsonValue::String(JsonString::new(value))
    }
}

impl From<String> for JsonValue {
    fn from(value: String) -> Self {
        JsonValue::String(JsonString::new(value))
    }
}

impl From<JsonArray> for JsonValue {
    fn from(items: JsonArray) -> Self {
        JsonValue::Array(items)
    }
}

impl From<JsonObject> for JsonValue {
    fn from(object: JsonObject) -> Self {
        JsonValue::Object(object)
    }
}

macro_rules! impl_value_from_integer {
    ($($int:ty),*) => {$(
        impl From<$int> for JsonValue {
            fn from(value: $int) -> Self {
                JsonValue::Number(Number::from(value))
            }
        }
    )*};
}

impl_value_from_integer!(u8, u16, u32, u64, i8, i16, i32, i64);

impl TryFrom<f64> for JsonValue {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self, Error> {
        Ok(JsonValue::Number(Number::try_from(value)?))
    }
}

impl TryFrom<f32> for JsonValue {
    type Error = Error;

    fn try_from(value: f32) -> Result<Self, Error> {
        Ok(JsonValue::Number(Number::try_from(value)?))
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::{JsonObject, JsonValue, Kind};

    fn sample_object() -> JsonValue {
        let mut object = JsonObject::new();
        object.insert("name", JsonValue::from("demo"));
        object.insert(
            "tags",
            JsonValue::Array(vec![JsonValue::from(1u8), JsonValue::from(2u8)]),
        );
        object.insert("extra", JsonValue::Null);
        JsonValue::Object(object)
    }

    #[test_case(JsonValue::Null, Kind::Null)]
    #[test_case(JsonValue::Bool(true), Kind::Boolean)]
    #[test_case(JsonValue::from(1u8), Kind::Number)]
    #[test_case(JsonValue::from("x"), Kind::String)]
    #[test_case(JsonValue::Array(Vec::new()), Kind::Array)]
    #[test_case(JsonValue::Object(JsonObject::new()), Kind::Object)]
    fn kinds(value: JsonValue, expected: Kind) {
        assert_eq!(value.kind(), expected);
    }

    #[test]
    fn accessors() {
        let value = sample_object();
        assert_eq!(value.get("name").and_then(JsonValue::as_str), Some("demo"));
        assert!(value.get("extra").is_some_and(JsonValue::is_null));
        let tags = value.get("tags").unwrap();
        assert_eq!(tags.get_index(1).and_then(JsonValue::as_f64), Some(2.0));
        assert_eq!(tags.get_index(7), None);
        assert_eq!(value.as_bool(), None);
    }

    #[test]
    fn display_renders_compact_text() {
        assert_eq!(
            sample_object().to_text(),
            r#"{"name":"demo","tags":[1,2],"extra":null}"#
        );
        assert_eq!(JsonValue::Null.to_text(), "null");
        assert_eq!(JsonValue::from("a\"b").to_text(), "\"a\\\"b\"");
    }

    #[test]
    fn pretty_text_layout() {
        let mut object = JsonObject::new();
        object.insert(
            "a",
            JsonValue::Array(vec![JsonValue::from(1u8), JsonValue::from(2u8)]),
        );
        let value = JsonValue::Object(object);
        assert_eq!(
            value.to_text_pretty(),
            "{\n\t\"a\":\n\t[\n\t\t1,\n\t\t2\n\t]\n}"
        );
    }

    #[test]
    fn pretty_text_for_scalars_matches_compact() {
        assert_eq!(JsonValue::Bool(false).to_text_pretty(), "false");
    }

    #[test]
    fn null_values_are_interchangeable() {
        assert_eq!(JsonValue::Null, JsonValue::default());
        assert_eq!(JsonValue::Null, JsonValue::Null);
    }

    #[test]
    fn from_str_round_trips() {
        let value = sample_object();
        let reparsed: JsonValue = value.to_text().parse().unwrap();
        assert_eq!(reparsed, value);
    }
}
