use std::fmt::{self, Write};
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

/// An immutable JSON string.
///
/// Keeps the raw value and, once requested, a cached copy of its encoded
/// (escaped, quoted) wire form. Equality, ordering, and hashing look only at
/// the raw value.
#[derive(Debug, Default)]
pub struct JsonString {
    value: Box<str>,
    encoded: OnceLock<Box<str>>,
}

impl JsonString {
    pub fn new(value: impl Into<Box<str>>) -> Self {
        Self {
            value: value.into(),
            encoded: OnceLock::new(),
        }
    }

    /// The raw, un-encoded value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// The quoted, escaped wire form; computed on first use and cached.
    pub fn encoded(&self) -> &str {
        self.encoded
            .get_or_init(|| encode(&self.value).into_boxed_str())
    }
}

impl Clone for JsonString {
    fn clone(&self) -> Self {
        // The encoding cache is cheap to rebuild; don't copy it.
        Self::new(self.value.clone())
    }
}

impl PartialEq for JsonString {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for JsonString {}

impl PartialEq<str> for JsonString {
    fn eq(&self, other: &str) -> bool {
        &*self.value == other
    }
}

impl PartialEq<&str> for JsonString {
    fn eq(&self, other: &&str) -> bool {
        &*self.value == *other
    }
}

impl Hash for JsonString {
    fn hash<H: Hasher>(&self, h: &mut H) {
        self.value.hash(h);
    }
}

impl AsRef<str> for JsonString {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl From<&str> for JsonString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for JsonString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Displays the raw value, not the encoded form.
impl fmt::Display for JsonString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

fn needs_escaping(s: &str) -> bool {
    s.chars()
        .any(|ch| ch > '\u{7F}' || ch.is_control() || matches!(ch, '"' | '\\' | '/'))
}

/// Writes the encoded form of `s` into `out`.
///
/// Strings without any character requiring an escape are quoted verbatim.
/// Otherwise each character is escaped individually; everything outside
/// printable ASCII becomes `\uXXXX` escapes, one per UTF-16 code unit, so
/// astral characters are written as a surrogate pair of escapes.
pub(crate) fn encode_into<W: Write>(out: &mut W, s: &str) -> fmt::Result {
    out.write_char('"')?;
    if needs_escaping(s) {
        for ch in s.chars() {
            match ch {
                '"' => out.write_str("\\\"")?,
                '/' => out.write_str("\\/")?,
                '\\' => out.write_str("\\\\")?,
                '\u{8}' => out.write_str("\\b")?,
                '\u{C}' => out.write_str("\\f")?,
                '\n' => out.write_str("\\n")?,
                '\r' => out.write_str("\\r")?,
                '\t' => out.write_str("\\t")?,
                ch if ch > '\u{7F}' || ch.is_control() => {
                    let mut units = [0u16; 2];
                    for unit in ch.encode_utf16(&mut units).iter() {
                        write!(out, "\\u{unit:04X}")?;
                    }
                }
                ch => out.write_char(ch)?,
            }
        }
    } else {
        out.write_str(s)?;
    }
    out.write_char('"')
}

/// The encoded form of `s` as an owned string.
pub(crate) fn encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    // Writing into a String cannot fail.
    let _ = encode_into(&mut out, s);
    out
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::{encode, JsonString};

    #[test_case("", "\"\""; "empty")]
    #[test_case("plain ascii", "\"plain ascii\""; "no escapes")]
    #[test_case("a\"b", "\"a\\\"b\""; "quote")]
    #[test_case("a\\b", "\"a\\\\b\""; "backslash")]
    #[test_case("a/b", "\"a\\/b\""; "solidus")]
    #[test_case("line\nbreak", "\"line\\nbreak\""; "newline")]
    #[test_case("tab\there", "\"tab\\there\""; "tab")]
    #[test_case("\u{8}\u{C}\r", "\"\\b\\f\\r\""; "named controls")]
    #[test_case("\u{1}", "\"\\u0001\""; "unnamed control")]
    #[test_case("€", "\"\\u20AC\""; "non ascii")]
    #[test_case("😀", "\"\\uD83D\\uDE00\""; "astral as surrogate pair")]
    fn encoding(raw: &str, expected: &str) {
        assert_eq!(encode(raw), expected);
    }

    #[test]
    fn encoded_form_is_cached() {
        let value = JsonString::new("a\"b");
        let first = value.encoded() as *const str;
        let second = value.encoded() as *const str;
        assert_eq!(first, second);
        assert_eq!(value.encoded(), "\"a\\\"b\"");
        assert_eq!(value.as_str(), "a\"b");
    }

    #[test]
    fn equality_ignores_the_cache() {
        let cached = JsonString::new("x");
        let _ = cached.encoded();
        assert_eq!(cached, JsonString::new("x"));
        assert_eq!(cached, "x");
    }
}
