//! The single runtime representation: text.
//!
//! Every minipy value — numbers, strings, booleans, null — is a piece of
//! text. Arithmetic reinterprets *numeric-valid* texts as integers and
//! formats the result back into text.

use crate::error::{MinipyError, Result};

/// A runtime value. Booleans are the texts `true`/`false`, null is `null`,
/// and integers are their decimal rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value(String);

impl Value {
    /// The empty text — the default for uninitialized variables and for
    /// functions that fall off the end without `return`.
    pub fn empty() -> Self {
        Value(String::new())
    }

    pub fn text(&self) -> &str {
        &self.0
    }

    /// Format an integer back into its canonical decimal text.
    pub fn from_int(n: i64) -> Self {
        let mut buf: itoa::Buffer = itoa::Buffer::new();

        Value(buf.format(n).to_owned())
    }

    pub fn from_bool(b: bool) -> Self {
        Value(if b { "true" } else { "false" }.to_owned())
    }

    /// Falsy iff the text is `""`, `"0"`, `"null"`, or `"false"`; everything
    /// else (including `"00"`) is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self.0.as_str(), "" | "0" | "null" | "false")
    }

    /// A text is *numeric-valid* if every character is an ASCII digit or a
    /// minus sign. This loose rule is the contract: interior or repeated
    /// minus signs still count, and the empty text is vacuously numeric.
    pub fn is_numeric(&self) -> bool {
        self.0.bytes().all(|b| b.is_ascii_digit() || b == b'-')
    }

    /// Interpret the text as an integer. Numeric-valid texts that are not
    /// well-formed integers (`"1-2"`, `"--5"`, `""`) fail with a line-tagged
    /// runtime error rather than parsing a prefix.
    pub fn as_int(&self, line: usize) -> Result<i64> {
        self.0.parse::<i64>().map_err(|_| {
            MinipyError::runtime(line, format!("'{}' is not a valid integer.", self.0))
        })
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value(text)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value(text.to_owned())
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
