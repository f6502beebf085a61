//! Scalar values accepted by the cache and their byte encoding.

use crate::error::{CacheError, CacheResult};

/// A value the cache can store.
///
/// Strings are written as UTF-8 and numbers as decimal text, which is how
/// Redis clients put them on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheValue {
    Str(String),
    Bytes(Vec<u8>),
    Int(i64),
    Float(f64),
}

impl CacheValue {
    /// Bytes written to the store.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Str(s) => s.as_bytes().to_vec(),
            Self::Bytes(b) => b.clone(),
            Self::Int(n) => n.to_string().into_bytes(),
            // Debug keeps the fractional part ("3.0") and switches to exponents for large values.
            Self::Float(x) => format!("{x:?}").into_bytes(),
        }
    }

    /// Literal form used when recording call history.
    pub fn repr(&self) -> String {
        match self {
            Self::Str(s) => quote_str(s),
            Self::Bytes(b) => format!("b'{}'", b.escape_ascii()),
            Self::Int(n) => n.to_string(),
            Self::Float(x) => format!("{x:?}"),
        }
    }
}

impl From<&str> for CacheValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for CacheValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&[u8]> for CacheValue {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<Vec<u8>> for CacheValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<i64> for CacheValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for CacheValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for CacheValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Quote `s` as a string literal, leaving printable non-ASCII text alone.
///
/// Single quotes are preferred; double quotes are used when `s` contains `'` but no `"`.
fn quote_str(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                let code = u32::from(c);
                if code <= 0xff {
                    out.push_str(&format!("\\x{code:02x}"));
                } else {
                    out.push_str(&format!("\\u{code:04x}"));
                }
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Decode raw bytes as UTF-8 text.
pub fn decode_str(raw: Vec<u8>) -> CacheResult<String> {
    String::from_utf8(raw).map_err(|e| CacheError::decode("utf-8 string", e))
}

/// Decode raw bytes as a decimal integer.
pub fn decode_int(raw: Vec<u8>) -> CacheResult<i64> {
    let text = std::str::from_utf8(&raw).map_err(|e| CacheError::decode("integer", e))?;
    text.parse().map_err(|e| CacheError::decode("integer", e))
}

/// Decode raw bytes as a float.
pub fn decode_float(raw: Vec<u8>) -> CacheResult<f64> {
    let text = std::str::from_utf8(&raw).map_err(|e| CacheError::decode("float", e))?;
    text.parse().map_err(|e| CacheError::decode("float", e))
}
