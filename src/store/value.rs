//! Store Value Module
//!
//! The kinds of value the cache facade accepts.

use std::fmt;

// == Store Value ==
/// A value accepted by [`crate::cache::Cache::store`].
#[derive(Debug, Clone, PartialEq)]
pub enum StoreValue {
    /// UTF-8 text
    Text(String),
    /// Opaque binary blob
    Bytes(Vec<u8>),
    /// Signed integer
    Int(i64),
    /// Floating point number
    Float(f64),
}

impl StoreValue {
    // == Native Representation ==
    /// Returns the bytes written to the store.
    ///
    /// Numbers are stored as their decimal text so the store can read them
    /// back (and `INCR` them) the same way it would a client-written number.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            StoreValue::Text(text) => text.as_bytes().to_vec(),
            StoreValue::Bytes(bytes) => bytes.clone(),
            StoreValue::Int(n) => n.to_string().into_bytes(),
            StoreValue::Float(f) => format!("{:?}", f).into_bytes(),
        }
    }
}

// == Display ==
/// Literal-style rendering used in call history: quoted text, `b"..."` for
/// blobs, bare numbers.
impl fmt::Display for StoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreValue::Text(text) => write!(f, "{:?}", text),
            StoreValue::Bytes(bytes) => write!(f, "b\"{}\"", bytes.escape_ascii()),
            StoreValue::Int(n) => write!(f, "{}", n),
            StoreValue::Float(x) => write!(f, "{:?}", x),
        }
    }
}

// == Conversions ==
impl From<&str> for StoreValue {
    fn from(value: &str) -> Self {
        StoreValue::Text(value.to_string())
    }
}

impl From<String> for StoreValue {
    fn from(value: String) -> Self {
        StoreValue::Text(value)
    }
}

impl From<&[u8]> for StoreValue {
    fn from(value: &[u8]) -> Self {
        StoreValue::Bytes(value.to_vec())
    }
}

impl From<Vec<u8>> for StoreValue {
    fn from(value: Vec<u8>) -> Self {
        StoreValue::Bytes(value)
    }
}

impl From<i64> for StoreValue {
    fn from(value: i64) -> Self {
        StoreValue::Int(value)
    }
}

impl From<i32> for StoreValue {
    fn from(value: i32) -> Self {
        StoreValue::Int(i64::from(value))
    }
}

impl From<f64> for StoreValue {
    fn from(value: f64) -> Self {
        StoreValue::Float(value)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_bytes() {
        assert_eq!(StoreValue::from("foo").to_bytes(), b"foo".to_vec());
        assert_eq!(StoreValue::from(vec![0u8, 255]).to_bytes(), vec![0u8, 255]);
        assert_eq!(StoreValue::from(42).to_bytes(), b"42".to_vec());
        assert_eq!(StoreValue::from(-7i64).to_bytes(), b"-7".to_vec());
        assert_eq!(StoreValue::from(1.5).to_bytes(), b"1.5".to_vec());
        assert_eq!(StoreValue::from(2.0).to_bytes(), b"2.0".to_vec());
    }

    #[test]
    fn test_display_rendering() {
        assert_eq!(StoreValue::from("foo").to_string(), "\"foo\"");
        assert_eq!(StoreValue::from("say \"hi\"").to_string(), "\"say \\\"hi\\\"\"");
        assert_eq!(StoreValue::from(&b"a\x00"[..]).to_string(), "b\"a\\x00\"");
        assert_eq!(StoreValue::from(42).to_string(), "42");
        assert_eq!(StoreValue::from(0.25).to_string(), "0.25");
    }
}
