//! The recursive free-form value type used by `meta` and by free-form body
//! subfields (`parameters`, `result`).
//!
//! Per the redesign guidance this is a closed set of shapes; a value outside
//! this set is an encode-time error rather than being coerced to a string.

use std::collections::BTreeMap;

/// A free-form wire value.
///
/// `Map` uses `BTreeMap` rather than `HashMap` so that two `Value`s built
/// from the same logical content compare equal regardless of msgpack key
/// order, which the wire format does not guarantee.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bin(Vec<u8>),
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    #[must_use]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// A map value with non-null entries only.
///
/// Per the meta-nullability design note, keys with a nil value are filtered
/// at the decode boundary, so downstream code never needs to re-check for
/// nulls inside a meta map.
pub type MetaMap = BTreeMap<String, Value>;

/// Drop null-valued entries from a decoded map, per the meta-nullability
/// design note ("map with non-null values only").
pub fn filter_nulls(map: BTreeMap<String, Value>) -> MetaMap {
    map.into_iter().filter(|(_, v)| !v.is_nil()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_nulls_drops_nil_entries_only() {
        let mut m = BTreeMap::new();
        m.insert("a".to_owned(), Value::Int(1));
        m.insert("b".to_owned(), Value::Nil);
        m.insert("c".to_owned(), Value::Str("x".to_owned()));
        let filtered = filter_nulls(m);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.contains_key("a"));
        assert!(filtered.contains_key("c"));
        assert!(!filtered.contains_key("b"));
    }
}
