//! In-memory bencode value tree

use std::fmt;

use bytes::Bytes;

/// Decoded bencode value.
///
/// Closed set of the four bencode types. Byte strings are raw bytes and
/// carry no text interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Bytes(Bytes),
    Integer(i64),
    List(Vec<Value>),
    Dictionary(Dictionary),
}

/// Discriminant of a [`Value`] used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bytes,
    Integer,
    List,
    Dictionary,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Bytes => write!(f, "byte string"),
            ValueKind::Integer => write!(f, "integer"),
            ValueKind::List => write!(f, "list"),
            ValueKind::Dictionary => write!(f, "dictionary"),
        }
    }
}

impl Value {
    /// Returns the variant tag of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bytes(_) => ValueKind::Bytes,
            Value::Integer(_) => ValueKind::Integer,
            Value::List(_) => ValueKind::List,
            Value::Dictionary(_) => ValueKind::Dictionary,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Returns the byte string as text if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes()
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dictionary> {
        match self {
            Value::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Bytes(Bytes::copy_from_slice(value.as_bytes()))
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Bytes(Bytes::copy_from_slice(value))
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(Bytes::from(value))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Dictionary> for Value {
    fn from(dict: Dictionary) -> Self {
        Value::Dictionary(dict)
    }
}

/// Bencode dictionary preserving entries exactly as decoded.
///
/// Entries keep document order and duplicates are retained. Lookups return
/// the last entry for a key. Sorting happens only when encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    entries: Vec<(Bytes, Value)>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry without checking for an existing key.
    pub fn push(&mut self, key: impl Into<Bytes>, value: Value) {
        self.entries.push((key.into(), value));
    }

    /// Sets `key` to `value`, replacing the last existing entry for that key.
    pub fn insert(&mut self, key: impl Into<Bytes>, value: Value) {
        let key = key.into();
        match self.entries.iter_mut().rev().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Returns the value of the last entry whose key equals `key`.
    pub fn get(&self, key: &[u8]) -> Option<&Value> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k[..] == *key)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    /// Iterates entries in stored order.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &Value)> {
        self.entries.iter().map(|(k, v)| (&k[..], v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entries(&self) -> &[(Bytes, Value)] {
        &self.entries
    }
}

impl<K: Into<Bytes>> FromIterator<(K, Value)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dictionary_get_returns_last_duplicate() {
        let mut dict = Dictionary::new();
        dict.push(&b"key"[..], Value::Integer(1));
        dict.push(&b"key"[..], Value::Integer(2));

        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get(b"key"), Some(&Value::Integer(2)));
    }

    #[test]
    fn test_dictionary_insert_replaces_existing() {
        let mut dict = Dictionary::new();
        dict.insert(&b"a"[..], Value::Integer(1));
        dict.insert(&b"a"[..], Value::Integer(7));

        assert_eq!(dict.len(), 1);
        assert_eq!(dict.get(b"a").and_then(Value::as_integer), Some(7));
        assert!(!dict.contains_key(b"b"));
    }

    #[test]
    fn test_value_accessors() {
        let text = Value::from("spam");
        assert_eq!(text.as_str(), Some("spam"));
        assert_eq!(text.as_integer(), None);
        assert_eq!(text.kind(), ValueKind::Bytes);

        let binary = Value::from(vec![0xFFu8, 0xFE]);
        assert_eq!(binary.as_bytes(), Some(&[0xFF, 0xFE][..]));
        assert_eq!(binary.as_str(), None);

        let list = Value::from(vec![Value::Integer(1)]);
        assert_eq!(list.as_list().map(<[Value]>::len), Some(1));
        assert_eq!(list.kind().to_string(), "list");
    }
}
