//! Canonical bencode encoder

use super::value::{Dictionary, Value};

/// Encodes a value tree into canonical bencode.
///
/// Dictionary keys are emitted in ascending raw-byte order regardless of
/// insertion order. Duplicate keys keep their relative order.
pub fn encode(value: &Value) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_into(&mut buf, value);
    buf
}

/// Appends the canonical encoding of `value` to `buf`.
pub fn encode_into(buf: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Bytes(bytes) => encode_bytes(buf, bytes),
        Value::Integer(integer) => {
            buf.push(b'i');
            buf.extend_from_slice(integer.to_string().as_bytes());
            buf.push(b'e');
        }
        Value::List(items) => {
            buf.push(b'l');
            for item in items {
                encode_into(buf, item);
            }
            buf.push(b'e');
        }
        Value::Dictionary(dict) => write_dictionary(buf, dict),
    }
}

/// Encodes a dictionary without wrapping it in a [`Value`].
pub fn encode_dictionary(dict: &Dictionary) -> Vec<u8> {
    let mut buf = Vec::new();
    write_dictionary(&mut buf, dict);
    buf
}

fn encode_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    buf.extend_from_slice(bytes.len().to_string().as_bytes());
    buf.push(b':');
    buf.extend_from_slice(bytes);
}

fn write_dictionary(buf: &mut Vec<u8>, dict: &Dictionary) {
    let mut entries: Vec<_> = dict.entries().iter().collect();
    // Stable: duplicates stay in input order.
    entries.sort_by(|(a, _), (b, _)| a[..].cmp(&b[..]));

    buf.push(b'd');
    for (key, value) in entries {
        encode_bytes(buf, key);
        encode_into(buf, value);
    }
    buf.push(b'e');
}
