//! Typed field extraction from decoded bencode dictionaries

use bytes::Bytes;

use crate::bencode::{Dictionary, Value, ValueKind};

/// Structural errors: a required key is absent or holds the wrong shape.
///
/// Every variant names the offending key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("{context} must be a dictionary, found {found}")]
    NotADictionary {
        context: &'static str,
        found: ValueKind,
    },

    #[error("Missing required key '{key}'")]
    MissingKey { key: &'static str },

    #[error("Key '{key}' must be a {expected}, found {found}")]
    WrongType {
        key: &'static str,
        expected: ValueKind,
        found: ValueKind,
    },

    #[error("Key '{key}' has an invalid value: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

pub(crate) type SchemaResult<T> = Result<T, SchemaError>;

/// Requires the root of a decoded document to be a dictionary.
pub(crate) fn root_dictionary<'a>(
    value: &'a Value,
    context: &'static str,
) -> SchemaResult<&'a Dictionary> {
    value.as_dict().ok_or(SchemaError::NotADictionary {
        context,
        found: value.kind(),
    })
}

fn require<'a>(dict: &'a Dictionary, key: &'static str) -> SchemaResult<&'a Value> {
    dict.get(key.as_bytes())
        .ok_or(SchemaError::MissingKey { key })
}

fn wrong_type(key: &'static str, expected: ValueKind, found: &Value) -> SchemaError {
    SchemaError::WrongType {
        key,
        expected,
        found: found.kind(),
    }
}

pub(crate) fn require_dictionary<'a>(
    dict: &'a Dictionary,
    key: &'static str,
) -> SchemaResult<&'a Dictionary> {
    let value = require(dict, key)?;
    value
        .as_dict()
        .ok_or_else(|| wrong_type(key, ValueKind::Dictionary, value))
}

pub(crate) fn require_bytes<'a>(
    dict: &'a Dictionary,
    key: &'static str,
) -> SchemaResult<&'a Bytes> {
    match require(dict, key)? {
        Value::Bytes(bytes) => Ok(bytes),
        other => Err(wrong_type(key, ValueKind::Bytes, other)),
    }
}

pub(crate) fn require_string(dict: &Dictionary, key: &'static str) -> SchemaResult<String> {
    let value = require(dict, key)?;
    bytes_to_string(key, value)
}

/// Requires a non-negative integer that fits in `T`.
pub(crate) fn require_unsigned<T>(dict: &Dictionary, key: &'static str) -> SchemaResult<T>
where
    T: TryFrom<i64>,
{
    let value = require(dict, key)?;
    integer_to_unsigned(key, value)
}

/// Looks up an optional text field; present values must be valid UTF-8.
pub(crate) fn optional_string(
    dict: &Dictionary,
    key: &'static str,
) -> SchemaResult<Option<String>> {
    dict.get(key.as_bytes())
        .map(|value| bytes_to_string(key, value))
        .transpose()
}

/// Like [`optional_string`], but replaces invalid UTF-8 instead of failing.
pub(crate) fn optional_lossy_string(
    dict: &Dictionary,
    key: &'static str,
) -> SchemaResult<Option<String>> {
    dict.get(key.as_bytes())
        .map(|value| {
            value
                .as_bytes()
                .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
                .ok_or_else(|| wrong_type(key, ValueKind::Bytes, value))
        })
        .transpose()
}

pub(crate) fn optional_integer(
    dict: &Dictionary,
    key: &'static str,
) -> SchemaResult<Option<i64>> {
    dict.get(key.as_bytes())
        .map(|value| {
            value
                .as_integer()
                .ok_or_else(|| wrong_type(key, ValueKind::Integer, value))
        })
        .transpose()
}

pub(crate) fn optional_unsigned<T>(
    dict: &Dictionary,
    key: &'static str,
) -> SchemaResult<Option<T>>
where
    T: TryFrom<i64>,
{
    dict.get(key.as_bytes())
        .map(|value| integer_to_unsigned(key, value))
        .transpose()
}

fn bytes_to_string(key: &'static str, value: &Value) -> SchemaResult<String> {
    let bytes = value
        .as_bytes()
        .ok_or_else(|| wrong_type(key, ValueKind::Bytes, value))?;
    String::from_utf8(bytes.to_vec()).map_err(|_| SchemaError::InvalidValue {
        key,
        reason: "not valid UTF-8".to_string(),
    })
}

fn integer_to_unsigned<T>(key: &'static str, value: &Value) -> SchemaResult<T>
where
    T: TryFrom<i64>,
{
    let integer = value
        .as_integer()
        .ok_or_else(|| wrong_type(key, ValueKind::Integer, value))?;
    if integer < 0 {
        return Err(SchemaError::InvalidValue {
            key,
            reason: format!("{integer} is negative"),
        });
    }
    T::try_from(integer).map_err(|_| SchemaError::InvalidValue {
        key,
        reason: format!("{integer} is out of range"),
    })
}
