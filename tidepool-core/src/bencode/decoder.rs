//! Cursor-based bencode decoder

use std::ops::Range;

use bytes::Bytes;

use super::BencodeError;
use super::value::{Dictionary, Value};
use crate::config::BencodeConfig;

/// Default nesting limit for lists and dictionaries.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Hard ceiling on the nesting limit; larger requests are clamped to it.
///
/// Decoding recurses once per level, so this bounds stack use regardless
/// of configuration.
pub const MAX_DEPTH_CEILING: usize = 512;

/// Decodes a complete bencode document with default limits.
///
/// The buffer must hold exactly one value; trailing bytes are rejected.
///
/// # Errors
/// - `BencodeError::UnexpectedEof` - Input ends inside a value
/// - `BencodeError::InvalidInteger` / `InvalidStringLength` - Malformed digits
/// - `BencodeError::UnexpectedByte` - No value starts with this byte
/// - `BencodeError::TrailingData` - Bytes remain after the value
/// - `BencodeError::NestingTooDeep` - Lists or dictionaries nested too deeply
pub fn decode(input: &[u8]) -> Result<Value, BencodeError> {
    decode_with_config(input, &BencodeConfig::default())
}

/// Decodes a complete bencode document with explicit limits.
///
/// # Errors
/// - `BencodeError::InputTooLarge` - Input exceeds `max_input_len`
/// - Any error returned by [`decode`]
pub fn decode_with_config(input: &[u8], config: &BencodeConfig) -> Result<Value, BencodeError> {
    if let Some(limit) = config.max_input_len
        && input.len() > limit
    {
        return Err(BencodeError::InputTooLarge {
            length: input.len(),
            limit,
        });
    }

    tracing::trace!("decode: input_len={}", input.len());
    let mut decoder = Decoder::new(input).with_max_depth(config.max_depth);
    let value = decoder.decode_value()?;
    decoder.finish()?;
    Ok(value)
}

/// Locates the raw bytes of a top-level dictionary value.
///
/// Walks the root dictionary of `input` and returns the byte range of the
/// value stored under `key`. When the key occurs more than once the last
/// occurrence is returned, matching [`Dictionary::get`].
///
/// # Errors
/// - `BencodeError::UnexpectedByte` - Root value is not a dictionary
/// - Any error returned by [`decode`] for the walked region
pub fn find_value_span(
    input: &[u8],
    key: &[u8],
    config: &BencodeConfig,
) -> Result<Option<Range<usize>>, BencodeError> {
    let mut decoder = Decoder::new(input).with_max_depth(config.max_depth);
    match decoder.peek()? {
        b'd' => decoder.advance(1),
        byte => {
            return Err(BencodeError::UnexpectedByte { byte, position: 0 });
        }
    }

    let mut span = None;
    loop {
        if decoder.peek()? == b'e' {
            decoder.advance(1);
            break;
        }
        let entry_key = decoder.decode_key()?;
        let start = decoder.position();
        decoder.skip_value(1)?;
        if entry_key[..] == *key {
            span = Some(start..decoder.position());
        }
    }

    decoder.finish()?;
    Ok(span)
}

/// Single-pass bencode reader over a borrowed buffer.
///
/// Holds the read position for one decode call; independent decoders never
/// share state.
pub struct Decoder<'a> {
    input: &'a [u8],
    position: usize,
    max_depth: usize,
}

impl<'a> Decoder<'a> {
    /// Creates a decoder positioned at the start of `input`.
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            position: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the maximum list/dictionary nesting depth, clamped to
    /// [`MAX_DEPTH_CEILING`].
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.min(MAX_DEPTH_CEILING);
        self
    }

    /// Current byte offset into the input.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Decodes the next value at the cursor.
    ///
    /// # Errors
    /// - See [`decode`]; `TrailingData` is only reported by [`Decoder::finish`]
    pub fn decode_value(&mut self) -> Result<Value, BencodeError> {
        self.decode_nested(0)
    }

    /// Verifies the whole input has been consumed.
    ///
    /// # Errors
    /// - `BencodeError::TrailingData` - Unread bytes remain
    pub fn finish(&self) -> Result<(), BencodeError> {
        if self.position == self.input.len() {
            Ok(())
        } else {
            Err(BencodeError::TrailingData {
                position: self.position,
            })
        }
    }

    fn decode_nested(&mut self, depth: usize) -> Result<Value, BencodeError> {
        match self.peek()? {
            b'i' => self.decode_integer().map(Value::Integer),
            b'l' => self.decode_list(depth + 1),
            b'd' => self.decode_dictionary(depth + 1),
            b'0'..=b'9' => self.decode_bytes().map(Value::Bytes),
            byte => Err(BencodeError::UnexpectedByte {
                byte,
                position: self.position,
            }),
        }
    }

    fn decode_integer(&mut self) -> Result<i64, BencodeError> {
        let start = self.position;
        self.advance(1);

        let digits = self.take_while(|b| b == b'-' || b.is_ascii_digit());
        match self.peek()? {
            b'e' => self.advance(1),
            _ => {
                return Err(BencodeError::InvalidInteger {
                    position: start,
                    reason: "missing terminator",
                });
            }
        }

        let (negative, magnitude) = match digits.split_first() {
            Some((b'-', rest)) => (true, rest),
            _ => (false, digits),
        };

        if magnitude.is_empty() || !magnitude.iter().all(u8::is_ascii_digit) {
            return Err(BencodeError::InvalidInteger {
                position: start,
                reason: "expected decimal digits",
            });
        }
        if magnitude.len() > 1 && magnitude[0] == b'0' {
            return Err(BencodeError::InvalidInteger {
                position: start,
                reason: "leading zero",
            });
        }
        if negative && magnitude == b"0" {
            return Err(BencodeError::InvalidInteger {
                position: start,
                reason: "negative zero",
            });
        }

        std::str::from_utf8(digits)
            .ok()
            .and_then(|text| text.parse::<i64>().ok())
            .ok_or(BencodeError::InvalidInteger {
                position: start,
                reason: "out of 64-bit range",
            })
    }

    fn decode_bytes(&mut self) -> Result<Bytes, BencodeError> {
        let start = self.position;
        let digits = self.take_while(|b| b.is_ascii_digit());

        match self.peek()? {
            b':' => self.advance(1),
            _ => return Err(BencodeError::InvalidStringLength { position: start }),
        }
        if digits.is_empty() || (digits.len() > 1 && digits[0] == b'0') {
            return Err(BencodeError::InvalidStringLength { position: start });
        }

        let length = std::str::from_utf8(digits)
            .ok()
            .and_then(|text| text.parse::<usize>().ok())
            .ok_or(BencodeError::InvalidStringLength { position: start })?;

        if length > self.remaining() {
            return Err(BencodeError::UnexpectedEof {
                position: self.input.len(),
            });
        }

        let bytes = Bytes::copy_from_slice(&self.input[self.position..self.position + length]);
        self.advance(length);
        Ok(bytes)
    }

    fn decode_key(&mut self) -> Result<Bytes, BencodeError> {
        match self.peek()? {
            b'0'..=b'9' => self.decode_bytes(),
            byte => Err(BencodeError::UnexpectedByte {
                byte,
                position: self.position,
            }),
        }
    }

    fn decode_list(&mut self, depth: usize) -> Result<Value, BencodeError> {
        self.enter(depth)?;
        self.advance(1);

        let mut items = Vec::new();
        while self.peek()? != b'e' {
            items.push(self.decode_nested(depth)?);
        }
        self.advance(1);

        Ok(Value::List(items))
    }

    fn decode_dictionary(&mut self, depth: usize) -> Result<Value, BencodeError> {
        self.enter(depth)?;
        self.advance(1);

        let mut dict = Dictionary::new();
        while self.peek()? != b'e' {
            let key = self.decode_key()?;
            let value = self.decode_nested(depth)?;
            dict.push(key, value);
        }
        self.advance(1);

        Ok(Value::Dictionary(dict))
    }

    // Validates one value without building it.
    fn skip_value(&mut self, depth: usize) -> Result<(), BencodeError> {
        match self.peek()? {
            b'i' => self.decode_integer().map(drop),
            b'0'..=b'9' => self.decode_bytes().map(drop),
            b'l' => {
                self.enter(depth + 1)?;
                self.advance(1);
                while self.peek()? != b'e' {
                    self.skip_value(depth + 1)?;
                }
                self.advance(1);
                Ok(())
            }
            b'd' => {
                self.enter(depth + 1)?;
                self.advance(1);
                while self.peek()? != b'e' {
                    self.decode_key()?;
                    self.skip_value(depth + 1)?;
                }
                self.advance(1);
                Ok(())
            }
            byte => Err(BencodeError::UnexpectedByte {
                byte,
                position: self.position,
            }),
        }
    }

    fn enter(&self, depth: usize) -> Result<(), BencodeError> {
        if depth > self.max_depth {
            return Err(BencodeError::NestingTooDeep {
                limit: self.max_depth,
            });
        }
        Ok(())
    }

    fn peek(&self) -> Result<u8, BencodeError> {
        self.input
            .get(self.position)
            .copied()
            .ok_or(BencodeError::UnexpectedEof {
                position: self.position,
            })
    }

    fn advance(&mut self, count: usize) {
        self.position += count;
    }

    fn remaining(&self) -> usize {
        self.input.len() - self.position
    }

    fn take_while(&mut self, predicate: impl Fn(u8) -> bool) -> &'a [u8] {
        let start = self.position;
        while self
            .input
            .get(self.position)
            .is_some_and(|&byte| predicate(byte))
        {
            self.position += 1;
        }
        &self.input[start..self.position]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(value: &Value) -> &[u8] {
        value.as_bytes().unwrap()
    }

    #[test]
    fn test_decode_integer() {
        assert_eq!(decode(b"i42e").unwrap(), Value::Integer(42));
        assert_eq!(decode(b"i0e").unwrap(), Value::Integer(0));
        assert_eq!(decode(b"i-17e").unwrap(), Value::Integer(-17));
    }

    #[test]
    fn test_decode_integer_bounds() {
        assert_eq!(
            decode(b"i9223372036854775807e").unwrap(),
            Value::Integer(i64::MAX)
        );
        assert_eq!(
            decode(b"i-9223372036854775808e").unwrap(),
            Value::Integer(i64::MIN)
        );
        assert!(matches!(
            decode(b"i9223372036854775808e"),
            Err(BencodeError::InvalidInteger { .. })
        ));
    }

    #[test]
    fn test_decode_integer_malformed() {
        for input in [
            &b"ie"[..],
            b"i-e",
            b"i+5e",
            b"i03e",
            b"i-0e",
            b"i1-2e",
            b"i12xe",
        ] {
            assert!(
                matches!(decode(input), Err(BencodeError::InvalidInteger { .. })),
                "expected invalid integer for {:?}",
                String::from_utf8_lossy(input)
            );
        }
        assert!(matches!(
            decode(b"i12"),
            Err(BencodeError::UnexpectedEof { position: 3 })
        ));
    }

    #[test]
    fn test_decode_bytes() {
        let value = decode(b"4:spam").unwrap();
        assert_eq!(bytes(&value), b"spam");

        let empty = decode(b"0:").unwrap();
        assert_eq!(bytes(&empty), b"");
    }

    #[test]
    fn test_decode_binary_bytes() {
        let value = decode(b"3:\x00\xff\x80").unwrap();
        assert_eq!(bytes(&value), &[0x00u8, 0xFF, 0x80]);
    }

    #[test]
    fn test_decode_truncated_string() {
        assert!(matches!(
            decode(b"5:abc"),
            Err(BencodeError::UnexpectedEof { position: 5 })
        ));
    }

    #[test]
    fn test_decode_huge_length_prefix_rejected() {
        assert!(matches!(
            decode(b"99999999999999999999999:abc"),
            Err(BencodeError::InvalidStringLength { position: 0 })
        ));
        assert!(matches!(
            decode(b"4294967296:abc"),
            Err(BencodeError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_decode_string_length_malformed() {
        assert!(matches!(
            decode(b"03:abc"),
            Err(BencodeError::InvalidStringLength { .. })
        ));
        assert!(matches!(
            decode(b"3abc"),
            Err(BencodeError::InvalidStringLength { .. })
        ));
        assert!(matches!(decode(b"3"), Err(BencodeError::UnexpectedEof { .. })));
    }

    #[test]
    fn test_decode_list() {
        let value = decode(b"l4:spami42ee").unwrap();
        assert_eq!(
            value,
            Value::List(vec![Value::from("spam"), Value::Integer(42)])
        );
        assert_eq!(decode(b"le").unwrap(), Value::List(Vec::new()));
    }

    #[test]
    fn test_decode_unterminated_list() {
        assert!(matches!(
            decode(b"l4:spam"),
            Err(BencodeError::UnexpectedEof { position: 7 })
        ));
    }

    #[test]
    fn test_decode_dictionary_keeps_document_order() {
        let value = decode(b"d3:zoo1:a3:bar1:be").unwrap();
        let dict = value.as_dict().unwrap();
        let keys: Vec<&[u8]> = dict.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![&b"zoo"[..], &b"bar"[..]]);
        assert_eq!(decode(b"de").unwrap(), Value::Dictionary(Dictionary::new()));
    }

    #[test]
    fn test_decode_dictionary_keeps_duplicates() {
        let value = decode(b"d1:ai1e1:ai2ee").unwrap();
        let dict = value.as_dict().unwrap();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get(b"a"), Some(&Value::Integer(2)));
    }

    #[test]
    fn test_decode_dictionary_rejects_non_string_key() {
        assert!(matches!(
            decode(b"di1ei2ee"),
            Err(BencodeError::UnexpectedByte {
                byte: b'i',
                position: 1
            })
        ));
    }

    #[test]
    fn test_decode_rejects_unknown_prefix_and_empty_input() {
        assert!(matches!(
            decode(b"x"),
            Err(BencodeError::UnexpectedByte {
                byte: b'x',
                position: 0
            })
        ));
        assert!(matches!(
            decode(b""),
            Err(BencodeError::UnexpectedEof { position: 0 })
        ));
    }

    #[test]
    fn test_decode_rejects_trailing_data() {
        assert!(matches!(
            decode(b"i1ei2e"),
            Err(BencodeError::TrailingData { position: 3 })
        ));
    }

    #[test]
    fn test_decode_nesting_limit() {
        let config = BencodeConfig {
            max_depth: 2,
            ..BencodeConfig::default()
        };
        assert!(decode_with_config(b"llee", &config).is_ok());
        assert!(matches!(
            decode_with_config(b"llleee", &config),
            Err(BencodeError::NestingTooDeep { limit: 2 })
        ));

        let deep = format!("{}{}", "l".repeat(10_000), "e".repeat(10_000));
        assert!(matches!(
            decode(deep.as_bytes()),
            Err(BencodeError::NestingTooDeep { .. })
        ));
    }

    #[test]
    fn test_oversized_depth_limit_is_clamped() {
        let config = BencodeConfig {
            max_depth: 100_000_000,
            ..BencodeConfig::default()
        };
        let deep = format!("{}{}", "l".repeat(200_000), "e".repeat(200_000));

        assert!(matches!(
            decode_with_config(deep.as_bytes(), &config),
            Err(BencodeError::NestingTooDeep {
                limit: MAX_DEPTH_CEILING
            })
        ));

        let mut document = b"d4:info".to_vec();
        document.extend_from_slice(deep.as_bytes());
        document.push(b'e');
        assert!(matches!(
            find_value_span(&document, b"info", &config),
            Err(BencodeError::NestingTooDeep { .. })
        ));

        let at_ceiling = format!(
            "{}{}",
            "l".repeat(MAX_DEPTH_CEILING),
            "e".repeat(MAX_DEPTH_CEILING)
        );
        assert!(decode_with_config(at_ceiling.as_bytes(), &config).is_ok());
    }

    #[test]
    fn test_decode_input_limit() {
        let config = BencodeConfig {
            max_input_len: Some(4),
            ..BencodeConfig::default()
        };
        assert!(decode_with_config(b"i1e", &config).is_ok());
        assert!(matches!(
            decode_with_config(b"4:spam", &config),
            Err(BencodeError::InputTooLarge {
                length: 6,
                limit: 4
            })
        ));
    }

    #[test]
    fn test_find_value_span() {
        let input = b"d8:announce3:url4:infod4:name1:xee";
        let span = find_value_span(input, b"info", &BencodeConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(&input[span], b"d4:name1:xe");

        let missing = find_value_span(input, b"nope", &BencodeConfig::default()).unwrap();
        assert_eq!(missing, None);
    }

    #[test]
    fn test_find_value_span_last_duplicate_wins() {
        let input = b"d1:ki1e1:ki22ee";
        let span = find_value_span(input, b"k", &BencodeConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(&input[span], b"i22e");
    }

    #[test]
    fn test_find_value_span_requires_dictionary() {
        assert!(matches!(
            find_value_span(b"le", b"info", &BencodeConfig::default()),
            Err(BencodeError::UnexpectedByte { byte: b'l', .. })
        ));
        assert!(find_value_span(b"d4:infoi1e", b"info", &BencodeConfig::default()).is_err());
    }
}
