//! Bencode codec.
//!
//! Strict decoder for untrusted input and canonical encoder whose output is
//! suitable for hashing. Values are a closed four-variant tree.

pub mod decoder;
pub mod encoder;
pub mod value;

pub use decoder::{
    DEFAULT_MAX_DEPTH, Decoder, MAX_DEPTH_CEILING, decode, decode_with_config, find_value_span,
};
pub use encoder::{encode, encode_dictionary, encode_into};
pub use value::{Dictionary, Value, ValueKind};

/// Errors produced while decoding bencode.
///
/// Every variant is terminal for the decode call. Positions are byte
/// offsets into the input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BencodeError {
    #[error("Unexpected end of input at byte {position}")]
    UnexpectedEof { position: usize },

    #[error("Invalid integer at byte {position}: {reason}")]
    InvalidInteger {
        position: usize,
        reason: &'static str,
    },

    #[error("Invalid string length prefix at byte {position}")]
    InvalidStringLength { position: usize },

    #[error("Unexpected byte 0x{byte:02x} at byte {position}")]
    UnexpectedByte { byte: u8, position: usize },

    #[error("Trailing data after value at byte {position}")]
    TrailingData { position: usize },

    #[error("Nesting deeper than {limit} levels")]
    NestingTooDeep { limit: usize },

    #[error("Input of {length} bytes exceeds limit of {limit}")]
    InputTooLarge { length: usize, limit: usize },
}
