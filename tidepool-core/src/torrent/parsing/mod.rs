//! Torrent metainfo parsing.
//!
//! Validates a decoded metainfo document, fingerprints its `info` section
//! with SHA-1 and slices the piece hash blob.

pub mod parser;
pub mod types;

pub use parser::MetainfoParser;
pub use types::TorrentDescriptor;

use crate::bencode::BencodeError;
use crate::torrent::schema::SchemaError;

/// Errors that can occur while extracting a torrent descriptor.
#[derive(Debug, thiserror::Error)]
pub enum MetainfoError {
    #[error("Malformed bencode: {0}")]
    Bencode(#[from] BencodeError),

    #[error("Invalid metainfo: {0}")]
    Schema(#[from] SchemaError),

    #[error("Invalid announce URL '{url}'")]
    InvalidAnnounceUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Pieces blob of {length} bytes is not a positive multiple of 20")]
    InvalidPieceHashes { length: usize },
}
