//! BitTorrent tracker data exchange.
//!
//! Announce request construction and compact announce response decoding.
//! Transport is left to the caller.

pub mod protocol;
pub mod response;
pub mod types;

// Re-export public API
pub use response::TrackerResponseParser;
pub use types::{AnnounceEvent, AnnounceRequest, TrackerResponse};

use crate::bencode::BencodeError;
use crate::torrent::schema::SchemaError;

/// Errors that can occur while decoding a tracker response.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("Malformed bencode: {0}")]
    Bencode(#[from] BencodeError),

    #[error("Invalid tracker response: {0}")]
    Schema(#[from] SchemaError),

    #[error("Tracker error: {reason}")]
    Failure { reason: String },

    #[error("Non-compact peer list is not supported")]
    UnsupportedPeerFormat,

    #[error("Compact peer list of {length} bytes is not a multiple of 6")]
    MalformedPeerList { length: usize },
}

impl TrackerResponse {
    /// Parses a tracker response body with default configuration.
    ///
    /// # Errors
    /// - See [`TrackerResponseParser::parse`]
    pub fn parse(data: &[u8]) -> Result<Self, TrackerError> {
        TrackerResponseParser::new().parse(data)
    }
}
