//! BitTorrent metainfo, tracker and peer types built on the bencode codec

pub mod parsing;
pub mod protocol;
pub mod registry;
pub mod schema;
pub mod tracker;

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;

pub use parsing::{MetainfoError, MetainfoParser, TorrentDescriptor};
pub use protocol::{PeerHandshake, PeerId};
pub use registry::TorrentRegistry;
pub use schema::SchemaError;
pub use tracker::{AnnounceEvent, AnnounceRequest, TrackerError, TrackerResponse};

/// Length of a SHA-1 digest in bytes.
pub const HASH_LEN: usize = 20;

/// SHA-1 hash identifying a unique torrent.
///
/// 20-byte SHA-1 hash of the info dictionary from a torrent file.
/// Used to uniquely identify torrents across the BitTorrent network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InfoHash([u8; HASH_LEN]);

impl InfoHash {
    /// Creates InfoHash from 20-byte SHA-1 hash.
    pub fn new(hash: [u8; HASH_LEN]) -> Self {
        Self(hash)
    }

    /// Returns reference to underlying 20-byte hash.
    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }

    /// Percent-encodes the raw hash for a tracker query string.
    ///
    /// Bytes outside `[A-Za-z0-9._~-]` become uppercase `%XX`.
    pub fn url_encoded(&self) -> String {
        tracker::protocol::encoding::url_encode_bytes(&self.0)
    }
}

impl fmt::Display for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Error returned when an info hash string is not 40 hex digits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid info hash: expected 40 hex characters")]
pub struct InvalidInfoHash;

impl FromStr for InfoHash {
    type Err = InvalidInfoHash;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut hash = [0u8; HASH_LEN];
        hex::decode_to_slice(s, &mut hash).map_err(|_| InvalidInfoHash)?;
        Ok(Self(hash))
    }
}

/// Ordered piece fingerprints sliced from a metainfo `pieces` blob.
///
/// Each entry is 20 bytes except possibly the last when the blob was
/// accepted under the lenient piece policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceHashes {
    blob: Bytes,
}

impl PieceHashes {
    pub(crate) fn new(blob: Bytes) -> Self {
        Self { blob }
    }

    /// Number of fingerprints, `ceil(blob length / 20)`.
    pub fn len(&self) -> usize {
        self.blob.len().div_ceil(HASH_LEN)
    }

    pub fn is_empty(&self) -> bool {
        self.blob.is_empty()
    }

    /// Returns fingerprint `index`, which may be shorter than 20 bytes if it
    /// is the last one.
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        let start = index.checked_mul(HASH_LEN)?;
        if start >= self.blob.len() {
            return None;
        }
        let end = (start + HASH_LEN).min(self.blob.len());
        Some(&self.blob[start..end])
    }

    /// Iterates fingerprints in document order.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.blob.chunks(HASH_LEN)
    }

    /// Returns `true` if the final fingerprint is shorter than 20 bytes.
    pub fn has_partial_tail(&self) -> bool {
        !self.blob.len().is_multiple_of(HASH_LEN)
    }

    /// Raw concatenated blob as it appeared in the document.
    pub fn as_bytes(&self) -> &[u8] {
        &self.blob
    }
}
