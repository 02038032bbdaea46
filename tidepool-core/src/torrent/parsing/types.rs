//! Torrent descriptor produced by metainfo extraction

use chrono::{DateTime, Utc};
use url::Url;

use super::MetainfoError;
use super::parser::MetainfoParser;
use crate::torrent::protocol::{PeerHandshake, PeerId};
use crate::torrent::tracker::{AnnounceEvent, AnnounceRequest};
use crate::torrent::{InfoHash, PieceHashes};

/// Complete metadata extracted from a single-file torrent.
///
/// Immutable apart from the transfer counters, which start at zero and are
/// advanced by whatever moves the data.
#[derive(Debug, Clone, PartialEq)]
pub struct TorrentDescriptor {
    pub(super) announce_url: Url,
    pub(super) name: String,
    pub(super) total_length: u64,
    pub(super) piece_length: u64,
    pub(super) pieces: PieceHashes,
    pub(super) info_hash: InfoHash,
    pub(super) comment: Option<String>,
    pub(super) created_by: Option<String>,
    pub(super) creation_date: Option<DateTime<Utc>>,
    pub(super) bytes_downloaded: u64,
    pub(super) bytes_uploaded: u64,
}

impl TorrentDescriptor {
    /// Parses a metainfo document with default configuration.
    ///
    /// # Errors
    /// - See [`MetainfoParser::parse`]
    pub fn parse(data: &[u8]) -> Result<Self, MetainfoError> {
        MetainfoParser::new().parse(data)
    }

    pub fn announce_url(&self) -> &Url {
        &self.announce_url
    }

    /// Suggested file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn total_length(&self) -> u64 {
        self.total_length
    }

    pub fn piece_length(&self) -> u64 {
        self.piece_length
    }

    pub fn pieces(&self) -> &PieceHashes {
        &self.pieces
    }

    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    pub fn info_hash(&self) -> InfoHash {
        self.info_hash
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn created_by(&self) -> Option<&str> {
        self.created_by.as_deref()
    }

    pub fn creation_date(&self) -> Option<DateTime<Utc>> {
        self.creation_date
    }

    pub fn bytes_downloaded(&self) -> u64 {
        self.bytes_downloaded
    }

    pub fn bytes_uploaded(&self) -> u64 {
        self.bytes_uploaded
    }

    /// Bytes still missing, `total_length - downloaded`.
    pub fn bytes_left(&self) -> u64 {
        self.total_length.saturating_sub(self.bytes_downloaded)
    }

    /// Adds to the downloaded counter, saturating at `u64::MAX`.
    pub fn record_downloaded(&mut self, bytes: u64) {
        self.bytes_downloaded = self.bytes_downloaded.saturating_add(bytes);
    }

    /// Adds to the uploaded counter, saturating at `u64::MAX`.
    pub fn record_uploaded(&mut self, bytes: u64) {
        self.bytes_uploaded = self.bytes_uploaded.saturating_add(bytes);
    }

    /// Builds a compact announce request from the current counters.
    pub fn announce_request(
        &self,
        peer_id: PeerId,
        port: u16,
        event: AnnounceEvent,
    ) -> AnnounceRequest {
        AnnounceRequest {
            info_hash: self.info_hash,
            peer_id,
            port,
            uploaded: self.bytes_uploaded,
            downloaded: self.bytes_downloaded,
            left: self.bytes_left(),
            event,
        }
    }

    /// Builds the opening handshake record for this torrent.
    pub fn handshake(&self, peer_id: PeerId) -> PeerHandshake {
        PeerHandshake::new(self.info_hash, peer_id)
    }
}
