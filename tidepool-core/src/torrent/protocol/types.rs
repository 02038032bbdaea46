//! Peer identity and handshake record shapes

use crate::torrent::{HASH_LEN, InfoHash};

/// Protocol identifier carried in every handshake.
pub const PROTOCOL_IDENTIFIER: &str = "BitTorrent protocol";

/// BitTorrent peer identifier.
///
/// 20-byte identifier for peers in the BitTorrent network.
/// Used in handshakes and tracker communication to identify clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerId([u8; HASH_LEN]);

impl PeerId {
    /// Creates peer ID from 20-byte array.
    pub fn new(id: [u8; HASH_LEN]) -> Self {
        Self(id)
    }

    /// Returns peer ID as byte array reference.
    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }

    /// Generate a peer ID starting with `prefix` and padded with random bytes.
    ///
    /// Prefixes longer than 20 bytes are cut to fit.
    pub fn generate(prefix: &str) -> Self {
        let mut id = [0u8; HASH_LEN];
        let prefix_len = prefix.len().min(HASH_LEN);
        id[..prefix_len].copy_from_slice(&prefix.as_bytes()[..prefix_len]);
        for byte in &mut id[prefix_len..] {
            *byte = rand::random();
        }
        Self(id)
    }
}

/// Peer handshake information.
///
/// Initial exchange between peers to establish protocol compatibility
/// and verify info hash matching. Only the record shape lives here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerHandshake {
    /// Protocol identifier string ("BitTorrent protocol")
    pub protocol: String,
    /// Reserved bytes for protocol extensions
    pub reserved: [u8; 8],
    /// Info hash of the torrent being shared
    pub info_hash: InfoHash,
    /// Unique identifier for the peer
    pub peer_id: PeerId,
}

impl PeerHandshake {
    /// Create handshake for BitTorrent protocol.
    pub fn new(info_hash: InfoHash, peer_id: PeerId) -> Self {
        Self {
            protocol: PROTOCOL_IDENTIFIER.to_string(),
            reserved: [0u8; 8],
            info_hash,
            peer_id,
        }
    }

    /// Length byte that prefixes the protocol identifier.
    pub fn protocol_len(&self) -> u8 {
        u8::try_from(self.protocol.len()).unwrap_or(u8::MAX)
    }
}
