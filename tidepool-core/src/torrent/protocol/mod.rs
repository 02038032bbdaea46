//! Peer identity and handshake records.
//!
//! The wire exchange itself belongs to the caller; this module only
//! defines the data it needs from the core.

pub mod types;

// Re-export public API
pub use types::{PROTOCOL_IDENTIFIER, PeerHandshake, PeerId};

#[cfg(test)]
mod tests {
    use super::types::{PeerHandshake, PeerId};
    use crate::config::PeerConfig;
    use crate::torrent::InfoHash;

    #[test]
    fn test_peer_id_generation() {
        let peer_id = PeerId::generate("-TP0001-");
        let bytes = peer_id.as_bytes();

        assert_eq!(&bytes[..8], b"-TP0001-");

        let peer_id2 = PeerId::generate("-TP0001-");
        assert_ne!(peer_id.as_bytes(), peer_id2.as_bytes());
    }

    #[test]
    fn test_peer_id_uses_configured_prefix() {
        let config = PeerConfig::default();
        let peer_id = PeerId::generate(config.client_prefix);
        assert!(peer_id.as_bytes().starts_with(config.client_prefix.as_bytes()));
    }

    #[test]
    fn test_peer_id_long_prefix_truncated() {
        let prefix = "-XX0000-this-prefix-is-too-long";
        let peer_id = PeerId::generate(prefix);
        assert_eq!(&peer_id.as_bytes()[..], &prefix.as_bytes()[..20]);
    }

    #[test]
    fn test_peer_handshake_creation() {
        let info_hash = InfoHash::new([1u8; 20]);
        let peer_id = PeerId::new([2u8; 20]);

        let handshake = PeerHandshake::new(info_hash, peer_id);

        assert_eq!(handshake.protocol, "BitTorrent protocol");
        assert_eq!(handshake.protocol_len(), 19);
        assert_eq!(handshake.reserved, [0u8; 8]);
        assert_eq!(handshake.info_hash, info_hash);
        assert_eq!(handshake.peer_id, peer_id);
    }
}
