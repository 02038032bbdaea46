//! BitTorrent tracker protocol utilities and constants

/// BitTorrent tracker protocol constants
pub mod constants {
    /// Compact peer response format (6 bytes per peer)
    pub const COMPACT_PEER_SIZE: usize = 6;

    /// Bytes of the IPv4 address within a compact peer entry
    pub const COMPACT_IP_SIZE: usize = 4;
}

/// URL encoding utilities for tracker communication
pub mod encoding {
    /// Encode bytes for tracker URL parameters.
    ///
    /// Unreserved characters `[A-Za-z0-9._~-]` pass through, every other
    /// byte becomes uppercase `%XX`.
    pub fn url_encode_bytes(bytes: &[u8]) -> String {
        urlencoding::encode_binary(bytes).into_owned()
    }
}
