//! Core types for BitTorrent tracker communication

use std::net::SocketAddr;

use url::Url;

use super::protocol::encoding::url_encode_bytes;
use crate::torrent::InfoHash;
use crate::torrent::protocol::PeerId;

/// Tracker announce request.
///
/// Contains client statistics and torrent information sent to tracker
/// during announce operations to report progress and request peer list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnounceRequest {
    /// Unique identifier for the torrent being announced
    pub info_hash: InfoHash,
    /// Client's unique 20-byte identifier
    pub peer_id: PeerId,
    /// TCP port client is listening on for peer connections
    pub port: u16,
    /// Total bytes uploaded to other peers
    pub uploaded: u64,
    /// Total bytes downloaded from other peers
    pub downloaded: u64,
    /// Bytes remaining to download (0 for seeders)
    pub left: u64,
    /// Current client state for this torrent
    pub event: AnnounceEvent,
}

impl AnnounceRequest {
    /// Builds the announce query string, always requesting compact peers.
    pub fn query_string(&self) -> String {
        format!(
            "info_hash={}&peer_id={}&port={}&uploaded={}&downloaded={}&left={}&compact=1&event={}",
            self.info_hash.url_encoded(),
            url_encode_bytes(self.peer_id.as_bytes()),
            self.port,
            self.uploaded,
            self.downloaded,
            self.left,
            self.event.as_str()
        )
    }

    /// Appends the announce query to `announce_url`, keeping any query the
    /// tracker URL already carries.
    pub fn to_url(&self, announce_url: &Url) -> Url {
        let mut url = announce_url.clone();
        let query = match announce_url.query() {
            Some(existing) if !existing.is_empty() => {
                format!("{existing}&{}", self.query_string())
            }
            _ => self.query_string(),
        };
        url.set_query(Some(&query));
        url
    }
}

/// BitTorrent announce events.
///
/// Indicates client state changes that should be reported to tracker
/// for proper swarm management and statistics tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnounceEvent {
    /// Client started downloading this torrent
    Started,
    /// Client stopped downloading this torrent
    Stopped,
    /// Client completed downloading this torrent
    Completed,
}

impl AnnounceEvent {
    /// Convert announce event to tracker protocol string.
    pub fn as_str(self) -> &'static str {
        match self {
            AnnounceEvent::Started => "started",
            AnnounceEvent::Stopped => "stopped",
            AnnounceEvent::Completed => "completed",
        }
    }
}

/// Tracker announce response.
///
/// Contains peer list and swarm statistics returned by tracker
/// in response to announce requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerResponse {
    /// Seconds until next announce request should be sent
    pub interval: u32,
    /// Minimum allowed interval between announces
    pub min_interval: Option<u32>,
    /// Tracker-specific identifier for subsequent requests
    pub tracker_id: Option<String>,
    /// Number of seeders in the swarm
    pub complete: u32,
    /// Number of leechers in the swarm
    pub incomplete: u32,
    /// Peer addresses in the order the tracker listed them
    pub peers: Vec<SocketAddr>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::torrent::HASH_LEN;

    fn request() -> AnnounceRequest {
        let mut hash = [0x11u8; HASH_LEN];
        hash[0] = b'A';
        hash[1] = 0xFF;
        AnnounceRequest {
            info_hash: InfoHash::new(hash),
            peer_id: PeerId::new(*b"-TP0001-abcdefghijkl"),
            port: 6881,
            uploaded: 10,
            downloaded: 20,
            left: 30,
            event: AnnounceEvent::Started,
        }
    }

    #[test]
    fn test_query_string() {
        let query = request().query_string();
        assert_eq!(
            query,
            format!(
                "info_hash=A%FF{}&peer_id=-TP0001-abcdefghijkl&port=6881&uploaded=10&downloaded=20&left=30&compact=1&event=started",
                "%11".repeat(18)
            )
        );
    }

    #[test]
    fn test_to_url_appends_to_existing_query() {
        let base = Url::parse("http://tracker.local/announce?passkey=abc").unwrap();
        let url = request().to_url(&base);
        let query = url.query().unwrap();
        assert!(query.starts_with("passkey=abc&info_hash=A%FF%11"));
        assert!(query.ends_with("&compact=1&event=started"));
        assert_eq!(url.path(), "/announce");
    }

    #[test]
    fn test_to_url_without_query() {
        let base = Url::parse("http://tracker.local/announce").unwrap();
        let url = request().to_url(&base);
        assert_eq!(url.query(), Some(request().query_string().as_str()));
    }

    #[test]
    fn test_event_strings() {
        assert_eq!(AnnounceEvent::Started.as_str(), "started");
        assert_eq!(AnnounceEvent::Stopped.as_str(), "stopped");
        assert_eq!(AnnounceEvent::Completed.as_str(), "completed");
    }
}
