//! Tidepool Core - BitTorrent metainfo and tracker data handling
//!
//! This crate provides the data layer of a BitTorrent client: a strict
//! bencode codec, torrent descriptor extraction with info hash
//! fingerprinting, compact tracker response decoding, and the peer
//! identity records the wire layer needs.

pub mod bencode;
pub mod config;
pub mod torrent;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use bencode::{BencodeError, Dictionary, Value};
pub use config::TidepoolConfig;
pub use torrent::{
    InfoHash, MetainfoError, SchemaError, TorrentDescriptor, TorrentRegistry, TrackerError,
    TrackerResponse,
};

/// Core errors that can bubble up from any Tidepool component.
#[derive(Debug, thiserror::Error)]
pub enum TidepoolError {
    #[error("Bencode error: {0}")]
    Bencode(#[from] BencodeError),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Metainfo error: {0}")]
    Metainfo(#[from] MetainfoError),

    #[error("Tracker error: {0}")]
    Tracker(#[from] TrackerError),

    #[error("Configuration error: {reason}")]
    Configuration { reason: String },
}

impl TidepoolError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            TidepoolError::Bencode(_) | TidepoolError::Schema(_) => {
                "Data is not valid bencode metadata".to_string()
            }
            TidepoolError::Metainfo(e) => match e {
                MetainfoError::InvalidAnnounceUrl { url, .. } => {
                    format!("Invalid tracker URL: {url}")
                }
                _ => "This is not a valid torrent file".to_string(),
            },
            TidepoolError::Tracker(e) => match e {
                TrackerError::Failure { reason } => format!("Tracker refused request: {reason}"),
                TrackerError::UnsupportedPeerFormat => {
                    "Tracker returned an unsupported peer list".to_string()
                }
                _ => "Tracker sent an invalid response".to_string(),
            },
            TidepoolError::Configuration { .. } => "Configuration error occurred".to_string(),
        }
    }

    /// Checks if this error is due to caller-supplied input.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            TidepoolError::Configuration { .. } | TidepoolError::Metainfo(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TidepoolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metainfo_error_conversion() {
        let err: TidepoolError = TorrentDescriptor::parse(b"i1e").unwrap_err().into();
        assert!(matches!(err, TidepoolError::Metainfo(_)));
        assert!(err.is_user_error());
        assert_eq!(err.user_message(), "This is not a valid torrent file");
    }

    #[test]
    fn test_tracker_failure_message() {
        let err: TidepoolError = TrackerError::Failure {
            reason: "banned".to_string(),
        }
        .into();
        assert_eq!(err.user_message(), "Tracker refused request: banned");
        assert!(!err.is_user_error());
    }

    #[test]
    fn test_question_mark_propagation() {
        fn parse_both(torrent: &[u8], response: &[u8]) -> Result<usize> {
            let descriptor = TorrentDescriptor::parse(torrent)?;
            let response = TrackerResponse::parse(response)?;
            Ok(descriptor.piece_count() + response.peers.len())
        }

        let err = parse_both(b"x", b"").unwrap_err();
        assert!(matches!(err, TidepoolError::Metainfo(MetainfoError::Bencode(_))));
    }
}
