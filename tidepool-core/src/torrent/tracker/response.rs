//! Tracker announce response decoding

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use super::TrackerError;
use super::protocol::constants::{COMPACT_IP_SIZE, COMPACT_PEER_SIZE};
use super::types::TrackerResponse;
use crate::bencode::{self, Value, ValueKind};
use crate::config::{BencodeConfig, PeerListPolicy, TidepoolConfig, TrackerConfig};
use crate::torrent::schema::{self, SchemaError};

/// Decodes tracker announce responses.
#[derive(Debug, Clone, Default)]
pub struct TrackerResponseParser {
    bencode: BencodeConfig,
    tracker: TrackerConfig,
}

impl TrackerResponseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser using the bencode and tracker sections of `config`.
    pub fn with_config(config: &TidepoolConfig) -> Self {
        Self {
            bencode: config.bencode.clone(),
            tracker: config.tracker.clone(),
        }
    }

    /// Parse tracker response from bencode data
    ///
    /// # Errors
    /// - `TrackerError::Bencode` - Body is not well-formed bencode
    /// - `TrackerError::Failure` - Tracker reported a `failure reason`
    /// - `TrackerError::Schema` - Required key missing or of the wrong type
    /// - `TrackerError::UnsupportedPeerFormat` - Peers given as a list of dictionaries
    /// - `TrackerError::MalformedPeerList` - Peer blob rejected by the strict policy
    pub fn parse(&self, data: &[u8]) -> Result<TrackerResponse, TrackerError> {
        let document = bencode::decode_with_config(data, &self.bencode)?;
        let root = schema::root_dictionary(&document, "Tracker response")?;

        if let Some(reason) = schema::optional_lossy_string(root, "failure reason")? {
            tracing::warn!("parse_tracker_response: tracker reported failure: {reason}");
            return Err(TrackerError::Failure { reason });
        }

        let interval = schema::require_unsigned::<u32>(root, "interval")?;
        let complete = schema::require_unsigned::<u32>(root, "complete")?;
        let incomplete = schema::require_unsigned::<u32>(root, "incomplete")?;
        let min_interval = schema::optional_unsigned::<u32>(root, "min interval")?;
        let tracker_id = schema::optional_string(root, "tracker id")?;

        let peers = match root.get(b"peers") {
            Some(Value::Bytes(blob)) => self.decode_compact_peers(blob)?,
            Some(Value::List(_)) => return Err(TrackerError::UnsupportedPeerFormat),
            Some(other) => {
                return Err(SchemaError::WrongType {
                    key: "peers",
                    expected: ValueKind::Bytes,
                    found: other.kind(),
                }
                .into());
            }
            None => return Err(SchemaError::MissingKey { key: "peers" }.into()),
        };

        tracing::debug!(
            "parse_tracker_response: interval={}, complete={}, incomplete={}, peers={}",
            interval,
            complete,
            incomplete,
            peers.len()
        );

        Ok(TrackerResponse {
            interval,
            min_interval,
            tracker_id,
            complete,
            incomplete,
            peers,
        })
    }

    /// Parse compact peer list from tracker response
    ///
    /// # Errors
    /// - `TrackerError::MalformedPeerList` - Length not a multiple of 6 under the strict policy
    pub fn decode_compact_peers(&self, blob: &[u8]) -> Result<Vec<SocketAddr>, TrackerError> {
        let trailing = blob.len() % COMPACT_PEER_SIZE;
        if trailing != 0 {
            match self.tracker.peer_list_policy {
                PeerListPolicy::Strict => {
                    return Err(TrackerError::MalformedPeerList { length: blob.len() });
                }
                PeerListPolicy::Truncate => {
                    tracing::warn!(
                        "decode_compact_peers: ignoring {trailing} trailing bytes of {}-byte peer list",
                        blob.len()
                    );
                }
            }
        }

        let peers = blob
            .chunks_exact(COMPACT_PEER_SIZE)
            .map(|entry| {
                let (ip, port) = entry.split_at(COMPACT_IP_SIZE);
                let ip = Ipv4Addr::new(ip[0], ip[1], ip[2], ip[3]);
                let port = u16::from_be_bytes([port[0], port[1]]);
                SocketAddr::V4(SocketAddrV4::new(ip, port))
            })
            .collect();

        Ok(peers)
    }
}
