//! Centralized configuration for Tidepool.
//!
//! Parsing limits and compatibility policies live here so callers can
//! tighten or relax behaviour without touching the parsers.

use crate::TidepoolError;
use crate::bencode::{DEFAULT_MAX_DEPTH, MAX_DEPTH_CEILING};
use crate::torrent::HASH_LEN;

/// Central configuration for all Tidepool components.
///
/// Groups related settings into per-component sections.
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct TidepoolConfig {
    pub bencode: BencodeConfig,
    pub metainfo: MetainfoConfig,
    pub tracker: TrackerConfig,
    pub peer: PeerConfig,
}

/// Decoder resource limits.
///
/// Bounds applied to untrusted input before and during decoding.
#[derive(Debug, Clone)]
pub struct BencodeConfig {
    /// Maximum nesting of lists and dictionaries
    pub max_depth: usize,
    /// Maximum accepted input length in bytes (None = unlimited)
    pub max_input_len: Option<usize>,
}

impl Default for BencodeConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_input_len: None,
        }
    }
}

/// How the `pieces` blob of a metainfo document is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PieceHashPolicy {
    /// Blob must be a non-empty multiple of 20 bytes
    #[default]
    Strict,
    /// A trailing partial hash is kept as a shorter final entry
    Lenient,
}

/// Which bytes are hashed to produce the info hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InfoHashSource {
    /// Exact byte range of the `info` value in the source document
    #[default]
    OriginalBytes,
    /// Canonical re-encoding of the parsed `info` dictionary
    Canonical,
}

/// Metainfo extraction policies.
#[derive(Debug, Clone, Default)]
pub struct MetainfoConfig {
    pub piece_policy: PieceHashPolicy,
    pub info_hash_source: InfoHashSource,
}

/// How a compact peer blob whose length is not a multiple of 6 is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PeerListPolicy {
    /// Decode whole entries and ignore trailing bytes
    #[default]
    Truncate,
    /// Reject the response
    Strict,
}

/// Tracker response decoding policies.
#[derive(Debug, Clone, Default)]
pub struct TrackerConfig {
    pub peer_list_policy: PeerListPolicy,
}

/// Local peer identity settings.
#[derive(Debug, Clone)]
pub struct PeerConfig {
    /// Azureus-style client prefix, exactly 8 bytes
    pub client_prefix: &'static str,
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self {
            client_prefix: "-TP0001-",
        }
    }
}

impl TidepoolConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Unparseable values keep the default.
    ///
    /// # Errors
    /// - `TidepoolError::Configuration` - An override is outside the supported range
    pub fn from_env() -> Result<Self, TidepoolError> {
        let mut config = Self::default();

        if let Ok(depth) = std::env::var("TIDEPOOL_MAX_DEPTH")
            && let Ok(depth) = depth.parse::<usize>()
        {
            config.bencode.max_depth = depth;
        }

        if let Ok(limit) = std::env::var("TIDEPOOL_MAX_INPUT_LEN")
            && let Ok(limit) = limit.parse::<usize>()
        {
            config.bencode.max_input_len = Some(limit);
        }

        if let Ok(lenient) = std::env::var("TIDEPOOL_LENIENT_PIECES")
            && lenient.parse().unwrap_or(false)
        {
            config.metainfo.piece_policy = PieceHashPolicy::Lenient;
        }

        if let Ok(canonical) = std::env::var("TIDEPOOL_CANONICAL_INFO_HASH")
            && canonical.parse().unwrap_or(false)
        {
            config.metainfo.info_hash_source = InfoHashSource::Canonical;
        }

        if let Ok(strict) = std::env::var("TIDEPOOL_STRICT_PEERS")
            && strict.parse().unwrap_or(false)
        {
            config.tracker.peer_list_policy = PeerListPolicy::Strict;
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks that every limit is one the parsers can honour.
    ///
    /// # Errors
    /// - `TidepoolError::Configuration` - Nesting limit is zero or above
    ///   [`MAX_DEPTH_CEILING`], or the client prefix exceeds 20 bytes
    pub fn validate(&self) -> Result<(), TidepoolError> {
        if !(1..=MAX_DEPTH_CEILING).contains(&self.bencode.max_depth) {
            return Err(TidepoolError::Configuration {
                reason: format!(
                    "max_depth {} must be between 1 and {MAX_DEPTH_CEILING}",
                    self.bencode.max_depth
                ),
            });
        }
        if self.peer.client_prefix.len() > HASH_LEN {
            return Err(TidepoolError::Configuration {
                reason: format!(
                    "client prefix '{}' is longer than {HASH_LEN} bytes",
                    self.peer.client_prefix
                ),
            });
        }
        Ok(())
    }

    /// Rejects every structural irregularity.
    pub fn strict() -> Self {
        Self {
            tracker: TrackerConfig {
                peer_list_policy: PeerListPolicy::Strict,
            },
            ..Default::default()
        }
    }

    /// Reproduces the historical lenient behaviour: short final piece hash,
    /// re-encoded info hash and truncated peer lists.
    pub fn compatible() -> Self {
        Self {
            metainfo: MetainfoConfig {
                piece_policy: PieceHashPolicy::Lenient,
                info_hash_source: InfoHashSource::Canonical,
            },
            ..Default::default()
        }
    }
}
