//! Metainfo extraction from bencoded torrent documents

use chrono::DateTime;
use sha1::{Digest, Sha1};
use url::Url;

use super::MetainfoError;
use super::types::TorrentDescriptor;
use crate::bencode::{self, Dictionary};
use crate::config::{
    BencodeConfig, InfoHashSource, MetainfoConfig, PieceHashPolicy, TidepoolConfig,
};
use crate::torrent::schema::{self, SchemaError};
use crate::torrent::{HASH_LEN, InfoHash, PieceHashes};

/// Extracts [`TorrentDescriptor`]s from raw metainfo bytes.
///
/// Holds only configuration, so one parser can serve any number of
/// independent calls.
#[derive(Debug, Clone, Default)]
pub struct MetainfoParser {
    bencode: BencodeConfig,
    metainfo: MetainfoConfig,
}

impl MetainfoParser {
    /// Creates a parser with default limits and strict policies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser using the bencode and metainfo sections of `config`.
    pub fn with_config(config: &TidepoolConfig) -> Self {
        Self {
            bencode: config.bencode.clone(),
            metainfo: config.metainfo.clone(),
        }
    }

    /// Parses a metainfo document into a torrent descriptor.
    ///
    /// # Errors
    /// - `MetainfoError::Bencode` - Input is not well-formed bencode
    /// - `MetainfoError::Schema` - Required key missing or of the wrong type
    /// - `MetainfoError::InvalidAnnounceUrl` - `announce` is not a URL
    /// - `MetainfoError::InvalidPieceHashes` - `pieces` rejected by the strict policy
    pub fn parse(&self, data: &[u8]) -> Result<TorrentDescriptor, MetainfoError> {
        let document = bencode::decode_with_config(data, &self.bencode)?;
        let root = schema::root_dictionary(&document, "Metainfo document")?;

        let announce = schema::require_string(root, "announce")?;
        let announce_url = Url::parse(&announce).map_err(|source| {
            MetainfoError::InvalidAnnounceUrl {
                url: announce.clone(),
                source,
            }
        })?;

        let info = schema::require_dictionary(root, "info")?;
        let info_hash = self.compute_info_hash(data, info)?;

        let total_length = schema::require_unsigned::<u64>(info, "length")?;
        let piece_length = schema::require_unsigned::<u64>(info, "piece length")?;
        if piece_length == 0 {
            return Err(SchemaError::InvalidValue {
                key: "piece length",
                reason: "must be greater than zero".to_string(),
            }
            .into());
        }

        let name = schema::require_string(info, "name")?;
        let comment = optional_string(info, root, "comment")?;
        let created_by = optional_string(info, root, "created by")?;
        let creation_date = match optional_integer(info, root, "creation date")? {
            Some(seconds) => Some(DateTime::from_timestamp(seconds, 0).ok_or_else(|| {
                SchemaError::InvalidValue {
                    key: "creation date",
                    reason: format!("{seconds} is not a representable timestamp"),
                }
            })?),
            None => None,
        };

        let pieces = self.slice_pieces(schema::require_bytes(info, "pieces")?)?;

        tracing::debug!(
            "parse_metainfo: name={}, length={}, pieces={}, info_hash={}",
            name,
            total_length,
            pieces.len(),
            info_hash
        );

        Ok(TorrentDescriptor {
            announce_url,
            name,
            total_length,
            piece_length,
            pieces,
            info_hash,
            comment,
            created_by,
            creation_date,
            bytes_downloaded: 0,
            bytes_uploaded: 0,
        })
    }

    /// SHA-1 over either the original `info` bytes in `data` or the
    /// canonical re-encoding of `info`, as selected by `info_hash_source`.
    fn compute_info_hash(
        &self,
        data: &[u8],
        info: &Dictionary,
    ) -> Result<InfoHash, MetainfoError> {
        let mut hasher = Sha1::new();
        match self.metainfo.info_hash_source {
            InfoHashSource::OriginalBytes => {
                let span = bencode::find_value_span(data, b"info", &self.bencode)?
                    .ok_or(SchemaError::MissingKey { key: "info" })?;
                hasher.update(&data[span]);
            }
            InfoHashSource::Canonical => {
                hasher.update(bencode::encode_dictionary(info));
            }
        }

        let mut hash = [0u8; HASH_LEN];
        hash.copy_from_slice(&hasher.finalize());
        Ok(InfoHash::new(hash))
    }

    fn slice_pieces(&self, blob: &bytes::Bytes) -> Result<PieceHashes, MetainfoError> {
        let pieces = PieceHashes::new(blob.clone());
        match self.metainfo.piece_policy {
            PieceHashPolicy::Strict if pieces.is_empty() || pieces.has_partial_tail() => {
                Err(MetainfoError::InvalidPieceHashes { length: blob.len() })
            }
            PieceHashPolicy::Lenient if pieces.has_partial_tail() => {
                tracing::warn!(
                    "parse_metainfo: pieces blob of {} bytes is not a multiple of {}, keeping short final hash",
                    blob.len(),
                    HASH_LEN
                );
                Ok(pieces)
            }
            _ => Ok(pieces),
        }
    }
}

// Producers disagree on whether these live in `info` or at the top level.
fn optional_string(
    info: &Dictionary,
    root: &Dictionary,
    key: &'static str,
) -> Result<Option<String>, SchemaError> {
    match schema::optional_string(info, key)? {
        Some(value) => Ok(Some(value)),
        None => schema::optional_string(root, key),
    }
}

fn optional_integer(
    info: &Dictionary,
    root: &Dictionary,
    key: &'static str,
) -> Result<Option<i64>, SchemaError> {
    match schema::optional_integer(info, key)? {
        Some(value) => Ok(Some(value)),
        None => schema::optional_integer(root, key),
    }
}
