//! In-memory torrent lookup keyed by info hash

use std::collections::HashMap;

use super::InfoHash;
use super::parsing::{MetainfoError, MetainfoParser, TorrentDescriptor};
use crate::config::TidepoolConfig;

/// Tracks the descriptors the client currently knows about.
///
/// Adding a torrent whose info hash is already present replaces the
/// stored descriptor.
#[derive(Debug, Default)]
pub struct TorrentRegistry {
    parser: MetainfoParser,
    torrents: HashMap<InfoHash, TorrentDescriptor>,
}

impl TorrentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates registry whose metainfo parsing follows `config`.
    pub fn with_config(config: &TidepoolConfig) -> Self {
        Self {
            parser: MetainfoParser::with_config(config),
            torrents: HashMap::new(),
        }
    }

    /// Stores a descriptor, returning its info hash.
    pub fn add(&mut self, descriptor: TorrentDescriptor) -> InfoHash {
        let info_hash = descriptor.info_hash();
        if self.torrents.insert(info_hash, descriptor).is_some() {
            tracing::debug!("add_torrent: replaced existing descriptor for {info_hash}");
        } else {
            tracing::debug!("add_torrent: registered {info_hash}");
        }
        info_hash
    }

    /// Add a torrent from .torrent file data
    ///
    /// # Errors
    /// - `MetainfoError` - Torrent file parsing failed
    pub fn add_torrent_data(&mut self, data: &[u8]) -> Result<InfoHash, MetainfoError> {
        let descriptor = self.parser.parse(data)?;
        Ok(self.add(descriptor))
    }

    pub fn get(&self, info_hash: &InfoHash) -> Option<&TorrentDescriptor> {
        self.torrents.get(info_hash)
    }

    pub fn get_mut(&mut self, info_hash: &InfoHash) -> Option<&mut TorrentDescriptor> {
        self.torrents.get_mut(info_hash)
    }

    pub fn remove(&mut self, info_hash: &InfoHash) -> Option<TorrentDescriptor> {
        self.torrents.remove(info_hash)
    }

    pub fn contains(&self, info_hash: &InfoHash) -> bool {
        self.torrents.contains_key(info_hash)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&InfoHash, &TorrentDescriptor)> {
        self.torrents.iter()
    }

    pub fn len(&self) -> usize {
        self.torrents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.torrents.is_empty()
    }
}
