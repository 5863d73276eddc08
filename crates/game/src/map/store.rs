use std::fs;
use std::path::{Path, PathBuf};

use crate::options::Options;
use crate::session::Session;

use super::{Map, MapData, MapError};

/// Local map cache. Maps are stored by filename under the primary directory,
/// validated by crc32 content hash against the server before reuse, and
/// re-downloaded on mismatch. When the primary directory is not writable the
/// per-user fallback directory is used instead.
pub struct MapStore {
    primary_dir: PathBuf,
    fallback_dir: PathBuf,
}

impl MapStore {
    pub fn new(primary_dir: PathBuf, fallback_dir: PathBuf) -> Self {
        Self {
            primary_dir,
            fallback_dir,
        }
    }

    pub fn from_options(options: &Options) -> Self {
        Self::new(options.maps_dir.clone(), options.fallback_maps_dir.clone())
    }

    pub fn local_path(&self, map_name: &str) -> PathBuf {
        self.primary_dir.join(map_name)
    }

    /// crc32 of the raw file bytes; the same digest the server keeps for the
    /// canonical payload.
    pub fn local_hash(path: &Path) -> Result<u32, MapError> {
        let bytes = fs::read(path)?;
        Ok(crc32fast::hash(&bytes))
    }

    /// Produce the map named by the server: reuse the validated local copy,
    /// or download, persist, and parse a fresh one.
    pub fn resolve(&self, session: &dyn Session, map_name: &str) -> Result<Map, MapError> {
        if map_name.is_empty() {
            return Err(MapError::NoActiveMap);
        }

        for dir in [&self.primary_dir, &self.fallback_dir] {
            let path = dir.join(map_name);
            if !path.exists() {
                continue;
            }
            match Self::local_hash(&path) {
                Ok(crc) if session.map_hash_valid(map_name, crc)? => {
                    log::info!("using cached map {}", path.display());
                    let bytes = fs::read(&path)?;
                    return Ok(Map::new(MapData::decode(&bytes)?));
                }
                Ok(_) => {
                    log::info!("cached map {} is stale, discarding", path.display());
                    if let Err(e) = fs::remove_file(&path) {
                        log::warn!("cannot remove stale map {}: {}", path.display(), e);
                    }
                }
                Err(e) => {
                    log::warn!("cannot hash cached map {}: {}", path.display(), e);
                }
            }
        }

        self.download(session, map_name)
    }

    fn download(&self, session: &dyn Session, map_name: &str) -> Result<Map, MapError> {
        log::info!("downloading map {}", map_name);
        let bytes = session.download_map(map_name)?;
        let data = MapData::decode(&bytes)?;
        self.persist(map_name, &bytes);
        Ok(Map::new(data))
    }

    /// Persist failure is never fatal; the map still loads from memory.
    fn persist(&self, map_name: &str, bytes: &[u8]) {
        for dir in [&self.primary_dir, &self.fallback_dir] {
            match fs::create_dir_all(dir).and_then(|_| fs::write(dir.join(map_name), bytes)) {
                Ok(()) => {
                    log::debug!("saved map {} under {}", map_name, dir.display());
                    return;
                }
                Err(e) => {
                    log::warn!("cannot save map under {}: {}", dir.display(), e);
                }
            }
        }
    }
}
