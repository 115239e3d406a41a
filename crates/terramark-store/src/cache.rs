//! Local cache — the durable on-device tier.
//!
//! One JSON document per store: `{ "territories": [...], "lastSync": "…" }`.
//! A parse failure is a miss, never a fatal error; the caller falls
//! through to the next tier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use terramark_core::{Collection, Error, Result, Territory};
use tracing::warn;

#[derive(Serialize, Deserialize)]
struct CacheDocument {
    territories: Collection,
    #[serde(rename = "lastSync")]
    last_sync: Option<DateTime<Utc>>,
}

pub struct LocalCache {
    path: PathBuf,
}

impl LocalCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cached collection. Missing file, empty collection, and
    /// corrupt payload all count as a miss; corruption is logged.
    pub fn load(&self) -> Option<Collection> {
        match self.read() {
            Ok(Some(doc)) if !doc.territories.is_empty() => Some(doc.territories),
            Ok(_) => None,
            Err(e) => {
                warn!("local cache unreadable, treating as miss: {}", e);
                None
            }
        }
    }

    /// Overwrite the cache in full and stamp lastSync with now.
    pub fn save(&self, territories: &[Territory]) -> Result<()> {
        let doc = CacheDocument {
            territories: territories.to_vec(),
            last_sync: Some(Utc::now()),
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&doc)?)?;
        Ok(())
    }

    /// Timestamp of the last successful local save.
    pub fn last_sync(&self) -> Option<DateTime<Utc>> {
        self.read().ok().flatten().and_then(|doc| doc.last_sync)
    }

    fn read(&self) -> Result<Option<CacheDocument>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| Error::CacheCorrupt(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terramark_core::seed::default_territories;

    #[test]
    fn missing_file_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path().join("territories.json"));
        assert!(cache.load().is_none());
        assert!(cache.last_sync().is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path().join("territories.json"));
        let territories = default_territories();
        cache.save(&territories).unwrap();

        assert_eq!(cache.load().unwrap(), territories);
        assert!(cache.last_sync().is_some());
    }

    #[test]
    fn corrupt_payload_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("territories.json");
        std::fs::write(&path, "{not json").unwrap();

        let cache = LocalCache::new(&path);
        assert!(cache.load().is_none());
    }

    #[test]
    fn empty_collection_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalCache::new(dir.path().join("territories.json"));
        cache.save(&[]).unwrap();
        assert!(cache.load().is_none());
        // the stamp is still written
        assert!(cache.last_sync().is_some());
    }
}
