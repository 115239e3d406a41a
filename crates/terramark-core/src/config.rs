//! Store config — serde structs for ~/.terramark/terramark.json
//!
//! Pure types and parsing only. A missing or unreadable file yields
//! defaults; the store then runs cache-and-seed only until a remote
//! endpoint is configured.

use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub remote: RemoteConfig,
    pub cache: CacheConfig,
    pub map: MapConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Endpoint holding the full collection (GET to read, PUT to replace).
    pub endpoint: String,
    /// Static credential sent as the X-Master-Key header.
    #[serde(rename = "apiKey")]
    pub api_key: String,
    /// Echo the last read revision token (If-Match) on writes. Required
    /// by backing stores that enforce optimistic concurrency.
    pub revisioned: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache directory; defaults to ~/.terramark
    pub dir: Option<String>,
    pub file: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: None,
            file: "territories.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Initial viewport center as [lat, lon].
    pub center: [f64; 2],
    pub zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            // Kyiv
            center: [50.4501, 30.5234],
            zoom: 13,
        }
    }
}

impl StoreConfig {
    /// Load from a specific path. Missing or malformed files fall back
    /// to defaults rather than failing startup.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Discover from ~/.terramark/terramark.json.
    pub fn discover() -> Self {
        Self::load(&Self::default_path())
    }

    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home).join(".terramark").join("terramark.json")
    }

    /// Cache directory, tilde-expanded; defaults to ~/.terramark.
    pub fn cache_dir(&self) -> PathBuf {
        self.cache
            .dir
            .as_ref()
            .map(|d| expand_tilde(d))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
                PathBuf::from(home).join(".terramark")
            })
    }

    pub fn cache_path(&self) -> PathBuf {
        self.cache_dir().join(&self.cache.file)
    }

    /// Credential, with TERRAMARK_API_KEY taking precedence over the file.
    pub fn api_key(&self) -> String {
        std::env::var("TERRAMARK_API_KEY").unwrap_or_else(|_| self.remote.api_key.clone())
    }

    pub fn remote_configured(&self) -> bool {
        !self.remote.endpoint.is_empty()
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = StoreConfig::load(Path::new("/nonexistent/terramark.json"));
        assert!(!config.remote_configured());
        assert_eq!(config.cache.file, "territories.json");
        assert_eq!(config.map.zoom, 13);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: StoreConfig = serde_json::from_str(
            r#"{"remote": {"endpoint": "https://example.com/bin/1", "apiKey": "k"}}"#,
        )
        .unwrap();
        assert!(config.remote_configured());
        assert!(!config.remote.revisioned);
        assert_eq!(config.map.center, [50.4501, 30.5234]);
    }
}
