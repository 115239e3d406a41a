//! The owning collection store.
//!
//! One `TerritoryStore` encapsulates the single shared mutable collection:
//! consumers take read snapshots and subscribe to change events instead of
//! touching shared state directly. Every mutation is whole-collection
//! append or replace, written through to the local cache synchronously.

use crate::cache::LocalCache;
use crate::remote::RemoteAuthority;
use crate::transfer::{self, ImportResolution, PendingImport};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use terramark_core::{seed, Collection, Error, Result, Territory, TerritoryId};
use tokio::sync::{broadcast, RwLock};
use tracing::{error, info, warn};

/// Which tier satisfied a load. Each maps to a distinct user-facing status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadSource {
    Remote,
    Cache,
    Defaults,
}

impl LoadSource {
    pub fn status_message(&self) -> &'static str {
        match self {
            LoadSource::Remote => "loaded from remote",
            LoadSource::Cache => "using cached data",
            LoadSource::Defaults => "using default data",
        }
    }
}

/// Outcome of an explicit sync action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncStatus {
    Synced,
    /// Local cache empty — warned, no network action taken.
    NothingToSync,
    /// Recoverable: the local cache remains the durable source of truth.
    Failed(String),
}

/// Change notifications for render-adapter subscribers. Any event means
/// a full re-draw.
#[derive(Clone, Debug)]
pub enum StoreEvent {
    Loaded(LoadSource),
    Changed,
    Synced,
    SyncFailed(String),
}

pub struct TerritoryStore {
    cache: LocalCache,
    remote: Arc<dyn RemoteAuthority>,
    territories: RwLock<Collection>,
    revision: RwLock<Option<String>>,
    events: broadcast::Sender<StoreEvent>,
}

impl TerritoryStore {
    pub fn new(cache: LocalCache, remote: Arc<dyn RemoteAuthority>) -> Self {
        let (events, _) = broadcast::channel(32);
        Self {
            cache,
            remote,
            territories: RwLock::new(Vec::new()),
            revision: RwLock::new(None),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Fallback-ordered load: remote authority, then local cache, then the
    /// built-in seed. Remote failure never propagates — it is a cache-miss
    /// equivalent. A successful remote load refreshes the cache.
    pub async fn load(&self) -> LoadSource {
        match self.remote.fetch().await {
            Ok(Some(snapshot)) => {
                *self.revision.write().await = snapshot.revision;
                let mut territories = self.territories.write().await;
                *territories = snapshot.territories;
                self.write_cache(&territories);
                info!("loaded {} territories from remote", territories.len());
                drop(territories);
                self.notify(StoreEvent::Loaded(LoadSource::Remote));
                return LoadSource::Remote;
            }
            Ok(None) => info!("remote empty, falling back to local cache"),
            Err(e) => warn!("remote load failed, falling back to local cache: {}", e),
        }

        if let Some(cached) = self.cache.load() {
            info!("loaded {} territories from local cache", cached.len());
            *self.territories.write().await = cached;
            self.notify(StoreEvent::Loaded(LoadSource::Cache));
            return LoadSource::Cache;
        }

        info!("no remote or cached data, using defaults");
        *self.territories.write().await = seed::default_territories();
        self.notify(StoreEvent::Loaded(LoadSource::Defaults));
        LoadSource::Defaults
    }

    /// Cloned read of the current collection.
    pub async fn snapshot(&self) -> Collection {
        self.territories.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.territories.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.territories.read().await.is_empty()
    }

    pub async fn get(&self, id: &TerritoryId) -> Option<Territory> {
        self.territories
            .read()
            .await
            .iter()
            .find(|t| &t.id == id)
            .cloned()
    }

    pub async fn find_by_name(&self, name: &str) -> Option<Territory> {
        self.territories
            .read()
            .await
            .iter()
            .find(|t| t.name == name)
            .cloned()
    }

    /// Append one territory, write through to cache, notify.
    pub async fn append(&self, territory: Territory) -> Result<()> {
        if territory.name.trim().is_empty() {
            return Err(Error::InvalidTerritory("name must not be empty".into()));
        }
        let mut territories = self.territories.write().await;
        territories.push(territory);
        self.write_cache(&territories);
        drop(territories);
        self.notify(StoreEvent::Changed);
        Ok(())
    }

    /// Remove by id. A stale id is `NotFound` — it can never hit a
    /// different record, regardless of what mutated in between.
    pub async fn remove(&self, id: &TerritoryId) -> Result<Territory> {
        let mut territories = self.territories.write().await;
        let position = territories
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        let removed = territories.remove(position);
        self.write_cache(&territories);
        drop(territories);
        info!("removed territory \"{}\"", removed.name);
        self.notify(StoreEvent::Changed);
        Ok(removed)
    }

    /// Overwrite the local cache with the current collection. Non-throwing
    /// surface: failure is logged and reported as `false`.
    pub async fn save_local(&self) -> bool {
        let territories = self.territories.read().await;
        match self.cache.save(&territories) {
            Ok(()) => true,
            Err(e) => {
                error!("local save failed: {}", e);
                false
            }
        }
    }

    /// Push the cached collection to the remote authority, overwriting it
    /// entirely. An empty cache is a warning, not a network call.
    pub async fn sync_to_remote(&self) -> SyncStatus {
        let Some(territories) = self.cache.load() else {
            warn!("nothing to sync: local cache is empty");
            return SyncStatus::NothingToSync;
        };

        let mut revision = self.revision.read().await.clone();
        if revision.is_none() && self.remote.requires_revision() {
            // A revisioned store wants the current token even when this
            // process never fetched: read it right before the overwrite.
            // A failed read falls back to a plain write, like an absent
            // token on first publish.
            match self.remote.fetch().await {
                Ok(Some(snapshot)) => {
                    revision = snapshot.revision.clone();
                    *self.revision.write().await = snapshot.revision;
                }
                Ok(None) => {}
                Err(e) => warn!("revision refresh failed, pushing without token: {}", e),
            }
        }
        match self.remote.push(&territories, revision.as_deref()).await {
            Ok(new_revision) => {
                *self.revision.write().await = new_revision;
                info!("synced {} territories to remote", territories.len());
                self.notify(StoreEvent::Synced);
                SyncStatus::Synced
            }
            Err(e) => {
                warn!("sync failed, local cache remains authoritative: {}", e);
                self.notify(StoreEvent::SyncFailed(e.to_string()));
                SyncStatus::Failed(e.to_string())
            }
        }
    }

    /// Serialize the current collection to an artifact file. Pure with
    /// respect to stored state. Returns the path written.
    pub async fn export_to_file(&self, out: Option<PathBuf>) -> Result<PathBuf> {
        let path = out.unwrap_or_else(|| PathBuf::from(transfer::default_export_name()));
        let territories = self.territories.read().await;
        transfer::export_to_file(&territories, &path)?;
        Ok(path)
    }

    /// Apply a validated import with the caller's explicit resolution,
    /// write through to cache, notify. Returns the new collection size.
    pub async fn apply_import(
        &self,
        pending: PendingImport,
        resolution: ImportResolution,
    ) -> usize {
        let imported = pending.into_territories();
        let count = imported.len();
        let mut territories = self.territories.write().await;
        match resolution {
            ImportResolution::Merge => territories.extend(imported),
            ImportResolution::Replace => *territories = imported,
        }
        self.write_cache(&territories);
        let total = territories.len();
        drop(territories);
        info!("import applied ({:?}): {} records, {} total", resolution, count, total);
        self.notify(StoreEvent::Changed);
        total
    }

    pub fn last_sync(&self) -> Option<DateTime<Utc>> {
        self.cache.last_sync()
    }

    // Mutations write through synchronously; a cache failure does not
    // roll back the in-memory change, matching saveLocal's non-throwing
    // contract.
    fn write_cache(&self, territories: &[Territory]) {
        if let Err(e) = self.cache.save(territories) {
            error!("local save failed: {}", e);
        }
    }

    fn notify(&self, event: StoreEvent) {
        // No subscribers is fine; send only fails when none exist.
        let _ = self.events.send(event);
    }
}
