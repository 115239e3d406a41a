//! Terramark Store - layered persistence gateway
//!
//! Load order is strict: remote authority, then local cache, then the
//! built-in seed. The local cache is the durable source of truth between
//! explicit syncs; the remote store is overwritten in full on sync
//! (last-writer-wins).

pub mod cache;
pub mod remote;
pub mod store;
pub mod transfer;

pub use cache::LocalCache;
pub use remote::{HttpRemote, RemoteAuthority, RemoteSnapshot};
pub use store::{LoadSource, StoreEvent, SyncStatus, TerritoryStore};
pub use transfer::{ImportResolution, PendingImport};
