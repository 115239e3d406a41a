//! Remote authority — the network-backed store, source of truth when
//! reachable.
//!
//! The HTTP shape matches JSONBin-style collection endpoints: GET returns
//! either the raw array or a `{ "record": [...] }` wrapper, PUT replaces
//! the whole collection. Revisioned stores get their optimistic-concurrency
//! token via ETag/If-Match. Every failure maps to `RemoteUnavailable`; the
//! gateway treats that as a cache-miss equivalent.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use terramark_core::{Collection, Error, Result, StoreConfig, Territory};
use tracing::{debug, error};

/// A read of the remote collection plus its revision token, if the
/// backing store emits one.
#[derive(Debug, Clone)]
pub struct RemoteSnapshot {
    pub territories: Collection,
    pub revision: Option<String>,
}

#[async_trait]
pub trait RemoteAuthority: Send + Sync {
    /// True when the backing store enforces optimistic concurrency and
    /// writes must carry a prior read's revision token.
    fn requires_revision(&self) -> bool {
        false
    }

    /// Fetch the full collection. `Ok(None)` means reachable but empty.
    async fn fetch(&self) -> Result<Option<RemoteSnapshot>>;

    /// Replace the remote collection in full (last-writer-wins). Returns
    /// the new revision token when the store emits one.
    async fn push(
        &self,
        territories: &[Territory],
        revision: Option<&str>,
    ) -> Result<Option<String>>;
}

pub struct HttpRemote {
    client: Client,
    endpoint: String,
    api_key: String,
    revisioned: bool,
}

impl HttpRemote {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            revisioned: false,
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.remote.endpoint.clone(), config.api_key()).revisioned(config.remote.revisioned)
    }

    pub fn revisioned(mut self, yes: bool) -> Self {
        self.revisioned = yes;
        self
    }

    fn require_endpoint(&self) -> Result<&str> {
        if self.endpoint.is_empty() {
            return Err(Error::remote_unavailable("no remote endpoint configured"));
        }
        Ok(&self.endpoint)
    }
}

fn etag(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(reqwest::header::ETAG)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

#[async_trait]
impl RemoteAuthority for HttpRemote {
    fn requires_revision(&self) -> bool {
        self.revisioned
    }

    async fn fetch(&self) -> Result<Option<RemoteSnapshot>> {
        let endpoint = self.require_endpoint()?;

        let response = self
            .client
            .get(endpoint)
            .header("X-Master-Key", &self.api_key)
            .header("X-Bin-Meta", "false")
            .send()
            .await
            .map_err(|e| Error::remote_unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("remote fetch failed {}: {}", status, body);
            return Err(Error::remote_unavailable(format!("{}: {}", status, body)));
        }

        let revision = etag(&response);
        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::remote_unavailable(e.to_string()))?;

        // Raw array, or a wrapper object with the collection under `record`.
        let record = match body {
            Value::Object(mut obj) => obj.remove("record").unwrap_or(Value::Null),
            other => other,
        };
        if record.is_null() {
            return Ok(None);
        }

        let territories: Collection = serde_json::from_value(record)
            .map_err(|e| Error::remote_unavailable(format!("unexpected payload: {}", e)))?;
        if territories.is_empty() {
            return Ok(None);
        }

        debug!("fetched {} territories from remote", territories.len());
        Ok(Some(RemoteSnapshot {
            territories,
            revision,
        }))
    }

    async fn push(
        &self,
        territories: &[Territory],
        revision: Option<&str>,
    ) -> Result<Option<String>> {
        let endpoint = self.require_endpoint()?;

        let mut request = self
            .client
            .put(endpoint)
            .header("X-Master-Key", &self.api_key)
            .json(&territories);
        if self.revisioned {
            if let Some(rev) = revision {
                request = request.header(reqwest::header::IF_MATCH, rev);
            }
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::remote_unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("remote push failed {}: {}", status, body);
            if status.as_u16() == 412 {
                return Err(Error::remote_unavailable(format!(
                    "revision conflict: {}",
                    body
                )));
            }
            return Err(Error::remote_unavailable(format!("{}: {}", status, body)));
        }

        debug!("pushed {} territories to remote", territories.len());
        Ok(etag(&response))
    }
}
