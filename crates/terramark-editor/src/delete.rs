//! Delete-armed flow: confirm-then-remove with an explicit suspend point.
//!
//! Requesting a delete yields a `DeleteRequest` the caller must resolve
//! with a decision; nothing is removed until `Decision::Confirm` comes
//! back. Removal is id-addressed against the store, so a request that
//! outlives an import or other mutation fails with `NotFound` instead of
//! hitting the wrong record. There is no undo for deletion.

use crate::capture::{Editor, EditorEvent};
use terramark_core::{Error, Result, Territory, TerritoryId};

/// A pending removal awaiting the user's decision.
#[derive(Clone, Debug)]
pub struct DeleteRequest {
    pub id: TerritoryId,
    /// Captured for the confirmation prompt.
    pub name: String,
}

/// The binary user decision resolving a `DeleteRequest`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Confirm,
    Abandon,
}

impl Editor {
    /// Look up the target and produce the request to be confirmed. Only
    /// valid while delete mode is armed.
    pub async fn request_delete(&self, id: &TerritoryId) -> Result<DeleteRequest> {
        if !self.is_delete_armed() {
            return Err(Error::InvalidState("delete mode is not armed"));
        }
        let target = self
            .store()
            .get(id)
            .await
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        Ok(DeleteRequest {
            id: target.id,
            name: target.name,
        })
    }

    /// Resolve a pending request. `Abandon` is a no-op; `Confirm` removes
    /// by id and persists via the store.
    pub async fn resolve_delete(
        &self,
        request: DeleteRequest,
        decision: Decision,
    ) -> Result<Option<Territory>> {
        match decision {
            Decision::Abandon => Ok(None),
            Decision::Confirm => {
                let removed = self.store().remove(&request.id).await?;
                self.notify(EditorEvent::Deleted(removed.name.clone()));
                Ok(Some(removed))
            }
        }
    }
}
