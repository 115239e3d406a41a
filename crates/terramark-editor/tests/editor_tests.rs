//! Tests for terramark-editor: capture state machine, undo, commit, and
//! the delete-armed flow, wired to a real store over an offline remote.

use async_trait::async_trait;
use std::sync::Arc;
use terramark_core::{Error, GeoPoint, Result, Territory, TerritoryMeta};
use terramark_editor::{Decision, Editor, EditorMode};
use terramark_store::{LocalCache, RemoteAuthority, RemoteSnapshot, TerritoryStore};

struct OfflineRemote;

#[async_trait]
impl RemoteAuthority for OfflineRemote {
    async fn fetch(&self) -> Result<Option<RemoteSnapshot>> {
        Err(Error::remote_unavailable("offline"))
    }

    async fn push(
        &self,
        _territories: &[Territory],
        _revision: Option<&str>,
    ) -> Result<Option<String>> {
        Err(Error::remote_unavailable("offline"))
    }
}

async fn editor(dir: &tempfile::TempDir) -> Editor {
    let cache = LocalCache::new(dir.path().join("territories.json"));
    let store = Arc::new(TerritoryStore::new(cache, Arc::new(OfflineRemote)));
    store.load().await;
    Editor::new(store)
}

fn triangle() -> [GeoPoint; 3] {
    [
        GeoPoint::new(50.44, 30.61),
        GeoPoint::new(50.44, 30.62),
        GeoPoint::new(50.45, 30.615),
    ]
}

// ===========================================================================
// Capture and undo
// ===========================================================================

#[tokio::test]
async fn preview_appears_at_three_points() {
    let dir = tempfile::tempdir().unwrap();
    let mut editor = editor(&dir).await;
    editor.start();

    let [a, b, c] = triangle();
    editor.add_point(a).unwrap();
    let session = editor.session().unwrap();
    assert!(session.preview().is_none());
    assert!(session.segments().is_empty());

    editor.add_point(b).unwrap();
    let session = editor.session().unwrap();
    assert!(session.preview().is_none());
    assert_eq!(session.segments(), &[(a, b)]);

    editor.add_point(c).unwrap();
    let session = editor.session().unwrap();
    assert_eq!(session.preview().unwrap(), &[a, b, c]);
    assert_eq!(session.segments(), &[(a, b), (b, c)]);
    assert!(session.can_finish());
}

#[tokio::test]
async fn undo_clears_preview_below_minimum() {
    let dir = tempfile::tempdir().unwrap();
    let mut editor = editor(&dir).await;
    editor.start();
    for p in triangle() {
        editor.add_point(p).unwrap();
    }
    assert!(editor.session().unwrap().preview().is_some());

    editor.undo();
    let session = editor.session().unwrap();
    assert_eq!(session.len(), 2);
    assert!(session.preview().is_none());
    assert!(!session.can_finish());
    assert!(matches!(editor.mode(), EditorMode::Capturing(_)));
}

#[tokio::test]
async fn undoing_every_point_leaves_empty_capture_session() {
    let dir = tempfile::tempdir().unwrap();
    let mut editor = editor(&dir).await;
    editor.start();
    for p in triangle() {
        editor.add_point(p).unwrap();
    }

    for _ in 0..5 {
        // over-undo: never negative, never leaves capture mode
        editor.undo();
    }
    let session = editor.session().unwrap();
    assert!(session.is_empty());
    assert!(session.segments().is_empty());
    assert!(!session.can_finish());
    assert!(matches!(editor.mode(), EditorMode::Capturing(_)));
    assert!(editor.finish().is_err());
}

#[tokio::test]
async fn finish_requires_minimum_points() {
    let dir = tempfile::tempdir().unwrap();
    let mut editor = editor(&dir).await;
    editor.start();
    let [a, b, _] = triangle();
    editor.add_point(a).unwrap();
    editor.add_point(b).unwrap();

    let err = editor.finish().unwrap_err();
    assert!(matches!(err, Error::CaptureIncomplete { points: 2 }));
    // Session unchanged, capture still active.
    assert_eq!(editor.session().unwrap().len(), 2);
    assert!(matches!(editor.mode(), EditorMode::Capturing(_)));
}

#[tokio::test]
async fn finish_freezes_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let mut editor = editor(&dir).await;
    editor.start();
    for p in triangle() {
        editor.add_point(p).unwrap();
    }
    editor.finish().unwrap();

    assert!(matches!(editor.mode(), EditorMode::ReadyToCommit(_)));
    // Further capture is suspended.
    assert!(editor.add_point(GeoPoint::new(1.0, 2.0)).is_err());
    assert_eq!(editor.session().unwrap().len(), 3);
}

// ===========================================================================
// Commit and cancel
// ===========================================================================

#[tokio::test]
async fn commit_appends_territory_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let mut editor = editor(&dir).await;
    let before = editor.store().len().await;

    editor.start();
    for p in triangle() {
        editor.add_point(p).unwrap();
    }
    editor.finish().unwrap();
    let committed = editor
        .commit(TerritoryMeta::named("Test"))
        .await
        .unwrap();

    assert_eq!(committed.name, "Test");
    assert_eq!(committed.boundary, triangle().to_vec());
    assert!(matches!(editor.mode(), EditorMode::Idle));

    // Exactly one territory appended, boundary order preserved.
    let snapshot = editor.store().snapshot().await;
    assert_eq!(snapshot.len(), before + 1);
    assert_eq!(snapshot.last().unwrap().boundary, triangle().to_vec());

    // The updated collection reached the local cache.
    let cache = LocalCache::new(dir.path().join("territories.json"));
    assert_eq!(cache.load().unwrap(), snapshot);
}

#[tokio::test]
async fn commit_rejects_empty_name_with_no_state_change() {
    let dir = tempfile::tempdir().unwrap();
    let mut editor = editor(&dir).await;
    let before = editor.store().len().await;

    editor.start();
    for p in triangle() {
        editor.add_point(p).unwrap();
    }
    editor.finish().unwrap();

    let err = editor.commit(TerritoryMeta::named("")).await.unwrap_err();
    assert!(matches!(err, Error::InvalidTerritory(_)));
    assert!(matches!(editor.mode(), EditorMode::ReadyToCommit(_)));
    assert_eq!(editor.store().len().await, before);
}

#[tokio::test]
async fn cancel_discards_session_without_persisting() {
    let dir = tempfile::tempdir().unwrap();
    let mut editor = editor(&dir).await;
    let before = editor.store().len().await;

    editor.start();
    for p in triangle() {
        editor.add_point(p).unwrap();
    }
    editor.cancel();

    assert!(matches!(editor.mode(), EditorMode::Idle));
    assert!(editor.session().is_none());
    assert_eq!(editor.store().len().await, before);
}

#[tokio::test]
async fn start_clears_previous_session() {
    let dir = tempfile::tempdir().unwrap();
    let mut editor = editor(&dir).await;
    editor.start();
    editor.add_point(GeoPoint::new(1.0, 2.0)).unwrap();

    editor.start();
    assert!(editor.session().unwrap().is_empty());
}

// ===========================================================================
// Delete-armed mode
// ===========================================================================

#[tokio::test]
async fn capture_and_delete_modes_are_mutually_exclusive() {
    let dir = tempfile::tempdir().unwrap();
    let mut editor = editor(&dir).await;

    editor.start();
    editor.add_point(GeoPoint::new(1.0, 2.0)).unwrap();
    editor.arm_delete();
    assert!(editor.is_delete_armed());
    assert!(editor.session().is_none());

    editor.start();
    assert!(!editor.is_delete_armed());
    assert!(matches!(editor.mode(), EditorMode::Capturing(_)));
}

#[tokio::test]
async fn confirmed_delete_removes_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let mut editor = editor(&dir).await;
    let target = editor.store().find_by_name("Riverside").await.unwrap();

    editor.arm_delete();
    let request = editor.request_delete(&target.id).await.unwrap();
    assert_eq!(request.name, "Riverside");

    let removed = editor
        .resolve_delete(request, Decision::Confirm)
        .await
        .unwrap();
    assert_eq!(removed.unwrap().name, "Riverside");
    assert!(editor.store().find_by_name("Riverside").await.is_none());

    let cache = LocalCache::new(dir.path().join("territories.json"));
    assert_eq!(cache.load().unwrap(), editor.store().snapshot().await);
}

#[tokio::test]
async fn abandoned_delete_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let mut editor = editor(&dir).await;
    let target = editor.store().find_by_name("Riverside").await.unwrap();
    let before = editor.store().len().await;

    editor.arm_delete();
    let request = editor.request_delete(&target.id).await.unwrap();
    let removed = editor
        .resolve_delete(request, Decision::Abandon)
        .await
        .unwrap();

    assert!(removed.is_none());
    assert_eq!(editor.store().len().await, before);
}

#[tokio::test]
async fn request_delete_requires_armed_mode() {
    let dir = tempfile::tempdir().unwrap();
    let editor = editor(&dir).await;
    let target = editor.store().find_by_name("Riverside").await.unwrap();

    let err = editor.request_delete(&target.id).await.unwrap_err();
    assert!(matches!(err, Error::InvalidState(_)));
}
