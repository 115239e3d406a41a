//! Capture state machine: multi-point polygon definition with undo.
//!
//! The session is transient and owned exclusively by the editor while
//! active; it is either committed (copied into a new territory and
//! appended to the store) or discarded. Point order is never reordered or
//! deduplicated — insertion order IS the shape, and self-intersecting
//! boundaries are accepted as-is.

use std::mem;
use std::sync::Arc;
use terramark_core::{Error, GeoPoint, Result, Territory, TerritoryMeta};
use terramark_store::TerritoryStore;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Transient in-progress polygon definition. Never persisted.
#[derive(Clone, Debug, Default)]
pub struct CaptureSession {
    points: Vec<GeoPoint>,
    segments: Vec<(GeoPoint, GeoPoint)>,
    preview: Option<Vec<GeoPoint>>,
}

impl CaptureSession {
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// Connecting segments between consecutive captured points, drawn
    /// while the polygon is still open.
    pub fn segments(&self) -> &[(GeoPoint, GeoPoint)] {
        &self.segments
    }

    /// Live preview polygon. Present iff the point count has reached the
    /// minimum; no polygon is shown below it.
    pub fn preview(&self) -> Option<&[GeoPoint]> {
        self.preview.as_deref()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The single minimum-vertex predicate used at add, undo, and finish.
    pub fn can_finish(&self) -> bool {
        self.points.len() >= Territory::MIN_BOUNDARY_POINTS
    }

    fn push(&mut self, point: GeoPoint) {
        if let Some(last) = self.points.last() {
            self.segments.push((*last, point));
        }
        self.points.push(point);
        self.refresh_preview();
    }

    fn pop(&mut self) {
        self.points.pop();
        self.segments.pop();
        self.refresh_preview();
    }

    fn refresh_preview(&mut self) {
        self.preview = self.can_finish().then(|| self.points.clone());
    }
}

/// Editor state. Delete-armed is mutually exclusive with capture:
/// entering one exits the other.
#[derive(Debug, Default)]
pub enum EditorMode {
    #[default]
    Idle,
    Capturing(CaptureSession),
    /// Session frozen; further point capture is suspended until commit
    /// or cancel.
    ReadyToCommit(CaptureSession),
    DeleteArmed,
}

/// Session/mode change notifications for the render adapter: any event
/// means a full re-draw of the in-progress capture.
#[derive(Clone, Debug)]
pub enum EditorEvent {
    SessionChanged,
    Committed(String),
    Deleted(String),
}

pub struct Editor {
    mode: EditorMode,
    store: Arc<TerritoryStore>,
    events: broadcast::Sender<EditorEvent>,
}

impl Editor {
    pub fn new(store: Arc<TerritoryStore>) -> Self {
        let (events, _) = broadcast::channel(32);
        Self {
            mode: EditorMode::Idle,
            store,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EditorEvent> {
        self.events.subscribe()
    }

    pub fn mode(&self) -> &EditorMode {
        &self.mode
    }

    pub fn store(&self) -> &Arc<TerritoryStore> {
        &self.store
    }

    /// Live session, whether still capturing or frozen for commit.
    pub fn session(&self) -> Option<&CaptureSession> {
        match &self.mode {
            EditorMode::Capturing(s) | EditorMode::ReadyToCommit(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_delete_armed(&self) -> bool {
        matches!(self.mode, EditorMode::DeleteArmed)
    }

    /// Begin a capture session. Clears any previous session and disarms
    /// delete mode if armed.
    pub fn start(&mut self) {
        debug!("capture started");
        self.mode = EditorMode::Capturing(CaptureSession::default());
        self.notify(EditorEvent::SessionChanged);
    }

    /// Append a point to the live session.
    pub fn add_point(&mut self, point: GeoPoint) -> Result<()> {
        let EditorMode::Capturing(session) = &mut self.mode else {
            return Err(Error::InvalidState("not capturing"));
        };
        session.push(point);
        debug!("point added, {} captured", session.len());
        self.notify(EditorEvent::SessionChanged);
        Ok(())
    }

    /// Remove the most recently added point and its trailing segment.
    /// Undoing the sole remaining point leaves an empty session still in
    /// capture mode; finishing stays disabled below the minimum.
    pub fn undo(&mut self) {
        if let EditorMode::Capturing(session) = &mut self.mode {
            if !session.is_empty() {
                session.pop();
                self.notify(EditorEvent::SessionChanged);
            }
        }
    }

    /// Freeze the session for commit. Permitted only at or above the
    /// minimum point count; otherwise the session is left untouched and
    /// capture remains active.
    pub fn finish(&mut self) -> Result<()> {
        match mem::take(&mut self.mode) {
            EditorMode::Capturing(session) if session.can_finish() => {
                info!("capture finished with {} points", session.len());
                self.mode = EditorMode::ReadyToCommit(session);
                self.notify(EditorEvent::SessionChanged);
                Ok(())
            }
            other => {
                let err = match &other {
                    EditorMode::Capturing(session) => Error::CaptureIncomplete {
                        points: session.len(),
                    },
                    _ => Error::InvalidState("nothing to finish"),
                };
                self.mode = other;
                Err(err)
            }
        }
    }

    /// Build a territory from the frozen boundary plus metadata, append
    /// it to the collection (persisted via the store's write-through),
    /// and return to idle. An empty name rejects with no state change.
    pub async fn commit(&mut self, meta: TerritoryMeta) -> Result<Territory> {
        let EditorMode::ReadyToCommit(session) = &self.mode else {
            return Err(Error::InvalidState("no frozen session to commit"));
        };
        if meta.name.trim().is_empty() {
            return Err(Error::InvalidTerritory("name must not be empty".into()));
        }

        let territory = Territory::new(session.points().to_vec(), meta);
        self.store.append(territory.clone()).await?;
        info!(
            "territory \"{}\" committed with {} points",
            territory.name,
            territory.boundary.len()
        );
        self.mode = EditorMode::Idle;
        self.notify(EditorEvent::Committed(territory.name.clone()));
        self.notify(EditorEvent::SessionChanged);
        Ok(territory)
    }

    /// Discard the session unconditionally. No persistence effect.
    pub fn cancel(&mut self) {
        if matches!(
            self.mode,
            EditorMode::Capturing(_) | EditorMode::ReadyToCommit(_)
        ) {
            debug!("capture cancelled");
            self.mode = EditorMode::Idle;
            self.notify(EditorEvent::SessionChanged);
        }
    }

    /// Arm delete mode. Mutually exclusive with capture: any active
    /// session is discarded.
    pub fn arm_delete(&mut self) {
        debug!("delete mode armed");
        self.mode = EditorMode::DeleteArmed;
        self.notify(EditorEvent::SessionChanged);
    }

    /// Exit delete mode, restoring normal interaction.
    pub fn disarm_delete(&mut self) {
        if self.is_delete_armed() {
            debug!("delete mode disarmed");
            self.mode = EditorMode::Idle;
            self.notify(EditorEvent::SessionChanged);
        }
    }

    pub(crate) fn notify(&self, event: EditorEvent) {
        let _ = self.events.send(event);
    }
}
