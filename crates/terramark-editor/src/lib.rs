//! Terramark Editor - interactive territory capture and delete flows
//!
//! The editor turns a sequence of user-supplied map points into a
//! candidate territory: `Idle → Capturing → ReadyToCommit → Idle`.
//! A parallel delete-armed mode is mutually exclusive with capture.

pub mod capture;
pub mod delete;

pub use capture::{CaptureSession, Editor, EditorEvent, EditorMode};
pub use delete::{Decision, DeleteRequest};
