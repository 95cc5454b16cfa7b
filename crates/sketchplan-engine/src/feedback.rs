//! Live feedback observers
//!
//! Sessions notify a [`FeedbackSink`] on every validity recompute so a UI can
//! recolor the in-progress sketch. This is the only effect a session has
//! outside of its own draft.

use std::sync::Arc;

use glam::Vec2;
use parking_lot::Mutex;
use sketchplan_core::{GeometryKind, Validity};

use crate::{SessionId, SessionOutcome, SketchError};

/// What caused a validity recompute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidityTrigger {
    Cursor,
    Commit,
    Removal,
}

/// Validity signal for the in-progress sketch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidityUpdate {
    pub session: SessionId,
    /// Point that was tested; `None` when the draft became empty
    pub probe: Option<Vec2>,
    pub validity: Validity,
    pub trigger: ValidityTrigger,
}

/// Observer for live sketch feedback
pub trait FeedbackSink {
    /// Called on every validity recompute
    fn on_validity(&mut self, update: &ValidityUpdate);

    /// Called when a soft validation error rejected an event
    fn on_rejected(&mut self, _session: SessionId, _error: &SketchError) {}

    fn on_session_started(&mut self, _session: SessionId, _kind: GeometryKind) {}

    fn on_session_ended(&mut self, _session: SessionId, _outcome: &SessionOutcome) {}
}

/// Shared observers, so the owner can inspect state the sink accumulates
impl<T: FeedbackSink + ?Sized> FeedbackSink for Arc<Mutex<T>> {
    fn on_validity(&mut self, update: &ValidityUpdate) {
        self.lock().on_validity(update);
    }

    fn on_rejected(&mut self, session: SessionId, error: &SketchError) {
        self.lock().on_rejected(session, error);
    }

    fn on_session_started(&mut self, session: SessionId, kind: GeometryKind) {
        self.lock().on_session_started(session, kind);
    }

    fn on_session_ended(&mut self, session: SessionId, outcome: &SessionOutcome) {
        self.lock().on_session_ended(session, outcome);
    }
}

/// Sink that ignores every signal
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFeedback;

impl FeedbackSink for NullFeedback {
    fn on_validity(&mut self, _update: &ValidityUpdate) {}
}

/// Sink that records every signal it receives
#[derive(Debug, Clone, Default)]
pub struct RecordingFeedback {
    pub updates: Vec<ValidityUpdate>,
    pub rejections: Vec<(SessionId, SketchError)>,
    pub started: Vec<SessionId>,
    pub ended: Vec<(SessionId, SessionOutcome)>,
}

impl RecordingFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validities in the order they were signaled
    pub fn validities(&self) -> Vec<Validity> {
        self.updates.iter().map(|u| u.validity).collect()
    }

    pub fn last_validity(&self) -> Option<Validity> {
        self.updates.last().map(|u| u.validity)
    }
}

impl FeedbackSink for RecordingFeedback {
    fn on_validity(&mut self, update: &ValidityUpdate) {
        self.updates.push(*update);
    }

    fn on_rejected(&mut self, session: SessionId, error: &SketchError) {
        self.rejections.push((session, error.clone()));
    }

    fn on_session_started(&mut self, session: SessionId, _kind: GeometryKind) {
        self.started.push(session);
    }

    fn on_session_ended(&mut self, session: SessionId, outcome: &SessionOutcome) {
        self.ended.push((session, outcome.clone()));
    }
}
