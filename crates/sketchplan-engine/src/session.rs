//! Sketch sessions
//!
//! A session owns one [`GeometryDraft`] and drives it through
//! `Idle -> Active -> {Finished, Canceled}` in response to stream events.
//! Every cursor move, commit and removal re-checks the draft against the
//! constraint region and notifies the feedback sink. Violations are only
//! signaled, never blocked.

use std::fmt;
use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use sketchplan_core::{
    ConstraintRegion, Geometry, GeometryDraft, GeometryError, GeometryKind, Validity,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::feedback::{FeedbackSink, ValidityTrigger, ValidityUpdate};
use crate::{SketchError, SketchEvent};

/// Unique identifier of a sketch session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Idle,
    Active,
    Finished,
    Canceled,
}

impl SessionState {
    /// Terminal states accept no further events
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Finished | SessionState::Canceled)
    }
}

/// How a session ended
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Finished { geometry: Uuid, vertices: usize },
    Canceled,
}

/// Result of a terminal event
#[derive(Debug, Clone, PartialEq)]
pub enum TerminalResult {
    Finished(Geometry),
    Canceled,
}

impl TerminalResult {
    pub fn outcome(&self) -> SessionOutcome {
        match self {
            TerminalResult::Finished(geometry) => SessionOutcome::Finished {
                geometry: geometry.id,
                vertices: geometry.len(),
            },
            TerminalResult::Canceled => SessionOutcome::Canceled,
        }
    }
}

/// Result of feeding one event to a session
#[derive(Debug, Clone, PartialEq)]
pub enum FeedOutcome {
    /// Non-terminal event processed; validity was recomputed
    Validity(ValidityUpdate),
    /// The session reached a terminal state
    Terminal(TerminalResult),
}

/// One in-progress sketch
#[derive(Debug)]
pub struct SketchSession {
    id: SessionId,
    kind: GeometryKind,
    region: Arc<ConstraintRegion>,
    draft: GeometryDraft,
    state: SessionState,
}

impl SketchSession {
    /// Create an idle session
    pub fn new(kind: GeometryKind, region: Arc<ConstraintRegion>) -> Self {
        Self {
            id: SessionId::new(),
            kind,
            region,
            draft: GeometryDraft::new(kind),
            state: SessionState::Idle,
        }
    }

    /// Create a session and activate it with an empty draft
    pub fn start(kind: GeometryKind, region: Arc<ConstraintRegion>) -> Self {
        let mut session = Self::new(kind, region);
        session.state = SessionState::Active;
        session
    }

    /// Move an idle session to active with a fresh draft
    pub fn activate(&mut self) -> Result<(), SketchError> {
        if self.state != SessionState::Idle {
            return Err(self.invalid("start"));
        }
        self.draft = GeometryDraft::new(self.kind);
        self.state = SessionState::Active;
        debug!("Session {} active ({})", self.id, self.kind.name());
        Ok(())
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn kind(&self) -> GeometryKind {
        self.kind
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn region(&self) -> &ConstraintRegion {
        &self.region
    }

    /// Read-only view of the current draft
    pub fn draft(&self) -> &GeometryDraft {
        &self.draft
    }

    /// Validity as last computed
    pub fn validity(&self) -> Validity {
        self.draft.validity()
    }

    /// Process one event.
    ///
    /// `DegenerateGeometry` rejects a finish and leaves the session active;
    /// the sink is told about it as well. Any event reaching an idle or
    /// terminal session is an `InvalidTransition`.
    pub fn feed(
        &mut self,
        event: SketchEvent,
        sink: &mut dyn FeedbackSink,
    ) -> Result<FeedOutcome, SketchError> {
        if self.state != SessionState::Active {
            return Err(self.invalid(event.name()));
        }

        match event {
            SketchEvent::CursorUpdate(point) => {
                let update = self.recheck(Some(point.position), ValidityTrigger::Cursor, sink);
                Ok(FeedOutcome::Validity(update))
            }
            SketchEvent::VertexAdd(point) => {
                let vertex = self
                    .draft
                    .push(point.position, point.z)
                    .map_err(|e| self.draft_error(e, event))?;
                let update =
                    self.recheck(Some(vertex.position), ValidityTrigger::Commit, sink);
                if update.validity.is_violation() {
                    debug!(
                        "Session {} committed vertex {} outside the constraint region",
                        self.id, vertex.index
                    );
                }
                Ok(FeedOutcome::Validity(update))
            }
            SketchEvent::VertexRemove => {
                self.draft.pop().map_err(|e| self.draft_error(e, event))?;
                let probe = self.draft.last_vertex().map(|v| v.position);
                let update = self.recheck(probe, ValidityTrigger::Removal, sink);
                Ok(FeedOutcome::Validity(update))
            }
            SketchEvent::Finish => match self.draft.seal() {
                Ok(geometry) => {
                    self.state = SessionState::Finished;
                    info!(
                        "Session {} finished {} with {} vertices",
                        self.id,
                        self.kind.name(),
                        geometry.len()
                    );
                    Ok(FeedOutcome::Terminal(TerminalResult::Finished(geometry)))
                }
                Err(e) => {
                    let error = self.draft_error(e, event);
                    if error.is_soft() {
                        warn!("Session {}: {}", self.id, error);
                        sink.on_rejected(self.id, &error);
                    }
                    Err(error)
                }
            },
            SketchEvent::Cancel => {
                self.draft.cancel().map_err(|e| self.draft_error(e, event))?;
                self.state = SessionState::Canceled;
                info!("Session {} canceled", self.id);
                Ok(FeedOutcome::Terminal(TerminalResult::Canceled))
            }
        }
    }

    /// Cancel an active session without an event (operation teardown).
    ///
    /// Returns false if the session was not active.
    pub fn cancel_in_flight(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        if self.draft.cancel().is_err() {
            return false;
        }
        self.state = SessionState::Canceled;
        debug!("Session {} canceled by teardown", self.id);
        true
    }

    fn recheck(
        &mut self,
        probe: Option<Vec2>,
        trigger: ValidityTrigger,
        sink: &mut dyn FeedbackSink,
    ) -> ValidityUpdate {
        let validity = match probe {
            Some(point) => Validity::from_contains(self.region.contains(point)),
            None => Validity::Neutral,
        };

        if validity != self.draft.validity() {
            debug!("Session {} validity {:?} -> {:?}", self.id, self.draft.validity(), validity);
        }
        self.draft.set_validity(validity);

        let update = ValidityUpdate {
            session: self.id,
            probe,
            validity,
            trigger,
        };
        sink.on_validity(&update);
        update
    }

    fn invalid(&self, event: &'static str) -> SketchError {
        SketchError::InvalidTransition {
            session: self.id,
            state: self.state,
            event,
        }
    }

    fn draft_error(&self, error: GeometryError, event: SketchEvent) -> SketchError {
        match error {
            GeometryError::TooFewVertices {
                kind,
                required,
                actual,
            } => SketchError::DegenerateGeometry {
                kind,
                required,
                actual,
            },
            GeometryError::NotOpen(_) => self.invalid(event.name()),
        }
    }
}
