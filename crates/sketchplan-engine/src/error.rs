//! Sketch engine errors

use sketchplan_core::GeometryKind;
use thiserror::Error;

use crate::{OperationId, SessionId, SessionState};

/// Sketch-related errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SketchError {
    /// An event reached a session that cannot take it. Indicates a stream and
    /// session that are out of sync; aborts the owning operation.
    #[error("Session {session} is {state:?} and cannot accept {event}")]
    InvalidTransition {
        session: SessionId,
        state: SessionState,
        event: &'static str,
    },

    /// Finish requested with too few vertices; the session stays active.
    #[error("Cannot finish {kind:?}: needs at least {required} vertices, has {actual}")]
    DegenerateGeometry {
        kind: GeometryKind,
        required: usize,
        actual: usize,
    },

    #[error("Operation {0} has already resolved")]
    OperationClosed(OperationId),

    #[error("Operation was dropped before resolving")]
    OperationDropped,
}

impl SketchError {
    /// Soft validation errors are recovered inside the session
    pub fn is_soft(&self) -> bool {
        matches!(self, SketchError::DegenerateGeometry { .. })
    }
}
