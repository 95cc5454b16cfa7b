//! Geometry Drafts
//!
//! The mutable, in-progress geometry of one sketch. A draft is sealed into a
//! [`Geometry`] or canceled exactly once, and is read-only afterwards.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Geometry, GeometryKind, Vertex};

/// Draft-related errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("{kind:?} needs at least {required} vertices, draft has {actual}")]
    TooFewVertices {
        kind: GeometryKind,
        required: usize,
        actual: usize,
    },

    #[error("Draft is already {0:?}")]
    NotOpen(DraftState),
}

/// Completion state of a draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DraftState {
    Open,
    Finished,
    Canceled,
}

/// Result of checking a point against the constraint region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Validity {
    /// Nothing to check (empty draft)
    #[default]
    Neutral,
    /// Inside the constraint region
    Valid,
    /// Outside the constraint region
    Violation,
}

impl Validity {
    /// Map a containment answer to a validity
    pub fn from_contains(inside: bool) -> Self {
        if inside {
            Validity::Valid
        } else {
            Validity::Violation
        }
    }

    /// Check if this is a violation
    pub fn is_violation(&self) -> bool {
        matches!(self, Validity::Violation)
    }
}

/// In-progress geometry owned by a single sketch session
#[derive(Debug, Clone)]
pub struct GeometryDraft {
    kind: GeometryKind,
    vertices: Vec<Vertex>,
    validity: Validity,
    state: DraftState,
}

impl GeometryDraft {
    /// Create an empty open draft
    pub fn new(kind: GeometryKind) -> Self {
        Self {
            kind,
            vertices: Vec::new(),
            validity: Validity::Neutral,
            state: DraftState::Open,
        }
    }

    pub fn kind(&self) -> GeometryKind {
        self.kind
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn last_vertex(&self) -> Option<&Vertex> {
        self.vertices.last()
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Validity as last computed by the owning session
    pub fn validity(&self) -> Validity {
        self.validity
    }

    pub fn state(&self) -> DraftState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == DraftState::Open
    }

    /// Whether the draft has enough vertices to be sealed
    pub fn can_seal(&self) -> bool {
        self.vertices.len() >= self.kind.min_vertices()
    }

    /// Append a vertex and return a copy of it
    pub fn push(&mut self, position: Vec2, z: Option<f32>) -> Result<Vertex, GeometryError> {
        self.ensure_open()?;
        let vertex = Vertex {
            position,
            z,
            index: self.vertices.len(),
        };
        self.vertices.push(vertex);
        Ok(vertex)
    }

    /// Remove the most recently committed vertex, if any
    pub fn pop(&mut self) -> Result<Option<Vertex>, GeometryError> {
        self.ensure_open()?;
        Ok(self.vertices.pop())
    }

    pub fn set_validity(&mut self, validity: Validity) {
        self.validity = validity;
    }

    /// Seal the draft into a finished geometry
    ///
    /// A draft with too few vertices stays open.
    pub fn seal(&mut self) -> Result<Geometry, GeometryError> {
        self.ensure_open()?;
        if !self.can_seal() {
            return Err(GeometryError::TooFewVertices {
                kind: self.kind,
                required: self.kind.min_vertices(),
                actual: self.vertices.len(),
            });
        }

        self.state = DraftState::Finished;
        Ok(Geometry::sealed(self.kind, self.vertices.clone()))
    }

    /// Discard the draft
    pub fn cancel(&mut self) -> Result<(), GeometryError> {
        self.ensure_open()?;
        self.state = DraftState::Canceled;
        self.vertices.clear();
        self.validity = Validity::Neutral;
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), GeometryError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(GeometryError::NotOpen(self.state))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_assigns_order() {
        let mut draft = GeometryDraft::new(GeometryKind::Polyline);
        let a = draft.push(Vec2::new(0.0, 0.0), None).unwrap();
        let b = draft.push(Vec2::new(1.0, 0.0), Some(2.0)).unwrap();

        assert_eq!(a.index, 0);
        assert_eq!(b.index, 1);
        assert_eq!(b.z, Some(2.0));
        assert_eq!(draft.len(), 2);
    }

    #[test]
    fn test_pop_on_empty_is_noop() {
        let mut draft = GeometryDraft::new(GeometryKind::Polygon);
        assert_eq!(draft.pop().unwrap(), None);
        assert_eq!(draft.state(), DraftState::Open);
    }

    #[test]
    fn test_seal_requires_min_vertices() {
        let mut draft = GeometryDraft::new(GeometryKind::Polygon);
        draft.push(Vec2::new(0.0, 0.0), None).unwrap();
        draft.push(Vec2::new(1.0, 0.0), None).unwrap();

        let err = draft.seal().unwrap_err();
        assert_eq!(
            err,
            GeometryError::TooFewVertices {
                kind: GeometryKind::Polygon,
                required: 3,
                actual: 2,
            }
        );
        assert!(draft.is_open());

        draft.push(Vec2::new(1.0, 1.0), None).unwrap();
        let polygon = draft.seal().unwrap();
        assert_eq!(polygon.len(), 3);
        assert_eq!(draft.state(), DraftState::Finished);
    }

    #[test]
    fn test_sealed_draft_is_immutable() {
        let mut draft = GeometryDraft::new(GeometryKind::Polyline);
        draft.push(Vec2::ZERO, None).unwrap();
        draft.push(Vec2::ONE, None).unwrap();
        draft.seal().unwrap();

        assert!(draft.push(Vec2::X, None).is_err());
        assert!(draft.pop().is_err());
        assert!(draft.cancel().is_err());
        assert_eq!(draft.len(), 2);
    }

    #[test]
    fn test_cancel_discards_vertices() {
        let mut draft = GeometryDraft::new(GeometryKind::Polyline);
        draft.push(Vec2::ZERO, None).unwrap();
        draft.set_validity(Validity::Violation);
        draft.cancel().unwrap();

        assert_eq!(draft.state(), DraftState::Canceled);
        assert!(draft.is_empty());
        assert_eq!(draft.validity(), Validity::Neutral);
        assert_eq!(draft.seal().unwrap_err(), GeometryError::NotOpen(DraftState::Canceled));
    }
}
