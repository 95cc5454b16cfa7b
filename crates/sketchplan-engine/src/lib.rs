//! Sketchplan Sketch Engine
//!
//! Turns pointer interactions into finished geometries.
//!
//! # Architecture
//!
//! - [`stream::SketchVertexStream`] - typed pointer events for one sketch
//! - [`session::SketchSession`] - state machine owning one geometry draft
//! - [`operation::SketchOperation`] - chains sessions for one user action and
//!   resolves an [`operation::OperationCompletion`] future with the batch
//! - [`feedback::FeedbackSink`] - observer notified on every validity check
//!
//! # Example
//!
//! ```ignore
//! use sketchplan_engine::{start_operation, ScriptedSource, SketchEvent};
//!
//! let source = ScriptedSource::new(vec![vec![
//!     SketchEvent::vertex_add(0.0, 0.0),
//!     SketchEvent::vertex_add(10.0, 0.0),
//!     SketchEvent::Finish,
//! ]]);
//! let (mut operation, handle) =
//!     start_operation(GeometryKind::Polyline, region, source, Box::new(NullFeedback));
//! operation.pump()?;
//! operation.done()?;
//! let result = futures::executor::block_on(handle.completion)?;
//! ```

pub mod error;
pub mod feedback;
pub mod operation;
pub mod session;
pub mod stream;

pub use error::SketchError;
pub use feedback::{FeedbackSink, NullFeedback, RecordingFeedback, ValidityTrigger, ValidityUpdate};
pub use operation::*;
pub use session::*;
pub use stream::*;

pub use sketchplan_core::{
    ConstraintRegion, DraftState, Geometry, GeometryDraft, GeometryKind, Validity, Vertex,
};
