//! Sketchplan Core Data Structures
//!
//! This crate contains the data the sketch engine works on:
//! - ConstraintRegion: planning boundary with a containment query
//! - Vertex / Geometry: committed sketch points and finished geometries
//! - GeometryDraft: the in-progress geometry of a single sketch

pub mod draft;
pub mod geometry;
pub mod region;

pub use draft::*;
pub use geometry::*;
pub use region::*;
