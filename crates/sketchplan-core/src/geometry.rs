//! Sketch Geometry
//!
//! Vertices committed by a sketch and the finished geometries they seal into.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of geometry a sketch produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeometryKind {
    /// Open path (streets, walking paths)
    Polyline,
    /// Closed area (planted zones)
    Polygon,
}

impl GeometryKind {
    /// Minimum number of vertices a finished geometry of this kind must have
    pub fn min_vertices(&self) -> usize {
        match self {
            GeometryKind::Polyline => 2,
            GeometryKind::Polygon => 3,
        }
    }

    /// Get the display name of the kind
    pub fn name(&self) -> &'static str {
        match self {
            GeometryKind::Polyline => "Polyline",
            GeometryKind::Polygon => "Polygon",
        }
    }
}

/// A committed sketch vertex
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// Position in scene map coordinates
    pub position: Vec2,
    /// Elevation, when the input source reports one
    #[serde(default)]
    pub z: Option<f32>,
    /// Insertion order within the draft
    pub index: usize,
}

impl Vertex {
    /// Create a vertex without elevation
    pub fn new(position: Vec2, index: usize) -> Self {
        Self {
            position,
            z: None,
            index,
        }
    }

    /// Create a vertex with elevation
    pub fn with_z(position: Vec2, z: f32, index: usize) -> Self {
        Self {
            position,
            z: Some(z),
            index,
        }
    }

    /// Position as a 3D point (missing elevation maps to 0)
    pub fn to_world(&self) -> Vec3 {
        self.position.extend(self.z.unwrap_or(0.0))
    }
}

/// A finished, sealed geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Unique identifier
    pub id: Uuid,
    /// Polyline or polygon
    pub kind: GeometryKind,
    /// Vertices in path order; polygons are implicitly closed
    vertices: Vec<Vertex>,
}

impl Geometry {
    /// Create a geometry from already validated vertices
    pub(crate) fn sealed(kind: GeometryKind, vertices: Vec<Vertex>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            vertices,
        }
    }

    /// Get the vertices in path order
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Get the 2D positions in path order
    pub fn positions(&self) -> Vec<Vec2> {
        self.vertices.iter().map(|v| v.position).collect()
    }

    /// Number of vertices
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Whether the geometry has no vertices
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Path length for polylines, perimeter for polygons
    pub fn length(&self) -> f32 {
        let open: f32 = self
            .vertices
            .windows(2)
            .map(|w| (w[1].position - w[0].position).length())
            .sum();

        match (self.kind, self.vertices.first(), self.vertices.last()) {
            (GeometryKind::Polygon, Some(first), Some(last)) => {
                open + (first.position - last.position).length()
            }
            _ => open,
        }
    }

    /// Enclosed area for polygons (shoelace formula), zero for polylines
    pub fn area(&self) -> f32 {
        if self.kind != GeometryKind::Polygon || self.vertices.len() < 3 {
            return 0.0;
        }

        let n = self.vertices.len();
        let twice: f32 = (0..n)
            .map(|i| {
                let a = self.vertices[i].position;
                let b = self.vertices[(i + 1) % n].position;
                a.perp_dot(b)
            })
            .sum();
        twice.abs() * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn geometry(kind: GeometryKind, points: &[(f32, f32)]) -> Geometry {
        let vertices = points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Vertex::new(Vec2::new(x, y), i))
            .collect();
        Geometry::sealed(kind, vertices)
    }

    #[test]
    fn test_min_vertices() {
        assert_eq!(GeometryKind::Polyline.min_vertices(), 2);
        assert_eq!(GeometryKind::Polygon.min_vertices(), 3);
    }

    #[test]
    fn test_polyline_length() {
        let line = geometry(GeometryKind::Polyline, &[(0.0, 0.0), (3.0, 0.0), (3.0, 4.0)]);
        assert_relative_eq!(line.length(), 7.0);
        assert_eq!(line.area(), 0.0);
    }

    #[test]
    fn test_polygon_perimeter_and_area() {
        let square = geometry(
            GeometryKind::Polygon,
            &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
        );
        assert_relative_eq!(square.length(), 40.0);
        assert_relative_eq!(square.area(), 100.0);
    }

    #[test]
    fn test_vertex_world_position() {
        let flat = Vertex::new(Vec2::new(1.0, 2.0), 0);
        assert_eq!(flat.to_world(), Vec3::new(1.0, 2.0, 0.0));

        let raised = Vertex::with_z(Vec2::new(1.0, 2.0), 5.0, 1);
        assert_eq!(raised.to_world(), Vec3::new(1.0, 2.0, 5.0));
    }
}
