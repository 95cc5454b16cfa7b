//! Constraint Regions
//!
//! A constraint region is the planning boundary a sketch is checked against.
//! Containment uses the even-odd rule. Points lying exactly on a ring edge
//! belong to the inside of that ring, so a point on the outer boundary is
//! contained and a point on a hole boundary is not.
//!
//! Self-intersecting rings are not rejected; they give deterministic but
//! otherwise unspecified answers.

use glam::Vec2;
use serde::{Deserialize, Serialize};

const EDGE_EPSILON: f32 = 1e-5;

/// Axis-aligned bounds of a ring, used to reject far-away points early
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds2D {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds2D {
    fn from_points(points: &[Vec2]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points
            .iter()
            .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p)));
        Some(Self { min, max })
    }

    /// Check whether a point lies inside the bounds (inclusive)
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x - EDGE_EPSILON
            && point.x <= self.max.x + EDGE_EPSILON
            && point.y >= self.min.y - EDGE_EPSILON
            && point.y <= self.max.y + EDGE_EPSILON
    }
}

/// Stored form of a region; bounds are recomputed on load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct RegionData {
    #[serde(default)]
    outer: Vec<Vec2>,
    #[serde(default)]
    holes: Vec<Vec<Vec2>>,
    #[serde(default)]
    unbounded: bool,
}

impl From<RegionData> for ConstraintRegion {
    fn from(data: RegionData) -> Self {
        if data.unbounded {
            Self::unbounded()
        } else {
            Self::with_holes(data.outer, data.holes)
        }
    }
}

impl From<ConstraintRegion> for RegionData {
    fn from(region: ConstraintRegion) -> Self {
        Self {
            outer: region.outer,
            holes: region.holes,
            unbounded: region.unbounded,
        }
    }
}

/// Immutable 2D boundary used for advisory validity checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RegionData", into = "RegionData")]
pub struct ConstraintRegion {
    /// Outer ring, without a duplicated closing vertex
    outer: Vec<Vec2>,
    /// Hole rings, without duplicated closing vertices
    holes: Vec<Vec<Vec2>>,
    /// Bounds of the outer ring
    bounds: Option<Bounds2D>,
    /// Unbounded regions contain every point
    unbounded: bool,
}

impl ConstraintRegion {
    /// Create a region from an outer ring
    pub fn new(outer: impl Into<Vec<Vec2>>) -> Self {
        Self::with_holes(outer, Vec::new())
    }

    /// Create a region from an outer ring and hole rings
    pub fn with_holes(outer: impl Into<Vec<Vec2>>, holes: Vec<Vec<Vec2>>) -> Self {
        let outer = normalize_ring(outer.into());
        let holes: Vec<Vec<Vec2>> = holes.into_iter().map(normalize_ring).collect();
        let bounds = Bounds2D::from_points(&outer);
        Self {
            outer,
            holes,
            bounds,
            unbounded: false,
        }
    }

    /// Create an axis-aligned rectangular region
    pub fn rect(min: Vec2, max: Vec2) -> Self {
        Self::new(vec![
            min,
            Vec2::new(max.x, min.y),
            max,
            Vec2::new(min.x, max.y),
        ])
    }

    /// A region without a boundary; every point is contained
    pub fn unbounded() -> Self {
        Self {
            outer: Vec::new(),
            holes: Vec::new(),
            bounds: None,
            unbounded: true,
        }
    }

    /// Whether this region has no boundary
    pub fn is_unbounded(&self) -> bool {
        self.unbounded
    }

    /// Get the outer ring
    pub fn outer(&self) -> &[Vec2] {
        &self.outer
    }

    /// Get the hole rings
    pub fn holes(&self) -> &[Vec<Vec2>] {
        &self.holes
    }

    /// Get the bounds of the outer ring
    pub fn bounds(&self) -> Option<Bounds2D> {
        self.bounds
    }

    /// Check whether a point lies inside the outer ring and outside every hole
    pub fn contains(&self, point: Vec2) -> bool {
        if self.unbounded {
            return true;
        }

        let Some(bounds) = self.bounds else {
            return false;
        };
        if self.outer.len() < 3 || !bounds.contains(point) {
            return false;
        }

        if !ring_contains(&self.outer, point) {
            return false;
        }

        !self.holes.iter().any(|hole| {
            hole.len() >= 3 && (on_ring_boundary(hole, point) || ring_contains(hole, point))
        })
    }
}

/// Drop a duplicated closing vertex so every ring is implicitly closed
fn normalize_ring(mut ring: Vec<Vec2>) -> Vec<Vec2> {
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    ring
}

/// Even-odd ray cast; points on an edge count as inside
fn ring_contains(ring: &[Vec2], point: Vec2) -> bool {
    if on_ring_boundary(ring, point) {
        return true;
    }

    let mut inside = false;
    let mut previous = ring[ring.len() - 1];

    for &current in ring {
        let crosses = (current.y > point.y) != (previous.y > point.y);
        if crosses {
            let x_at_y =
                (previous.x - current.x) * (point.y - current.y) / (previous.y - current.y)
                    + current.x;
            if point.x < x_at_y {
                inside = !inside;
            }
        }
        previous = current;
    }

    inside
}

fn on_ring_boundary(ring: &[Vec2], point: Vec2) -> bool {
    let mut previous = ring[ring.len() - 1];
    for &current in ring {
        if point_to_segment_distance(point, previous, current) <= EDGE_EPSILON {
            return true;
        }
        previous = current;
    }
    false
}

/// Calculate distance from a point to a line segment
fn point_to_segment_distance(point: Vec2, start: Vec2, end: Vec2) -> f32 {
    let segment = end - start;
    let len_sq = segment.length_squared();

    if len_sq < 1e-10 {
        return (point - start).length();
    }

    let t = ((point - start).dot(segment) / len_sq).clamp(0.0, 1.0);
    (point - (start + segment * t)).length()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> ConstraintRegion {
        ConstraintRegion::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ])
    }

    #[test]
    fn test_square_containment() {
        let region = square();
        assert!(region.contains(Vec2::new(5.0, 5.0)));
        assert!(!region.contains(Vec2::new(20.0, 20.0)));
        assert!(!region.contains(Vec2::new(-0.5, 5.0)));
    }

    #[test]
    fn test_contains_is_deterministic() {
        let region = square();
        let probe = Vec2::new(3.3, 7.1);
        let first = region.contains(probe);
        for _ in 0..100 {
            assert_eq!(region.contains(probe), first);
        }
    }

    #[test]
    fn test_explicitly_closed_ring() {
        let region = ConstraintRegion::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(0.0, 0.0),
        ]);
        assert_eq!(region.outer().len(), 4);
        assert_eq!(region, square());
    }

    #[test]
    fn test_boundary_points() {
        let region = square();
        assert!(region.contains(Vec2::new(0.0, 5.0)));
        assert!(region.contains(Vec2::new(10.0, 10.0)));
    }

    #[test]
    fn test_holes_are_excluded() {
        let region = ConstraintRegion::with_holes(
            square().outer().to_vec(),
            vec![vec![
                Vec2::new(4.0, 4.0),
                Vec2::new(6.0, 4.0),
                Vec2::new(6.0, 6.0),
                Vec2::new(4.0, 6.0),
            ]],
        );
        assert!(!region.contains(Vec2::new(5.0, 5.0)));
        assert!(!region.contains(Vec2::new(4.0, 5.0)));
        assert!(region.contains(Vec2::new(2.0, 2.0)));
    }

    #[test]
    fn test_concave_ring() {
        // U shape opening upwards
        let region = ConstraintRegion::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(9.0, 0.0),
            Vec2::new(9.0, 9.0),
            Vec2::new(6.0, 9.0),
            Vec2::new(6.0, 3.0),
            Vec2::new(3.0, 3.0),
            Vec2::new(3.0, 9.0),
            Vec2::new(0.0, 9.0),
        ]);
        assert!(region.contains(Vec2::new(1.5, 8.0)));
        assert!(!region.contains(Vec2::new(4.5, 8.0)));
        assert!(region.contains(Vec2::new(4.5, 1.5)));
    }

    #[test]
    fn test_degenerate_and_unbounded() {
        let line = ConstraintRegion::new(vec![Vec2::ZERO, Vec2::ONE]);
        assert!(!line.contains(Vec2::new(0.5, 0.5)));

        let empty = ConstraintRegion::new(Vec::new());
        assert!(!empty.contains(Vec2::ZERO));

        let everywhere = ConstraintRegion::unbounded();
        assert!(everywhere.is_unbounded());
        assert!(everywhere.contains(Vec2::new(1e6, -1e6)));
    }

    #[test]
    fn test_loaded_region_is_normalized() {
        let region: ConstraintRegion = serde_json::from_str(
            r#"{"outer": [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]]}"#,
        )
        .unwrap();
        assert_eq!(region, square());
        assert_eq!(
            region.bounds(),
            Some(Bounds2D {
                min: Vec2::ZERO,
                max: Vec2::new(10.0, 10.0),
            })
        );
        assert!(region.contains(Vec2::new(5.0, 5.0)));

        // Stored bounds are not trusted
        let stale: ConstraintRegion = serde_json::from_str(
            r#"{"outer": [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]], "bounds": null}"#,
        )
        .unwrap();
        assert!(stale.contains(Vec2::new(5.0, 5.0)));

        let text = serde_json::to_string(&ConstraintRegion::unbounded()).unwrap();
        let everywhere: ConstraintRegion = serde_json::from_str(&text).unwrap();
        assert!(everywhere.is_unbounded());
    }

    #[test]
    fn test_rect() {
        let region = ConstraintRegion::rect(Vec2::new(-5.0, -5.0), Vec2::new(5.0, 5.0));
        assert!(region.contains(Vec2::ZERO));
        assert!(!region.contains(Vec2::new(6.0, 0.0)));
    }
}
