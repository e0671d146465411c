//! Convex polygon overlap via the Separating Axis Theorem
//!
//! Both polygons must already be in the same reference frame; nothing here
//! applies a transform. Touching edges count as a collision.

use glam::Vec2;

use crate::error::SimError;

/// Edges shorter than this cannot yield a usable normal
const MIN_EDGE_LENGTH: f32 = 1e-6;

/// A validated convex polygon (ordered points, implicitly closed)
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    points: Vec<Vec2>,
}

impl Polygon {
    /// Validate a point list for collision use.
    ///
    /// Rejects fewer than 3 points, non-finite coordinates and zero-length
    /// edges, which would otherwise divide by zero while normalizing.
    pub fn new(points: Vec<Vec2>) -> Result<Self, SimError> {
        if points.len() < 3 {
            return Err(SimError::DegenerateGeometry {
                points: points.len(),
                reason: "fewer than 3 points",
            });
        }
        if points.iter().any(|p| !p.is_finite()) {
            return Err(SimError::DegenerateGeometry {
                points: points.len(),
                reason: "non-finite coordinate",
            });
        }
        let polygon = Self { points };
        if polygon.edges().any(|edge| edge.length() < MIN_EDGE_LENGTH) {
            return Err(SimError::DegenerateGeometry {
                points: polygon.points.len(),
                reason: "zero-length edge",
            });
        }
        Ok(polygon)
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Edge vectors, including the closing edge back to the first point
    fn edges(&self) -> impl Iterator<Item = Vec2> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| self.points[(i + 1) % n] - self.points[i])
    }

    /// Unit normals of every edge, in both directions
    fn axes(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.edges().flat_map(|edge| {
            let normal = Vec2::new(-edge.y, edge.x) / edge.length();
            [normal, -normal]
        })
    }

    /// Projection interval onto an axis
    fn project(&self, axis: Vec2) -> Projection {
        self.points.iter().fold(
            Projection {
                min: f32::INFINITY,
                max: f32::NEG_INFINITY,
            },
            |acc, p| {
                let d = p.dot(axis);
                Projection {
                    min: acc.min.min(d),
                    max: acc.max.max(d),
                }
            },
        )
    }
}

impl TryFrom<Vec<Vec2>> for Polygon {
    type Error = SimError;

    fn try_from(points: Vec<Vec2>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

#[derive(Debug, Clone, Copy)]
struct Projection {
    min: f32,
    max: f32,
}

impl Projection {
    #[inline]
    fn overlaps(self, other: Projection) -> bool {
        self.min <= other.max && self.max >= other.min
    }
}

/// True if the two convex polygons overlap or touch.
///
/// Every edge normal of both shapes is a candidate axis; the first axis with
/// disjoint projections proves separation.
pub fn sat_collision(a: &Polygon, b: &Polygon) -> bool {
    a.axes()
        .chain(b.axes())
        .all(|axis| a.project(axis).overlaps(b.project(axis)))
}

/// Convenience wrapper validating raw point lists first
pub fn sat_collision_points(a: &[Vec2], b: &[Vec2]) -> Result<bool, SimError> {
    let a = Polygon::new(a.to_vec())?;
    let b = Polygon::new(b.to_vec())?;
    Ok(sat_collision(&a, &b))
}
