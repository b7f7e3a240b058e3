//! Collision geometry for circles, thick segments and convex polygons
//!
//! Everything here is a pure function of its inputs. Degenerate distances are
//! floored instead of dividing by zero, so callers never see NaN normals.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::CONTACT_EPSILON;

/// Obstacle silhouettes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shape {
    Circle,
    Triangle,
    Diamond,
    Hexagon,
}

impl Shape {
    pub const ALL: [Shape; 4] = [Shape::Triangle, Shape::Diamond, Shape::Hexagon, Shape::Circle];
}

/// A line segment, optionally thickened into a strip
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub a: Vec2,
    pub b: Vec2,
    /// Full width of the strip (0 = infinitely thin)
    pub thickness: f32,
}

impl Segment {
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b, thickness: 0.0 }
    }

    pub fn with_thickness(mut self, thickness: f32) -> Self {
        self.thickness = thickness;
        self
    }

    /// Closest point on the segment to `p`
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        let ab = self.b - self.a;
        let len_sq = ab.length_squared();
        if len_sq < CONTACT_EPSILON * CONTACT_EPSILON {
            return self.a;
        }
        let t = ((p - self.a).dot(ab) / len_sq).clamp(0.0, 1.0);
        self.a + ab * t
    }

    /// Unit normal on the left of a→b (up for a left-to-right segment in screen space)
    fn left_normal(&self) -> Vec2 {
        let ab = self.b - self.a;
        let n = Vec2::new(ab.y, -ab.x);
        if n.length_squared() < CONTACT_EPSILON * CONTACT_EPSILON {
            Vec2::NEG_Y
        } else {
            n.normalize()
        }
    }
}

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Contact point on the other body's surface
    pub point: Vec2,
    /// Unit normal pointing toward the circle center
    pub normal: Vec2,
    /// Overlap depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Unit vector, zero-length input treated as length 1
#[inline]
pub fn normalize(v: Vec2) -> Vec2 {
    let len = v.length();
    if len > 0.0 { v / len } else { v }
}

/// Circle against a (thick) segment
///
/// The circle collides when its center is within `radius + thickness/2` of
/// the nearest point of the segment.
pub fn circle_segment_collision(center: Vec2, radius: f32, segment: &Segment) -> CollisionResult {
    let closest = segment.closest_point(center);
    let delta = center - closest;
    let dist_sq = delta.length_squared();
    let allowed = radius + segment.thickness * 0.5;

    if dist_sq > allowed * allowed {
        return CollisionResult::miss();
    }

    let dist = dist_sq.sqrt();
    let normal = if dist < CONTACT_EPSILON {
        // Center sits on the segment itself
        segment.left_normal()
    } else {
        delta / dist
    };

    CollisionResult {
        hit: true,
        point: closest,
        normal,
        penetration: (allowed - dist).max(0.0),
    }
}

/// Circle `a` against circle `b`, normal pointing from `b` toward `a`
pub fn circle_circle_collision(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> CollisionResult {
    let delta = a - b;
    let dist_sq = delta.length_squared();
    let reach = radius_a + radius_b;

    if dist_sq > reach * reach {
        return CollisionResult::miss();
    }

    let dist = dist_sq.sqrt();
    let normal = if dist < CONTACT_EPSILON {
        Vec2::X
    } else {
        delta / dist
    };

    CollisionResult {
        hit: true,
        point: b + normal * radius_b,
        normal,
        penetration: reach - dist,
    }
}

/// Deepest edge hit of a circle against a closed polygon outline
///
/// A circle near a vertex is within reach of two edges at once; the edge
/// with the largest penetration wins (first one on ties).
pub fn polygon_collision_info(center: Vec2, radius: f32, points: &[Vec2]) -> Option<CollisionResult> {
    if points.len() < 2 {
        return None;
    }

    let mut best: Option<CollisionResult> = None;
    for (i, &a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        let info = circle_segment_collision(center, radius, &Segment::new(a, b));
        if info.hit && best.is_none_or(|prev| info.penetration > prev.penetration) {
            best = Some(info);
        }
    }
    best
}

/// World-space outline for a shape, `None` for circles
pub fn compute_shape_points(shape: Shape, center: Vec2, size: f32, rotation: f32) -> Option<Vec<Vec2>> {
    let s = size;
    let local: Vec<Vec2> = match shape {
        Shape::Circle => return None,
        Shape::Triangle => vec![
            Vec2::new(0.0, -s),
            Vec2::new(-s * 0.866, s * 0.5),
            Vec2::new(s * 0.866, s * 0.5),
        ],
        Shape::Diamond => vec![
            Vec2::new(0.0, -s),
            Vec2::new(-s, 0.0),
            Vec2::new(0.0, s),
            Vec2::new(s, 0.0),
        ],
        Shape::Hexagon => (0..6)
            .map(|i| Vec2::from_angle(i as f32 * std::f32::consts::TAU / 6.0) * s)
            .collect(),
    };

    let rot = Vec2::from_angle(rotation);
    Some(local.into_iter().map(|p| center + rot.rotate(p)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_zero_is_safe() {
        assert_eq!(normalize(Vec2::ZERO), Vec2::ZERO);
        let n = normalize(Vec2::new(3.0, 4.0));
        assert!((n - Vec2::new(0.6, 0.8)).length() < 1e-6);
    }

    #[test]
    fn test_circle_above_flat_segment() {
        let seg = Segment::new(Vec2::new(-100.0, 0.0), Vec2::new(100.0, 0.0)).with_thickness(20.0);

        // 15 above the centerline, radius 10, allowed reach 20
        let result = circle_segment_collision(Vec2::new(0.0, -15.0), 10.0, &seg);
        assert!(result.hit);
        assert!((result.normal - Vec2::NEG_Y).length() < 1e-6);
        assert!((result.penetration - 5.0).abs() < 1e-5);
        assert_eq!(result.point, Vec2::ZERO);

        let result = circle_segment_collision(Vec2::new(0.0, -25.0), 10.0, &seg);
        assert!(!result.hit);
    }

    #[test]
    fn test_circle_past_segment_end_uses_endpoint() {
        let seg = Segment::new(Vec2::ZERO, Vec2::new(10.0, 0.0));
        let result = circle_segment_collision(Vec2::new(13.0, 0.0), 5.0, &seg);
        assert!(result.hit);
        assert_eq!(result.point, Vec2::new(10.0, 0.0));
        assert!((result.normal - Vec2::X).length() < 1e-6);
    }

    #[test]
    fn test_center_on_segment_gets_unit_normal() {
        let seg = Segment::new(Vec2::ZERO, Vec2::new(10.0, 0.0));
        let result = circle_segment_collision(Vec2::new(5.0, 0.0), 2.0, &seg);
        assert!(result.hit);
        assert!((result.normal.length() - 1.0).abs() < 1e-6);
        assert!((result.penetration - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_segment_behaves_like_point() {
        let p = Vec2::new(4.0, 4.0);
        let seg = Segment::new(p, p);
        let result = circle_segment_collision(Vec2::new(4.0, 1.0), 5.0, &seg);
        assert!(result.hit);
        assert!((result.normal - Vec2::NEG_Y).length() < 1e-6);
        assert!((result.penetration - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_circle_circle() {
        let result = circle_circle_collision(Vec2::new(15.0, 0.0), 10.0, Vec2::ZERO, 10.0);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::X);
        assert!((result.penetration - 5.0).abs() < 1e-6);

        let coincident = circle_circle_collision(Vec2::ONE, 1.0, Vec2::ONE, 1.0);
        assert!(coincident.hit);
        assert_eq!(coincident.normal, Vec2::X);

        assert!(!circle_circle_collision(Vec2::new(30.0, 0.0), 10.0, Vec2::ZERO, 10.0).hit);
    }

    #[test]
    fn test_circle_has_no_outline() {
        assert!(compute_shape_points(Shape::Circle, Vec2::ZERO, 10.0, 0.3).is_none());
    }

    #[test]
    fn test_shape_vertex_counts_and_radius() {
        let center = Vec2::new(50.0, 80.0);
        for (shape, count) in [(Shape::Triangle, 3), (Shape::Diamond, 4), (Shape::Hexagon, 6)] {
            let points = compute_shape_points(shape, center, 20.0, 0.7).unwrap();
            assert_eq!(points.len(), count);
            for p in points {
                let r = (p - center).length();
                assert!(r <= 20.0 + 1e-3, "{:?} vertex outside size: {}", shape, r);
            }
        }
    }

    #[test]
    fn test_diamond_rotation() {
        let points = compute_shape_points(Shape::Diamond, Vec2::ZERO, 10.0, std::f32::consts::FRAC_PI_2).unwrap();
        // Top vertex (0,-10) rotated a quarter turn lands on (10,0)
        assert!((points[0] - Vec2::new(10.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_polygon_deepest_edge_wins() {
        // Square of half-size 10; circle near the top-right corner but closer to the right edge
        let square = [
            Vec2::new(-10.0, -10.0),
            Vec2::new(10.0, -10.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(-10.0, 10.0),
        ];
        let center = Vec2::new(12.0, -7.0);
        let result = polygon_collision_info(center, 5.0, &square).unwrap();
        // Right edge: distance 2 -> penetration 3; top edge only reaches the corner (~3.6 away)
        assert!((result.penetration - 3.0).abs() < 1e-5);
        assert!((result.normal - Vec2::X).length() < 1e-5);
    }

    #[test]
    fn test_polygon_miss() {
        let tri = compute_shape_points(Shape::Triangle, Vec2::ZERO, 10.0, 0.0).unwrap();
        assert!(polygon_collision_info(Vec2::new(100.0, 0.0), 5.0, &tri).is_none());
        assert!(polygon_collision_info(Vec2::ZERO, 5.0, &[]).is_none());
    }

    proptest! {
        #[test]
        fn prop_segment_hit_has_unit_normal(
            ax in -200.0f32..200.0, ay in -200.0f32..200.0,
            bx in -200.0f32..200.0, by in -200.0f32..200.0,
            cx in -200.0f32..200.0, cy in -200.0f32..200.0,
            radius in 0.5f32..60.0, thickness in 0.0f32..120.0,
        ) {
            let seg = Segment::new(Vec2::new(ax, ay), Vec2::new(bx, by)).with_thickness(thickness);
            let result = circle_segment_collision(Vec2::new(cx, cy), radius, &seg);
            if result.hit {
                prop_assert!(result.penetration >= 0.0);
                prop_assert!((result.normal.length() - 1.0).abs() < 1e-3);
            }
        }

        #[test]
        fn prop_polygon_returns_deepest_edge(
            cx in -60.0f32..60.0, cy in -60.0f32..60.0,
            radius in 1.0f32..40.0, rotation in -3.2f32..3.2,
            shape_idx in 0usize..3,
        ) {
            let shape = [Shape::Triangle, Shape::Diamond, Shape::Hexagon][shape_idx];
            let points = compute_shape_points(shape, Vec2::ZERO, 30.0, rotation).unwrap();
            let center = Vec2::new(cx, cy);

            let deepest = (0..points.len())
                .map(|i| {
                    let seg = Segment::new(points[i], points[(i + 1) % points.len()]);
                    circle_segment_collision(center, radius, &seg)
                })
                .filter(|r| r.hit)
                .map(|r| r.penetration)
                .fold(None, |acc: Option<f32>, p| Some(acc.map_or(p, |a| a.max(p))));

            let result = polygon_collision_info(center, radius, &points);
            match (result, deepest) {
                (Some(r), Some(p)) => prop_assert!((r.penetration - p).abs() < 1e-5),
                (None, None) => {}
                _ => prop_assert!(false, "hit/miss disagreement"),
            }
        }
    }
}
