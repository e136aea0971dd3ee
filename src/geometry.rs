//! Planar geometry helpers shared by the ribbon builder, colliders and the
//! attachment resolver.
//!
//! Everything here works on plain [`Vec2`] slices so it can be unit tested
//! without an ECS world. Polygons are closed implicitly (the last point
//! connects back to the first) and may have either winding.

use glam::Vec2;

/// Rotate a vector by +90 degrees.
#[inline]
pub fn perp(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// 2D cross product (z component of the 3D cross).
#[inline]
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Rotate `v` by `angle_degrees` counter-clockwise.
pub fn rotate(v: Vec2, angle_degrees: f32) -> Vec2 {
    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Arithmetic mean of a point set. Returns `Vec2::ZERO` for an empty slice.
pub fn mean(points: &[Vec2]) -> Vec2 {
    if points.is_empty() {
        return Vec2::ZERO;
    }
    points.iter().copied().sum::<Vec2>() / points.len() as f32
}

/// Signed area (positive for counter-clockwise winding).
pub fn signed_area(polygon: &[Vec2]) -> f32 {
    if polygon.len() < 3 {
        return 0.0;
    }
    let mut acc = 0.0;
    for i in 0..polygon.len() {
        let a = polygon[i];
        let b = polygon[(i + 1) % polygon.len()];
        acc += cross(a, b);
    }
    acc * 0.5
}

/// Axis-aligned bounds of a point set as `(min, max)`.
pub fn bounds(points: &[Vec2]) -> Option<(Vec2, Vec2)> {
    let first = *points.first()?;
    Some(
        points
            .iter()
            .fold((first, first), |(min, max), p| (min.min(*p), max.max(*p))),
    )
}

/// Closest point to `p` on the segment `a`-`b`.
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Closest point to `p` on the boundary of `polygon`.
pub fn closest_point_on_boundary(p: Vec2, polygon: &[Vec2]) -> Option<Vec2> {
    let n = polygon.len();
    if n == 0 {
        return None;
    }
    if n == 1 {
        return Some(polygon[0]);
    }
    let mut best = polygon[0];
    let mut best_d = f32::INFINITY;
    for i in 0..n {
        let c = closest_point_on_segment(p, polygon[i], polygon[(i + 1) % n]);
        let d = c.distance_squared(p);
        if d < best_d {
            best_d = d;
            best = c;
        }
    }
    Some(best)
}

/// Even-odd point-in-polygon test.
///
/// Points closer than `tolerance` to the boundary are reported as inside.
pub fn contains_point(polygon: &[Vec2], p: Vec2, tolerance: f32) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    if tolerance > 0.0 {
        if let Some(c) = closest_point_on_boundary(p, polygon) {
            if c.distance(p) <= tolerance {
                return true;
            }
        }
    }
    let mut inside = false;
    let n = polygon.len();
    let mut j = n - 1;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Proper intersection point of segments `p1`-`p2` and `q1`-`q2`.
///
/// Collinear overlaps and touching endpoints return `None`.
pub fn segment_intersection(p1: Vec2, p2: Vec2, q1: Vec2, q2: Vec2) -> Option<Vec2> {
    let r = p2 - p1;
    let s = q2 - q1;
    let denom = cross(r, s);
    if denom.abs() <= f32::EPSILON {
        return None;
    }
    let t = cross(q1 - p1, s) / denom;
    let u = cross(q1 - p1, r) / denom;
    const EDGE: f32 = 1e-6;
    if t > EDGE && t < 1.0 - EDGE && u > EDGE && u < 1.0 - EDGE {
        Some(p1 + r * t)
    } else {
        None
    }
}

/// True when no two non-adjacent edges of the closed polygon cross.
pub fn is_simple(polygon: &[Vec2]) -> bool {
    let n = polygon.len();
    if n < 4 {
        return n == 3;
    }
    for i in 0..n {
        let a1 = polygon[i];
        let a2 = polygon[(i + 1) % n];
        for j in (i + 2)..n {
            // The last edge is adjacent to the first one.
            if i == 0 && j == n - 1 {
                continue;
            }
            let b1 = polygon[j];
            let b2 = polygon[(j + 1) % n];
            if segment_intersection(a1, a2, b1, b2).is_some() {
                return false;
            }
        }
    }
    true
}

/// Mass properties of a uniform-density polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassProperties {
    pub mass: f32,
    /// Area centroid in the polygon's own coordinates.
    pub center: Vec2,
    /// Moment of inertia about `center`.
    pub inertia: f32,
}

/// Compute area centroid, mass and polar moment of inertia of a polygon.
///
/// Returns `None` for polygons with (near) zero area.
pub fn polygon_mass_properties(polygon: &[Vec2], density: f32) -> Option<MassProperties> {
    let area = signed_area(polygon);
    if area.abs() <= 1e-9 {
        return None;
    }
    let n = polygon.len();
    let mut c = Vec2::ZERO;
    let mut i_origin = 0.0;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        let k = cross(a, b);
        c += (a + b) * k;
        i_origin += k * (a.dot(a) + a.dot(b) + b.dot(b));
    }
    let center = c / (6.0 * area);
    // Sign of the winding cancels in both ratios above and below.
    let inertia_origin = density * i_origin / 12.0;
    let mass = density * area.abs();
    let inertia = (inertia_origin.abs() - mass * center.length_squared()).max(f32::EPSILON);
    Some(MassProperties {
        mass,
        center,
        inertia,
    })
}
