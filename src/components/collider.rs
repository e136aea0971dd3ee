//! Collision shapes.
//!
//! A [`Collider`] stores its shape in the entity's local space; world-space
//! queries take the entity's [`GlobalTransform2D`]. Three shapes are
//! supported: axis-aligned boxes (rotated with the entity), circles and
//! arbitrary simple polygons (stroke outlines).
//!
//! Narrow-phase tests return a single world-space contact point, which is all
//! the attachment logic needs.

use bevy_ecs::prelude::Component;
use glam::Vec2;

use crate::components::globaltransform2d::GlobalTransform2D;
use crate::geometry;

/// Surface response parameters carried to the physics layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsMaterial {
    pub friction: f32,
    pub bounciness: f32,
}

impl Default for PhysicsMaterial {
    fn default() -> Self {
        Self {
            friction: 0.4,
            bounciness: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColliderShape {
    /// Box of `size` whose min corner sits at `offset` from the origin.
    Aabb { size: Vec2, offset: Vec2 },
    Circle { radius: f32 },
    /// Closed polygon, local coordinates.
    Polygon(Vec<Vec2>),
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct Collider {
    pub shape: ColliderShape,
    pub material: PhysicsMaterial,
    /// Sensors answer point queries but never produce contacts.
    pub sensor: bool,
}

impl Collider {
    /// Box collider with the given size, min corner at the entity origin.
    pub fn rect(width: f32, height: f32) -> Self {
        Self {
            shape: ColliderShape::Aabb {
                size: Vec2::new(width, height),
                offset: Vec2::ZERO,
            },
            material: PhysicsMaterial::default(),
            sensor: false,
        }
    }

    /// Box collider of the given size centered on the entity origin.
    pub fn centered_rect(width: f32, height: f32) -> Self {
        Self::rect(width, height).with_offset(Vec2::new(-width * 0.5, -height * 0.5))
    }

    pub fn circle(radius: f32) -> Self {
        Self {
            shape: ColliderShape::Circle { radius },
            material: PhysicsMaterial::default(),
            sensor: false,
        }
    }

    pub fn polygon(points: Vec<Vec2>) -> Self {
        Self {
            shape: ColliderShape::Polygon(points),
            material: PhysicsMaterial::default(),
            sensor: false,
        }
    }

    /// Move a box collider's min corner. No effect on other shapes.
    pub fn with_offset(mut self, new_offset: Vec2) -> Self {
        if let ColliderShape::Aabb { offset, .. } = &mut self.shape {
            *offset = new_offset;
        }
        self
    }

    pub fn with_material(mut self, material: PhysicsMaterial) -> Self {
        self.material = material;
        self
    }

    pub fn as_sensor(mut self) -> Self {
        self.sensor = true;
        self
    }

    /// Local-space outline of the shape, or `None` for circles.
    pub fn local_polygon(&self) -> Option<Vec<Vec2>> {
        match &self.shape {
            ColliderShape::Aabb { size, offset } => {
                let p0 = *offset;
                let p1 = *offset + *size;
                let min = p0.min(p1);
                let max = p0.max(p1);
                Some(vec![
                    min,
                    Vec2::new(max.x, min.y),
                    max,
                    Vec2::new(min.x, max.y),
                ])
            }
            ColliderShape::Circle { .. } => None,
            ColliderShape::Polygon(points) => Some(points.clone()),
        }
    }

    /// World-space outline of the shape, or `None` for circles.
    pub fn world_polygon(&self, transform: &GlobalTransform2D) -> Option<Vec<Vec2>> {
        self.local_polygon().map(|points| {
            points
                .into_iter()
                .map(|p| transform.transform_point(p))
                .collect()
        })
    }

    /// World-space bounds as `(min, max)`. Empty polygons collapse to the origin.
    pub fn aabb(&self, transform: &GlobalTransform2D) -> (Vec2, Vec2) {
        match &self.shape {
            ColliderShape::Circle { radius } => {
                let r = Vec2::splat(radius.abs());
                (transform.position - r, transform.position + r)
            }
            _ => self
                .world_polygon(transform)
                .and_then(|points| geometry::bounds(&points))
                .unwrap_or((transform.position, transform.position)),
        }
    }

    /// Point containment in world space.
    pub fn contains_point(&self, transform: &GlobalTransform2D, point: Vec2) -> bool {
        let local = transform.inverse_transform_point(point);
        match &self.shape {
            ColliderShape::Aabb { size, offset } => {
                let p0 = *offset;
                let p1 = *offset + *size;
                let min = p0.min(p1);
                let max = p0.max(p1);
                local.x >= min.x && local.x <= max.x && local.y >= min.y && local.y <= max.y
            }
            ColliderShape::Circle { radius } => local.length() <= *radius,
            ColliderShape::Polygon(points) => geometry::contains_point(points, local, 0.0),
        }
    }

    /// Narrow-phase overlap test against another collider.
    ///
    /// Returns the world-space contact point when the shapes touch.
    pub fn contact(
        &self,
        transform: &GlobalTransform2D,
        other: &Collider,
        other_transform: &GlobalTransform2D,
    ) -> Option<Vec2> {
        match (&self.shape, &other.shape) {
            (ColliderShape::Circle { radius: ra }, ColliderShape::Circle { radius: rb }) => {
                circle_circle(transform.position, *ra, other_transform.position, *rb)
            }
            (ColliderShape::Circle { radius }, _) => {
                let poly = other.world_polygon(other_transform)?;
                circle_polygon(transform.position, *radius, &poly)
            }
            (_, ColliderShape::Circle { radius }) => {
                let poly = self.world_polygon(transform)?;
                circle_polygon(other_transform.position, *radius, &poly)
            }
            _ => {
                let a = self.world_polygon(transform)?;
                let b = other.world_polygon(other_transform)?;
                polygon_polygon(&a, &b)
            }
        }
    }
}

fn circle_circle(ca: Vec2, ra: f32, cb: Vec2, rb: f32) -> Option<Vec2> {
    let delta = cb - ca;
    let dist = delta.length();
    if dist > ra + rb {
        return None;
    }
    let dir = delta.try_normalize().unwrap_or(Vec2::X);
    // Middle of the overlapping lens along the center line.
    Some(ca + dir * (ra - (ra + rb - dist) * 0.5))
}

fn circle_polygon(center: Vec2, radius: f32, polygon: &[Vec2]) -> Option<Vec2> {
    if polygon.len() < 3 {
        return None;
    }
    let closest = geometry::closest_point_on_boundary(center, polygon)?;
    if closest.distance(center) <= radius || geometry::contains_point(polygon, center, 0.0) {
        Some(closest)
    } else {
        None
    }
}

/// Contact point of two (possibly concave) polygons: the average of every
/// vertex lying inside the other shape and every edge crossing.
fn polygon_polygon(a: &[Vec2], b: &[Vec2]) -> Option<Vec2> {
    if a.len() < 3 || b.len() < 3 {
        return None;
    }
    let mut points: Vec<Vec2> = Vec::new();
    points.extend(a.iter().copied().filter(|p| geometry::contains_point(b, *p, 0.0)));
    points.extend(b.iter().copied().filter(|p| geometry::contains_point(a, *p, 0.0)));
    for i in 0..a.len() {
        let a1 = a[i];
        let a2 = a[(i + 1) % a.len()];
        for j in 0..b.len() {
            let b1 = b[j];
            let b2 = b[(j + 1) % b.len()];
            if let Some(p) = geometry::segment_intersection(a1, a2, b1, b2) {
                points.push(p);
            }
        }
    }
    if points.is_empty() {
        None
    } else {
        Some(geometry::mean(&points))
    }
}
