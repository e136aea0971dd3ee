//! Incremental ribbon mesh built from stroke samples.
//!
//! Every accepted sample contributes a left/right vertex pair offset along
//! the local stroke normal, so vertex `2i` and `2i + 1` always belong to
//! sample `i`. Consecutive pairs are joined by two triangles. The outline
//! (left side forward, right side reversed) doubles as the stroke's
//! collision polygon.
//!
//! # Example
//!
//! ```ignore
//! let mut ribbon = Ribbon::new(0.1, 0.05, 3.0);
//! for x in [0.0, 0.1, 0.2] {
//!     let p = Vec2::new(x, 0.0);
//!     if ribbon.accepts(p) {
//!         ribbon.push_sample(p);
//!     }
//! }
//! assert_eq!(ribbon.vertex_count(), 6);
//! ```

use glam::Vec2;

use crate::geometry::perp;

/// Fraction of the traversed length mapped onto the `v` texture coordinate.
const UV_LENGTH_FACTOR: f32 = 0.2;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ribbon {
    /// Full width of the strip.
    pub thickness: f32,
    /// Samples closer than this to the previous one are rejected.
    pub min_point_distance: f32,
    pub uv_scale: f32,
    samples: Vec<Vec2>,
    vertices: Vec<Vec2>,
    indices: Vec<[u32; 3]>,
    uvs: Vec<Vec2>,
    outline: Vec<Vec2>,
    path_length: f32,
}

impl Ribbon {
    pub fn new(thickness: f32, min_point_distance: f32, uv_scale: f32) -> Self {
        Self {
            thickness,
            min_point_distance,
            uv_scale,
            ..Default::default()
        }
    }

    /// Minimum spacing rule: the first sample is always accepted, later ones
    /// only when strictly farther than `min_point_distance` from the last.
    pub fn accepts(&self, p: Vec2) -> bool {
        match self.samples.last() {
            Some(last) => last.distance(p) > self.min_point_distance,
            None => true,
        }
    }

    /// Append a sample and extend vertices, triangles, UVs and outline.
    ///
    /// Callers are expected to check [`Ribbon::accepts`] first.
    pub fn push_sample(&mut self, p: Vec2) {
        let dir = match self.samples.last() {
            Some(last) => {
                self.path_length += last.distance(p);
                (p - *last).try_normalize().unwrap_or(Vec2::X)
            }
            None => Vec2::X,
        };
        self.samples.push(p);

        let half = perp(dir) * (self.thickness * 0.5);
        self.vertices.push(p + half);
        self.vertices.push(p - half);

        let v = self.path_length * self.uv_scale * UV_LENGTH_FACTOR;
        self.uvs.push(Vec2::new(0.0, v));
        self.uvs.push(Vec2::new(1.0, v));

        if self.samples.len() == 2 {
            // The first pair was laid out along the default direction; align
            // it with the first real segment so the strip does not twist.
            let first = self.samples[0];
            self.vertices[0] = first + half;
            self.vertices[1] = first - half;
        }

        if self.samples.len() > 1 && self.vertices.len() >= 4 {
            let i = (self.vertices.len() - 1) as u32;
            self.indices.push([i - 3, i - 2, i - 1]);
            self.indices.push([i - 1, i - 2, i]);
        }

        self.rebuild_outline();
    }

    fn rebuild_outline(&mut self) {
        self.outline.clear();
        self.outline
            .extend(self.vertices.iter().step_by(2).copied());
        self.outline
            .extend(self.vertices.iter().skip(1).step_by(2).rev().copied());
    }

    /// Shift every point so that `center` becomes the local origin.
    pub fn recenter(&mut self, center: Vec2) {
        for p in self
            .samples
            .iter_mut()
            .chain(self.vertices.iter_mut())
            .chain(self.outline.iter_mut())
        {
            *p -= center;
        }
    }

    /// Centroid of the vertex buffer.
    pub fn vertex_centroid(&self) -> Vec2 {
        crate::geometry::mean(&self.vertices)
    }

    /// Too short to become a body.
    pub fn is_degenerate(&self) -> bool {
        self.samples.len() < 2 || self.vertices.len() < 4
    }

    pub fn samples(&self) -> &[Vec2] {
        &self.samples
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    pub fn indices(&self) -> &[[u32; 3]] {
        &self.indices
    }

    pub fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    pub fn outline(&self) -> &[Vec2] {
        &self.outline
    }

    pub fn path_length(&self) -> f32 {
        self.path_length
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    pub fn last_sample(&self) -> Option<Vec2> {
        self.samples.last().copied()
    }
}
