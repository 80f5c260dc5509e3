//! Particle field construction.
//!
//! Each [`PixelSample`](crate::sampler::PixelSample) becomes one particle: an
//! offset in image pixel space, a fixed random displacement angle, and the
//! source pixel index the shader uses as a stable random seed. Particles are
//! rendered as instances of one shared quad.
//!
//! The field is immutable after construction. Nothing renders until an image
//! has decoded and the field has been built.

use glam::{Mat4, Vec3};
use rand::Rng;

use crate::sampler::PixelSample;
use crate::shader::{ParticleInstance, QuadVertex};

/// One particle derived from one source pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleRecord {
    /// Rest position in image pixel space (z = 0).
    pub offset: Vec3,
    /// Displacement direction in radians, uniform in [0, π), fixed for the
    /// particle's lifetime.
    pub angle: f32,
    /// Linear index of the source pixel.
    pub source_index: u32,
}

/// The shared unit quad instanced once per particle.
///
/// Corners sit at ±0.5 with UVs spanning the unit square; the index list
/// produces two front-facing CCW triangles.
#[derive(Debug, Clone, Copy)]
pub struct QuadGeometry {
    pub vertices: [QuadVertex; 4],
    pub indices: [u16; 6],
}

impl QuadGeometry {
    pub fn new() -> Self {
        Self {
            vertices: [
                QuadVertex {
                    position: [-0.5, 0.5, 0.0],
                    uv: [0.0, 0.0],
                },
                QuadVertex {
                    position: [0.5, 0.5, 0.0],
                    uv: [1.0, 0.0],
                },
                QuadVertex {
                    position: [-0.5, -0.5, 0.0],
                    uv: [0.0, 1.0],
                },
                QuadVertex {
                    position: [0.5, -0.5, 0.0],
                    uv: [1.0, 1.0],
                },
            ],
            indices: [0, 2, 1, 2, 3, 1],
        }
    }
}

impl Default for QuadGeometry {
    fn default() -> Self {
        Self::new()
    }
}

/// Instanced geometry for every particle of a sampled image.
///
/// Per-instance data is kept as three parallel arrays, co-indexed by
/// particle. Invariant: all three have the same length.
#[derive(Debug, Clone)]
pub struct ParticleField {
    width: u32,
    height: u32,
    offsets: Vec<Vec3>,
    angles: Vec<f32>,
    source_indices: Vec<u32>,
    quad: QuadGeometry,
}

impl ParticleField {
    /// Build the field from sampled pixels, one particle per sample, in
    /// sample order. Single pass, no sorting, no dedup.
    pub fn build<R: Rng>(
        samples: &[PixelSample],
        width: u32,
        height: u32,
        rng: &mut R,
    ) -> Self {
        let mut offsets = Vec::with_capacity(samples.len());
        let mut angles = Vec::with_capacity(samples.len());
        let mut source_indices = Vec::with_capacity(samples.len());

        for sample in samples {
            offsets.push(Vec3::new(sample.x as f32, sample.y as f32, 0.0));
            angles.push(rng.gen_range(0.0..std::f32::consts::PI));
            source_indices.push(sample.index);
        }

        Self {
            width,
            height,
            offsets,
            angles,
            source_indices,
            quad: QuadGeometry::new(),
        }
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Whether the field holds no particles.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Source image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Source image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Rest positions, one per particle.
    pub fn offsets(&self) -> &[Vec3] {
        &self.offsets
    }

    /// Displacement angles, one per particle.
    pub fn angles(&self) -> &[f32] {
        &self.angles
    }

    /// Source pixel indices, one per particle.
    pub fn source_indices(&self) -> &[u32] {
        &self.source_indices
    }

    /// The particle at `index`, assembled from the parallel arrays.
    pub fn record(&self, index: usize) -> ParticleRecord {
        ParticleRecord {
            offset: self.offsets[index],
            angle: self.angles[index],
            source_index: self.source_indices[index],
        }
    }

    /// The shared quad geometry.
    pub fn quad(&self) -> &QuadGeometry {
        &self.quad
    }

    /// World transform centering the field: pixel (w/2, h/2) lands at the
    /// origin.
    pub fn center_transform(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(
            -(self.width as f32) / 2.0,
            -(self.height as f32) / 2.0,
            0.0,
        ))
    }

    /// Interleave the parallel arrays into GPU instance structs, preserving
    /// particle order.
    pub fn instances(&self) -> Vec<ParticleInstance> {
        (0..self.len())
            .map(|i| ParticleInstance {
                offset: self.offsets[i].to_array(),
                angle: self.angles[i],
                pindex: self.source_indices[i] as f32,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn sample(index: u32, width: u32, intensity: u8) -> PixelSample {
        PixelSample {
            index,
            x: index % width,
            y: index / width,
            intensity,
        }
    }

    #[test]
    fn test_one_record_per_sample_in_order() {
        let samples = [sample(1, 4, 200), sample(6, 4, 120), sample(15, 4, 99)];
        let mut rng = StdRng::seed_from_u64(7);
        let field = ParticleField::build(&samples, 4, 4, &mut rng);

        assert_eq!(field.len(), 3);
        assert_eq!(field.offsets().len(), field.angles().len());
        assert_eq!(field.angles().len(), field.source_indices().len());

        assert_eq!(field.record(0).offset, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(field.record(1).offset, Vec3::new(2.0, 1.0, 0.0));
        assert_eq!(field.record(2).offset, Vec3::new(3.0, 3.0, 0.0));
        assert_eq!(field.source_indices(), &[1, 6, 15]);
    }

    #[test]
    fn test_angles_in_half_turn_range() {
        let samples: Vec<_> = (0..256).map(|i| sample(i, 16, 255)).collect();
        let mut rng = StdRng::seed_from_u64(42);
        let field = ParticleField::build(&samples, 16, 16, &mut rng);

        for &angle in field.angles() {
            assert!((0.0..std::f32::consts::PI).contains(&angle));
        }
    }

    #[test]
    fn test_angles_deterministic_for_seeded_rng() {
        let samples: Vec<_> = (0..32).map(|i| sample(i, 8, 255)).collect();
        let a = ParticleField::build(&samples, 8, 4, &mut StdRng::seed_from_u64(9));
        let b = ParticleField::build(&samples, 8, 4, &mut StdRng::seed_from_u64(9));

        assert_eq!(a.angles(), b.angles());
    }

    #[test]
    fn test_source_indices_are_unique() {
        let samples: Vec<_> = (0..100).map(|i| sample(i, 10, 255)).collect();
        let field = ParticleField::build(&samples, 10, 10, &mut StdRng::seed_from_u64(1));

        let unique: HashSet<_> = field.source_indices().iter().collect();
        assert_eq!(unique.len(), field.len());
    }

    #[test]
    fn test_offsets_stay_inside_image_bounds() {
        let samples: Vec<_> = (0..60).map(|i| sample(i, 6, 255)).collect();
        let field = ParticleField::build(&samples, 6, 10, &mut StdRng::seed_from_u64(3));

        for offset in field.offsets() {
            assert!(offset.x >= 0.0 && offset.x < 6.0);
            assert!(offset.y >= 0.0 && offset.y < 10.0);
            assert_eq!(offset.z, 0.0);
        }
    }

    #[test]
    fn test_quad_geometry_constants() {
        let quad = QuadGeometry::new();

        assert_eq!(quad.vertices[0].position, [-0.5, 0.5, 0.0]);
        assert_eq!(quad.vertices[3].position, [0.5, -0.5, 0.0]);
        assert_eq!(quad.vertices[0].uv, [0.0, 0.0]);
        assert_eq!(quad.vertices[3].uv, [1.0, 1.0]);
        assert_eq!(quad.indices, [0, 2, 1, 2, 3, 1]);
    }

    #[test]
    fn test_quad_triangles_wind_counter_clockwise() {
        let quad = QuadGeometry::new();
        for tri in quad.indices.chunks(3) {
            let [a, b, c] = [
                quad.vertices[tri[0] as usize].position,
                quad.vertices[tri[1] as usize].position,
                quad.vertices[tri[2] as usize].position,
            ];
            let signed_area =
                (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0]);
            assert!(signed_area > 0.0);
        }
    }

    #[test]
    fn test_center_transform_moves_image_center_to_origin() {
        let field = ParticleField::build(&[], 320, 180, &mut StdRng::seed_from_u64(0));
        let centered = field.center_transform().transform_point3(Vec3::new(160.0, 90.0, 0.0));
        assert_eq!(centered, Vec3::ZERO);
    }

    #[test]
    fn test_instances_preserve_order_and_values() {
        let samples = [sample(2, 4, 255), sample(9, 4, 255)];
        let field = ParticleField::build(&samples, 4, 4, &mut StdRng::seed_from_u64(5));
        let instances = field.instances();

        assert_eq!(instances.len(), 2);
        assert_eq!(instances[0].offset, [2.0, 0.0, 0.0]);
        assert_eq!(instances[0].pindex, 2.0);
        assert_eq!(instances[1].offset, [1.0, 2.0, 0.0]);
        assert_eq!(instances[1].pindex, 9.0);
        assert_eq!(instances[0].angle, field.angles()[0]);
    }
}
