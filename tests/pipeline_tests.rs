//! Integration tests for the sample → field pipeline.
//!
//! These exercise the public API end to end on small synthetic images,
//! verifying the threshold, ordering and identity guarantees the shader
//! relies on.

use std::collections::HashSet;

use lumafield::{ParticleField, SourceImage, Vec3, DEFAULT_THRESHOLD};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Build a 4x4 RGBA image from per-pixel red values; green/blue/alpha fixed.
fn four_by_four(reds: [u8; 16]) -> SourceImage {
    let mut data = Vec::with_capacity(16 * 4);
    for r in reds {
        data.extend_from_slice(&[r, 128, 64, 255]);
    }
    SourceImage::from_rgba(data, 4, 4)
}

#[test]
fn test_three_bright_pixels_yield_three_particles() {
    // Bright pixels at linear indices 2, 7 and 13; everything else dark.
    let mut reds = [10u8; 16];
    reds[2] = 200;
    reds[7] = 200;
    reds[13] = 200;
    let image = four_by_four(reds);

    let samples = image.sample(DEFAULT_THRESHOLD);
    let field = ParticleField::build(&samples, 4, 4, &mut StdRng::seed_from_u64(11));

    assert_eq!(field.len(), 3);
    assert_eq!(field.source_indices(), &[2, 7, 13]);
    assert_eq!(field.offsets()[0], Vec3::new(2.0, 0.0, 0.0));
    assert_eq!(field.offsets()[1], Vec3::new(3.0, 1.0, 0.0));
    assert_eq!(field.offsets()[2], Vec3::new(1.0, 3.0, 0.0));
}

#[test]
fn test_particle_count_equals_pixels_strictly_above_threshold() {
    let reds: [u8; 16] = [
        0, 34, 35, 255, 34, 34, 100, 1, 200, 34, 33, 36, 255, 0, 34, 50,
    ];
    let image = four_by_four(reds);

    let expected = reds.iter().filter(|&&r| r > DEFAULT_THRESHOLD).count();
    let samples = image.sample(DEFAULT_THRESHOLD);
    assert_eq!(samples.len(), expected);

    let field = ParticleField::build(&samples, 4, 4, &mut StdRng::seed_from_u64(1));
    assert_eq!(field.len(), expected);
}

#[test]
fn test_source_index_is_a_bijection_onto_bright_pixels() {
    let mut reds = [0u8; 16];
    for i in [0, 3, 5, 6, 10, 15] {
        reds[i] = 250;
    }
    let image = four_by_four(reds);

    let samples = image.sample(DEFAULT_THRESHOLD);
    let field = ParticleField::build(&samples, 4, 4, &mut StdRng::seed_from_u64(2));

    let indices: HashSet<u32> = field.source_indices().iter().copied().collect();
    assert_eq!(indices.len(), field.len());
    assert_eq!(indices, HashSet::from([0, 3, 5, 6, 10, 15]));

    // Every particle's offset reproduces its source pixel's coordinates.
    for i in 0..field.len() {
        let record = field.record(i);
        let expected_x = record.source_index % 4;
        let expected_y = record.source_index / 4;
        assert_eq!(record.offset.x, expected_x as f32);
        assert_eq!(record.offset.y, expected_y as f32);
    }
}

#[test]
fn test_fully_dark_image_builds_an_empty_field() {
    let image = four_by_four([0; 16]);
    let samples = image.sample(DEFAULT_THRESHOLD);
    let field = ParticleField::build(&samples, 4, 4, &mut StdRng::seed_from_u64(3));

    assert!(field.is_empty());
    assert!(field.instances().is_empty());
}
