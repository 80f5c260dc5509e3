//! Source image decoding and luminance sampling.
//!
//! A decoded image is reduced to a sparse set of [`PixelSample`]s by keeping
//! only the pixels whose red channel exceeds a brightness threshold. Each
//! surviving sample later becomes exactly one particle.
//!
//! # Example
//!
//! ```ignore
//! use lumafield::sampler::{SourceImage, DEFAULT_THRESHOLD};
//!
//! let image = SourceImage::load("portrait.jpg")?;
//! let samples = image.sample(DEFAULT_THRESHOLD);
//! println!("{} of {} pixels kept", samples.len(), image.width() * image.height());
//! ```

use std::path::Path;

use crate::error::LoadError;

/// Red-channel brightness a pixel must strictly exceed to become a particle.
pub const DEFAULT_THRESHOLD: u8 = 34;

/// One pixel selected from the source image.
///
/// Samples are emitted in raster-scan order and that order is preserved all
/// the way into the particle field, so `index` doubles as a stable per-pixel
/// identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelSample {
    /// Linear pixel index, `y * width + x`.
    pub index: u32,
    /// Column within the image.
    pub x: u32,
    /// Row within the image (y grows downward).
    pub y: u32,
    /// Red channel value of the pixel.
    pub intensity: u8,
}

/// A decoded RGBA8 image.
#[derive(Debug, Clone)]
pub struct SourceImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl SourceImage {
    /// Decode an image file from disk.
    ///
    /// Failure here is terminal for the whole effect: no field is built and
    /// nothing renders. There is no retry.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(&bytes)
    }

    /// Decode an image from an in-memory encoded byte buffer.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LoadError> {
        let img = image::load_from_memory(bytes)?.into_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self {
            width,
            height,
            data: img.into_raw(),
        })
    }

    /// Build a source image from raw RGBA pixel data (4 bytes per pixel).
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Self {
        assert_eq!(
            data.len(),
            (width * height * 4) as usize,
            "RGBA data size mismatch"
        );
        Self {
            width,
            height,
            data,
        }
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA pixel data, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Select every pixel whose red channel strictly exceeds `threshold`.
    ///
    /// Pixels at or below the threshold are dropped entirely; they are never
    /// represented as particles. Output order matches the raster scan.
    pub fn sample(&self, threshold: u8) -> Vec<PixelSample> {
        let count = self.width * self.height;
        let mut samples = Vec::new();
        for i in 0..count {
            let intensity = self.data[(i * 4) as usize];
            if intensity <= threshold {
                continue;
            }
            samples.push(PixelSample {
                index: i,
                x: i % self.width,
                y: i / self.width,
                intensity,
            });
        }
        samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_with_reds(reds: &[u8], width: u32, height: u32) -> SourceImage {
        let mut data = Vec::with_capacity(reds.len() * 4);
        for &r in reds {
            data.extend_from_slice(&[r, 0, 0, 255]);
        }
        SourceImage::from_rgba(data, width, height)
    }

    #[test]
    fn test_threshold_is_strict() {
        let image = image_with_reds(&[34, 35, 0, 255], 2, 2);
        let samples = image.sample(34);

        // 34 is at the threshold and must be dropped; 35 and 255 survive.
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].intensity, 35);
        assert_eq!(samples[1].intensity, 255);
    }

    #[test]
    fn test_raster_order_and_coordinates() {
        let image = image_with_reds(&[200, 0, 0, 200, 0, 200], 3, 2);
        let samples = image.sample(DEFAULT_THRESHOLD);

        assert_eq!(samples.len(), 3);
        assert_eq!((samples[0].index, samples[0].x, samples[0].y), (0, 0, 0));
        assert_eq!((samples[1].index, samples[1].x, samples[1].y), (3, 0, 1));
        assert_eq!((samples[2].index, samples[2].x, samples[2].y), (5, 2, 1));
    }

    #[test]
    fn test_only_red_channel_selects() {
        // Bright green/blue but dark red must not survive.
        let data = vec![0, 255, 255, 255, 200, 0, 0, 255];
        let image = SourceImage::from_rgba(data, 2, 1);
        let samples = image.sample(DEFAULT_THRESHOLD);

        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].index, 1);
    }

    #[test]
    fn test_all_dark_image_yields_no_samples() {
        let image = image_with_reds(&[0; 16], 4, 4);
        assert!(image.sample(DEFAULT_THRESHOLD).is_empty());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = SourceImage::load("definitely/not/a/real/path.png").unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }

    #[test]
    fn test_garbage_bytes_are_decode_error() {
        let err = SourceImage::from_bytes(&[0xde, 0xad, 0xbe, 0xef]).unwrap_err();
        assert!(matches!(err, LoadError::ImageDecode(_)));
    }
}
