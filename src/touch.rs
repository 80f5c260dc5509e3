//! The touch accumulation raster.
//!
//! An offscreen RGBA8 buffer the size of the source image records where the
//! pointer has been. Every interaction paints a soft radial blob; paint is
//! never cleared, so interaction history accumulates for the lifetime of the
//! effect. The shader samples the raster's red channel as a scalar touch
//! strength in [0, 1].

use glam::Vec2;

/// Default blob radius in image pixels.
pub const DEFAULT_TOUCH_RADIUS: f32 = 20.0;

/// Persistent interaction raster, owned exclusively by the frame driver.
#[derive(Debug, Clone)]
pub struct TouchSurface {
    width: u32,
    height: u32,
    data: Vec<u8>,
    dirty: bool,
}

impl TouchSurface {
    /// Create a raster of the given dimensions, fully black (no interaction).
    pub fn new(width: u32, height: u32) -> Self {
        let mut data = vec![0u8; (width * height * 4) as usize];
        for pixel in data.chunks_exact_mut(4) {
            pixel[3] = 255;
        }
        Self {
            width,
            height,
            data,
            dirty: false,
        }
    }

    /// Raster width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Raster height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA pixel data, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Red channel of the pixel at (x, y): the touch strength the shader
    /// will see, in [0, 255].
    pub fn strength_at(&self, x: u32, y: u32) -> u8 {
        self.data[((y * self.width + x) * 4) as usize]
    }

    /// Whether the raster changed since the last [`take_dirty`](Self::take_dirty).
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Drain the dirty flag; returns whether a re-upload is needed.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Paint one interaction blob centered at `point` (image pixel
    /// coordinates).
    ///
    /// The blob is a radial gradient, white with alpha 1 at the center
    /// falling linearly to 0 at `radius`, composited source-over onto the
    /// existing paint. Repeated paints at a point intensify it; they never
    /// reset it. Points outside the raster are silently rejected.
    pub fn record(&mut self, point: Vec2, radius: f32) {
        if point.x < 0.0
            || point.y < 0.0
            || point.x > self.width as f32
            || point.y > self.height as f32
        {
            return;
        }

        let x_min = ((point.x - radius).floor().max(0.0)) as u32;
        let y_min = ((point.y - radius).floor().max(0.0)) as u32;
        let x_max = ((point.x + radius).ceil() as u32).min(self.width);
        let y_max = ((point.y + radius).ceil() as u32).min(self.height);

        for y in y_min..y_max {
            for x in x_min..x_max {
                let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let dist = center.distance(point);
                if dist >= radius {
                    continue;
                }
                let alpha = 1.0 - dist / radius;
                let base = ((y * self.width + x) * 4) as usize;
                for channel in 0..3 {
                    let dst = self.data[base + channel] as f32;
                    let blended = alpha * 255.0 + (1.0 - alpha) * dst;
                    self.data[base + channel] = blended.round() as u8;
                }
            }
        }

        self.dirty = true;
    }
}
