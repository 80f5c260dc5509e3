//! Per-frame sequencing.
//!
//! The driver owns the frame context (camera, touch raster, pointer
//! projection and the time accumulator) and ties one tick together: advance
//! time, apply the pending pointer interaction, then hand off to the
//! host-supplied present callback. Nothing here is global; every component
//! receives the state it needs explicitly.

use glam::Vec2;

use crate::camera::Camera;
use crate::interact::InteractionMapper;
use crate::touch::TouchSurface;

/// Time advance per tick, in seconds.
///
/// Fixed-step on purpose: animation speed is tied to the tick rate, not the
/// wall clock, matching the effect's original pacing.
pub const FIXED_TIME_STEP: f32 = 0.016;

/// Drives one frame of the effect per tick.
pub struct FrameDriver {
    camera: Camera,
    touch: TouchSurface,
    mapper: InteractionMapper,
    touch_radius: f32,
    time: f32,
    pending_pointer: Option<Vec2>,
}

impl FrameDriver {
    /// Create a driver for a touch raster and camera.
    pub fn new(camera: Camera, touch: TouchSurface, touch_radius: f32) -> Self {
        let mapper = InteractionMapper::new(touch.width(), touch.height());
        Self {
            camera,
            touch,
            mapper,
            touch_radius,
            time: 0.0,
            pending_pointer: None,
        }
    }

    /// Record the latest pointer position in NDC.
    ///
    /// At most one interaction is held between ticks; a newer position
    /// replaces the older one (last write wins, no queue).
    pub fn pointer_moved(&mut self, ndc: Vec2) {
        self.pending_pointer = Some(ndc);
    }

    /// Apply a viewport resize. Touches only camera state; safe at any tick
    /// boundary.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.camera.set_aspect(aspect);
    }

    /// The camera as of the last tick.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Monotonic effect time in seconds.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// The touch raster.
    pub fn touch(&self) -> &TouchSurface {
        &self.touch
    }

    /// Run one tick: advance time, drain the pending pointer into the touch
    /// raster, then present.
    ///
    /// `present` receives the new time, the camera, and the touch surface
    /// (dirty if this tick painted).
    pub fn tick<T, E>(
        &mut self,
        present: impl FnOnce(f32, &Camera, &mut TouchSurface) -> Result<T, E>,
    ) -> Result<T, E> {
        self.time += FIXED_TIME_STEP;

        if let Some(ndc) = self.pending_pointer.take() {
            if let Some(point) = self.mapper.map_to_image(ndc, &self.camera) {
                self.touch.record(point, self.touch_radius);
            }
        }

        present(self.time, &self.camera, &mut self.touch)
    }
}
