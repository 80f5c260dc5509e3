//! Reveal builder and runner.
//!
//! Configure the effect with method chaining, then call `.run()` to open a
//! window and start the effect. Blocks until the window is closed.
//!
//! ```ignore
//! use lumafield::Reveal;
//!
//! Reveal::new("portrait.jpg")
//!     .with_randomness(2.0)
//!     .with_particle_size(1.5)
//!     .run()?;
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use glam::Vec2;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::camera::Camera;
use crate::driver::FrameDriver;
use crate::error::RevealError;
use crate::field::ParticleField;
use crate::gpu::{GpuState, VisualParams};
use crate::sampler::{SourceImage, DEFAULT_THRESHOLD};
use crate::touch::{TouchSurface, DEFAULT_TOUCH_RADIUS};

enum ImageSource {
    Path(PathBuf),
    Memory(SourceImage),
}

/// The interactive particle reveal, built from a source image.
///
/// Defaults reproduce the effect's reference look: threshold 34, randomness
/// 1.0, depth 2.0, particle size 1.5, touch radius 20.
pub struct Reveal {
    source: ImageSource,
    threshold: u8,
    randomness: f32,
    depth: f32,
    particle_size: f32,
    touch_radius: f32,
    title: String,
    window_size: (u32, u32),
}

impl Reveal {
    /// Create a reveal for an image file on disk.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self::with_source(ImageSource::Path(path.into()))
    }

    /// Create a reveal for an already-decoded image.
    pub fn from_image(image: SourceImage) -> Self {
        Self::with_source(ImageSource::Memory(image))
    }

    fn with_source(source: ImageSource) -> Self {
        Self {
            source,
            threshold: DEFAULT_THRESHOLD,
            randomness: 1.0,
            depth: 2.0,
            particle_size: 1.5,
            touch_radius: DEFAULT_TOUCH_RADIUS,
            title: "lumafield".to_string(),
            window_size: (1280, 720),
        }
    }

    /// Set the red-channel brightness threshold a pixel must exceed to
    /// become a particle.
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the static jitter amount.
    pub fn with_randomness(mut self, randomness: f32) -> Self {
        self.randomness = randomness;
        self
    }

    /// Set the depth drift scale.
    pub fn with_depth(mut self, depth: f32) -> Self {
        self.depth = depth;
        self
    }

    /// Set the particle quad scale.
    pub fn with_particle_size(mut self, size: f32) -> Self {
        self.particle_size = size;
        self
    }

    /// Set the touch blob radius in image pixels.
    pub fn with_touch_radius(mut self, radius: f32) -> Self {
        self.touch_radius = radius;
        self
    }

    /// Set the window title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the initial window size.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = (width, height);
        self
    }

    /// Run the reveal. This blocks until the window is closed.
    ///
    /// Decoding happens up front; a decode failure means no field is ever
    /// built and the error is returned without opening a window.
    pub fn run(self) -> Result<(), RevealError> {
        let image = match self.source {
            ImageSource::Path(path) => SourceImage::load(path)?,
            ImageSource::Memory(image) => image,
        };

        let samples = image.sample(self.threshold);
        let field = ParticleField::build(
            &samples,
            image.width(),
            image.height(),
            &mut rand::thread_rng(),
        );
        log::info!(
            "built particle field: {} particles from {}x{} source",
            field.len(),
            image.width(),
            image.height()
        );

        let (width, height) = self.window_size;
        let camera = Camera::new(width as f32 / height as f32);
        let touch = TouchSurface::new(image.width(), image.height());
        let driver = FrameDriver::new(camera, touch, self.touch_radius);

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App {
            window: None,
            gpu: None,
            scene: Some(Scene { image, field }),
            driver,
            params: VisualParams {
                randomness: self.randomness,
                depth: self.depth,
                particle_size: self.particle_size,
            },
            title: self.title,
            window_size: self.window_size,
        };
        event_loop.run_app(&mut app)?;
        Ok(())
    }
}

/// CPU-side scene data held between decode and GPU upload.
struct Scene {
    image: SourceImage,
    field: ParticleField,
}

struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    scene: Option<Scene>,
    driver: FrameDriver,
    params: VisualParams,
    title: String,
    window_size: (u32, u32),
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let (width, height) = self.window_size;
        let window_attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(winit::dpi::LogicalSize::new(width, height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        let scene = self
            .scene
            .take()
            .expect("scene is built before the event loop starts");
        match pollster::block_on(GpuState::new(
            window,
            &scene.image,
            &scene.field,
            self.params,
        )) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(physical_size);
                }
                if physical_size.height > 0 {
                    self.driver
                        .set_aspect(physical_size.width as f32 / physical_size.height as f32);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    if size.width > 0 && size.height > 0 {
                        let ndc = Vec2::new(
                            (position.x as f32 / size.width as f32) * 2.0 - 1.0,
                            -((position.y as f32 / size.height as f32) * 2.0 - 1.0),
                        );
                        self.driver.pointer_moved(ndc);
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(gpu) = &mut self.gpu {
                    let result = self
                        .driver
                        .tick(|time, camera, touch| gpu.render(time, camera, touch));
                    match result {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost) => gpu.resize(winit::dpi::PhysicalSize {
                            width: gpu.config.width,
                            height: gpu.config.height,
                        }),
                        Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
                        Err(e) => log::error!("render error: {:?}", e),
                    }
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
