//! # Lumafield
//!
//! An interactive particle-based image reveal.
//!
//! A source image is sampled into a sparse point cloud (one particle per
//! pixel whose red channel exceeds a brightness threshold) and rendered as
//! instanced quads whose displacement, size and color are computed in a
//! noise-driven vertex shader. Pointer movement paints into a persistent
//! offscreen "touch" raster that feeds back into the shader and pushes
//! particles outward along their fixed random angles.
//!
//! ## Quick Start
//!
//! ```ignore
//! use lumafield::Reveal;
//!
//! fn main() -> Result<(), lumafield::RevealError> {
//!     Reveal::new("portrait.jpg")
//!         .with_randomness(2.0)
//!         .with_depth(4.0)
//!         .run()
//! }
//! ```
//!
//! ## Pipeline
//!
//! - [`sampler`] decodes the image and applies the luminance threshold.
//! - [`field`] turns the surviving pixels into instanced quad geometry.
//! - [`touch`] accumulates pointer interaction into an offscreen raster.
//! - [`shader`] defines the displacement program and its buffer contract.
//! - [`interact`] projects pointer positions into image space.
//! - [`driver`] sequences time, touch updates and presentation each tick.
//!
//! The field is built once, after decode completes; nothing renders until
//! then, and a decode failure is terminal. The touch raster is never
//! cleared; interaction accumulates for the lifetime of the effect.

pub mod camera;
pub mod driver;
pub mod error;
pub mod field;
mod gpu;
pub mod interact;
pub mod reveal;
pub mod sampler;
pub mod shader;
pub mod touch;

pub use camera::Camera;
pub use driver::{FrameDriver, FIXED_TIME_STEP};
pub use error::{GpuError, LoadError, RevealError};
pub use field::{ParticleField, ParticleRecord, QuadGeometry};
pub use glam::{Vec2, Vec3};
pub use gpu::VisualParams;
pub use interact::InteractionMapper;
pub use reveal::Reveal;
pub use sampler::{PixelSample, SourceImage, DEFAULT_THRESHOLD};
pub use shader::{luma, ParticleInstance, QuadVertex, LUMA_WEIGHTS};
pub use touch::{TouchSurface, DEFAULT_TOUCH_RADIUS};
