//! Error types for lumafield.
//!
//! This module provides error types for image loading, GPU initialization,
//! and running the reveal effect.

use std::fmt;

/// Errors that can occur while loading the source image.
#[derive(Debug)]
pub enum LoadError {
    /// Failed to read the image file from disk.
    Io(std::io::Error),
    /// Failed to decode the image data.
    ImageDecode(image::ImageError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "Failed to read source image: {}", e),
            LoadError::ImageDecode(e) => write!(f, "Failed to decode source image: {}", e),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            LoadError::ImageDecode(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        LoadError::Io(e)
    }
}

impl From<image::ImageError> for LoadError {
    fn from(e: image::ImageError) -> Self {
        LoadError::ImageDecode(e)
    }
}

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    AdapterRequest(wgpu::RequestAdapterError),
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::AdapterRequest(e) => write!(
                f,
                "No compatible GPU adapter found ({}). Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support.",
                e
            ),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::AdapterRequest(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestAdapterError> for GpuError {
    fn from(e: wgpu::RequestAdapterError) -> Self {
        GpuError::AdapterRequest(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that can occur when running the reveal effect.
#[derive(Debug)]
pub enum RevealError {
    /// Failed to create the event loop.
    EventLoop(winit::error::EventLoopError),
    /// The source image could not be loaded or decoded.
    Load(LoadError),
}

impl fmt::Display for RevealError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RevealError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            RevealError::Load(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RevealError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RevealError::EventLoop(e) => Some(e),
            RevealError::Load(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for RevealError {
    fn from(e: winit::error::EventLoopError) -> Self {
        RevealError::EventLoop(e)
    }
}

impl From<LoadError> for RevealError {
    fn from(e: LoadError) -> Self {
        RevealError::Load(e)
    }
}
