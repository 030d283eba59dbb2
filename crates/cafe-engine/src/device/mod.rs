//! wgpu device and window surface.
//!
//! Owns Instance/Adapter/Device/Queue plus the swapchain configuration, and
//! hands out one [`GpuFrame`] per rendered frame. Only the desktop backend
//! creates one; game loop code never touches it directly.

mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
