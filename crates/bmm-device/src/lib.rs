//! `bmm-device` - Modeled offload device and the batched matmul engine.
//!
//! This crate provides:
//! - A `DeviceContext` owning a byte-accounted memory pool distinct from
//!   host memory
//! - Scoped `DeviceBuffer` handles that release their allocation on drop
//! - An in-order `DeviceQueue` with explicit wait semantics and readback
//!   slots for device-to-host transfers
//! - The `OffloadBackend` engine implementing `bmm_core::MatmulBackend`
//!   through the full acquire / copy-in / compute / copy-out / release
//!   lifecycle

pub mod buffer;
pub mod context;
pub mod engine;
pub mod error;
mod kernel;
pub mod queue;

// Re-export primary types at the crate root for convenience.
pub use buffer::DeviceBuffer;
pub use context::{DeviceConfig, DeviceContext, MemoryStats};
pub use engine::OffloadBackend;
pub use error::{DeviceError, Result};
pub use queue::{DeviceQueue, Readback};
