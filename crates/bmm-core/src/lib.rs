//! `bmm-core` - Matrix batches and the host reference kernel for the batched
//! matmul benchmark.
//!
//! This crate provides:
//! - A `MatrixBatch` type: N same-shape f32 matrices in one contiguous buffer
//! - A `Layout` abstraction owning the column-/row-major offset formulas
//! - A `MatmulBackend` trait for pluggable multiply engines (host, offload)
//! - A reference `HostBackend` implementation
//! - The batch transposer that feeds the engine's second operand

pub mod backend;
pub mod batch;
pub mod dims;
pub mod error;
pub mod host;
pub mod layout;
pub mod transpose;

// Re-export primary types at the crate root for convenience.
pub use backend::MatmulBackend;
pub use batch::MatrixBatch;
pub use dims::MatmulDims;
pub use error::{MatmulError, Result};
pub use host::HostBackend;
pub use layout::Layout;
pub use transpose::transpose_batch;
