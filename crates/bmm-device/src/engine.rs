use log::debug;

use bmm_core::{Layout, MatmulBackend, MatmulDims, MatrixBatch, Result};

use crate::context::{DeviceConfig, DeviceContext};

/// Batched matmul engine running on the modeled offload device.
///
/// Operands and output are never assumed to be compute-resident: every
/// invocation acquires device storage sized exactly to the three buffers,
/// stages the operands across, runs the kernel, copies the output back and
/// releases the storage. Storage never outlives the invocation and is never
/// shared between invocations.
#[derive(Debug, Clone)]
pub struct OffloadBackend {
    ctx: DeviceContext,
}

impl OffloadBackend {
    /// Engine on a fresh device with the given configuration.
    pub fn new(config: DeviceConfig) -> Self {
        OffloadBackend {
            ctx: DeviceContext::new(config),
        }
    }

    /// Engine on an existing device context.
    pub fn with_context(ctx: DeviceContext) -> Self {
        OffloadBackend { ctx }
    }

    /// The device this engine dispatches to.
    pub fn context(&self) -> &DeviceContext {
        &self.ctx
    }
}

impl Default for OffloadBackend {
    fn default() -> Self {
        Self::new(DeviceConfig::default())
    }
}

impl MatmulBackend for OffloadBackend {
    fn name(&self) -> &str {
        "offload"
    }

    fn multiply(
        &self,
        a: &MatrixBatch,
        b_transposed: &MatrixBatch,
        dims: &MatmulDims,
    ) -> Result<MatrixBatch> {
        dims.validate(a, b_transposed)?;

        // Step 1: acquire device-resident storage scoped to this call.
        // The handles release it on every exit path below, including the
        // early returns.
        let a_dev = self.ctx.alloc(dims.a_len())?;
        let b_dev = self.ctx.alloc(dims.b_len())?;
        let c_dev = self.ctx.alloc(dims.c_len())?;

        // Step 2: enqueue the copy-in of both operands.
        let mut queue = self.ctx.queue();
        queue.enqueue_write(&a_dev, a.data())?;
        queue.enqueue_write(&b_dev, b_transposed.data())?;

        // Step 3: enqueue the kernel, then the copy-out.
        queue.enqueue_matmul(&a_dev, &b_dev, &c_dev, dims)?;
        let readback = queue.enqueue_read(&c_dev);

        // Step 4: wait for completion. Nothing enqueued above has an
        // observable effect until this returns.
        queue.wait()?;
        let data = readback.take()?;

        debug!(
            "offload multiply: {} matrices of {}x{} @ {}x{}",
            dims.num_matrices, dims.rows_a, dims.common, dims.common, dims.cols_b
        );
        MatrixBatch::from_vec(
            data,
            dims.rows_a,
            dims.cols_b,
            dims.num_matrices,
            Layout::ColMajor,
        )
    }
}
