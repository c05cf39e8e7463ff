use std::sync::{Arc, Mutex};

use log::debug;

use bmm_core::MatmulDims;

use crate::buffer::DeviceBuffer;
use crate::context::{lock_pool, MemoryPool};
use crate::error::{DeviceError, Result};
use crate::kernel;

/// One enqueued device operation.
#[derive(Debug)]
enum Command {
    /// Host-to-device transfer; the source is staged at enqueue time.
    Write { dst: u64, src: Vec<f32> },
    /// Batched matmul kernel over three resident buffers.
    Matmul {
        a: u64,
        b: u64,
        c: u64,
        dims: MatmulDims,
    },
    /// Device-to-host transfer, delivered into the readback slot.
    Read {
        src: u64,
        slot: Arc<Mutex<Option<Vec<f32>>>>,
    },
}

/// In-order command queue for the modeled device.
///
/// Enqueuing records an operation; nothing executes until
/// [`DeviceQueue::wait`], which drains the queue in program order and
/// returns once every operation has completed. A device-to-host read
/// delivers its data only through its [`Readback`], and only after the
/// wait, so the caller cannot observe partial results.
///
/// An error while draining aborts the remaining commands; the queue is
/// empty afterwards either way.
#[derive(Debug)]
pub struct DeviceQueue {
    pool: Arc<Mutex<MemoryPool>>,
    pending: Vec<Command>,
}

impl DeviceQueue {
    pub(crate) fn new(pool: Arc<Mutex<MemoryPool>>) -> Self {
        DeviceQueue {
            pool,
            pending: Vec::new(),
        }
    }

    /// Number of operations waiting to execute.
    pub fn pending_ops(&self) -> usize {
        self.pending.len()
    }

    /// Enqueue a host-to-device copy of `src` into `dst`.
    pub fn enqueue_write(&mut self, dst: &DeviceBuffer, src: &[f32]) -> Result<()> {
        if src.len() != dst.len() {
            return Err(DeviceError::SizeMismatch {
                id: dst.id(),
                buffer: dst.len(),
                host: src.len(),
            });
        }
        self.pending.push(Command::Write {
            dst: dst.id(),
            src: src.to_vec(),
        });
        Ok(())
    }

    /// Enqueue the batched matmul kernel: `c = a @ b` per matrix, operands
    /// addressed per the engine convention.
    pub fn enqueue_matmul(
        &mut self,
        a: &DeviceBuffer,
        b: &DeviceBuffer,
        c: &DeviceBuffer,
        dims: &MatmulDims,
    ) -> Result<()> {
        for (buf, expected) in [(a, dims.a_len()), (b, dims.b_len()), (c, dims.c_len())] {
            if buf.len() != expected {
                return Err(DeviceError::SizeMismatch {
                    id: buf.id(),
                    buffer: buf.len(),
                    host: expected,
                });
            }
        }
        self.pending.push(Command::Matmul {
            a: a.id(),
            b: b.id(),
            c: c.id(),
            dims: *dims,
        });
        Ok(())
    }

    /// Enqueue a device-to-host copy of `src`. The returned slot is empty
    /// until the queue has been waited on.
    pub fn enqueue_read(&mut self, src: &DeviceBuffer) -> Readback {
        let slot = Arc::new(Mutex::new(None));
        self.pending.push(Command::Read {
            src: src.id(),
            slot: Arc::clone(&slot),
        });
        Readback { slot }
    }

    /// Execute every pending operation in program order and block until the
    /// last has completed.
    pub fn wait(&mut self) -> Result<()> {
        let mut pool = lock_pool(&self.pool)?;
        let n_ops = self.pending.len();
        for cmd in self.pending.drain(..) {
            match cmd {
                Command::Write { dst, src } => {
                    pool.write(dst, &src)?;
                }
                Command::Matmul { a, b, c, dims } => {
                    // Detach C so A and B stay borrowable while it is
                    // written; reattach before any error propagates so the
                    // buffer handle still accounts for it.
                    let mut c_block = pool.take_block(c)?;
                    let status = run_matmul(&pool, a, b, &mut c_block, &dims);
                    pool.restore_block(c, c_block);
                    status?;
                }
                Command::Read { src, slot } => {
                    let data = pool.read(src)?;
                    let mut slot = slot.lock().map_err(|_| DeviceError::ContextPoisoned)?;
                    *slot = Some(data);
                }
            }
        }
        debug!("device queue drained: {} ops", n_ops);
        Ok(())
    }
}

fn run_matmul(
    pool: &MemoryPool,
    a: u64,
    b: u64,
    c_block: &mut [f32],
    dims: &MatmulDims,
) -> Result<()> {
    let a_block = pool.block(a)?;
    let b_block = pool.block(b)?;
    kernel::matmul_batch(a_block, b_block, c_block, dims);
    Ok(())
}

/// Pending result of a device-to-host transfer.
///
/// Empty until the owning queue's [`DeviceQueue::wait`] has executed the
/// read. Consuming it earlier is an ordering violation and fails with
/// `ReadbackPending`.
#[derive(Debug)]
pub struct Readback {
    slot: Arc<Mutex<Option<Vec<f32>>>>,
}

impl Readback {
    /// Consume the transfer result.
    pub fn take(self) -> Result<Vec<f32>> {
        let mut slot = self.slot.lock().map_err(|_| DeviceError::ContextPoisoned)?;
        slot.take().ok_or(DeviceError::ReadbackPending)
    }
}
