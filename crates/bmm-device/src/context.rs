use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, warn};

use crate::buffer::DeviceBuffer;
use crate::error::{DeviceError, Result};
use crate::queue::DeviceQueue;

const F32_BYTES: usize = std::mem::size_of::<f32>();

/// Configuration for the modeled device.
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Device memory capacity in bytes.
    pub memory_bytes: usize,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        DeviceConfig {
            // 256 MiB of modeled DDR.
            memory_bytes: 256 * 1024 * 1024,
        }
    }
}

/// Snapshot of device memory accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryStats {
    pub capacity_bytes: usize,
    pub used_bytes: usize,
    pub live_buffers: usize,
}

impl MemoryStats {
    /// Bytes still available for allocation.
    pub fn free_bytes(&self) -> usize {
        self.capacity_bytes.saturating_sub(self.used_bytes)
    }

    /// Fraction of capacity in use, in `[0.0, 1.0]`.
    pub fn utilization(&self) -> f64 {
        if self.capacity_bytes == 0 {
            return 0.0;
        }
        self.used_bytes as f64 / self.capacity_bytes as f64
    }
}

/// Device-resident memory: allocation blocks keyed by buffer id, plus byte
/// accounting against the configured capacity.
///
/// Blocks live in an address space of their own; host data only enters or
/// leaves through queue transfers.
#[derive(Debug)]
pub(crate) struct MemoryPool {
    capacity_bytes: usize,
    used_bytes: usize,
    next_id: u64,
    blocks: HashMap<u64, Vec<f32>>,
}

impl MemoryPool {
    fn new(capacity_bytes: usize) -> Self {
        MemoryPool {
            capacity_bytes,
            used_bytes: 0,
            next_id: 0,
            blocks: HashMap::new(),
        }
    }

    /// Reserve a zero-initialized block of `len` f32 elements.
    pub(crate) fn allocate(&mut self, len: usize) -> Result<u64> {
        let bytes = len * F32_BYTES;
        if self.used_bytes + bytes > self.capacity_bytes {
            warn!(
                "device allocation failed: requested {} bytes with {} free of {}",
                bytes,
                self.capacity_bytes - self.used_bytes,
                self.capacity_bytes
            );
            return Err(DeviceError::OutOfMemory {
                requested: bytes,
                free: self.capacity_bytes - self.used_bytes,
                capacity: self.capacity_bytes,
            });
        }
        let id = self.next_id;
        self.next_id += 1;
        self.blocks.insert(id, vec![0.0; len]);
        self.used_bytes += bytes;
        debug!(
            "device alloc: buffer {} ({} bytes), {} of {} bytes in use",
            id, bytes, self.used_bytes, self.capacity_bytes
        );
        Ok(id)
    }

    /// Release the block behind `id`, returning its bytes to the pool.
    /// Freeing an unknown id is a no-op.
    pub(crate) fn free(&mut self, id: u64) {
        if let Some(block) = self.blocks.remove(&id) {
            self.used_bytes = self.used_bytes.saturating_sub(block.len() * F32_BYTES);
            debug!(
                "device free: buffer {}, {} bytes in use",
                id, self.used_bytes
            );
        }
    }

    /// Host-to-device store into the block behind `id`.
    pub(crate) fn write(&mut self, id: u64, src: &[f32]) -> Result<()> {
        let block = self
            .blocks
            .get_mut(&id)
            .ok_or(DeviceError::InvalidBuffer { id })?;
        if block.len() != src.len() {
            return Err(DeviceError::SizeMismatch {
                id,
                buffer: block.len(),
                host: src.len(),
            });
        }
        block.copy_from_slice(src);
        Ok(())
    }

    /// Device-to-host load of the block behind `id`.
    pub(crate) fn read(&self, id: u64) -> Result<Vec<f32>> {
        self.block(id).map(|b| b.to_vec())
    }

    /// Borrow the block behind `id`.
    pub(crate) fn block(&self, id: u64) -> Result<&[f32]> {
        self.blocks
            .get(&id)
            .map(|b| b.as_slice())
            .ok_or(DeviceError::InvalidBuffer { id })
    }

    /// Detach the block behind `id` so it can be mutated while other blocks
    /// stay borrowable. Must be paired with [`MemoryPool::restore_block`].
    pub(crate) fn take_block(&mut self, id: u64) -> Result<Vec<f32>> {
        self.blocks
            .remove(&id)
            .ok_or(DeviceError::InvalidBuffer { id })
    }

    /// Reattach a block detached with [`MemoryPool::take_block`].
    pub(crate) fn restore_block(&mut self, id: u64, block: Vec<f32>) {
        self.blocks.insert(id, block);
    }

    fn stats(&self) -> MemoryStats {
        MemoryStats {
            capacity_bytes: self.capacity_bytes,
            used_bytes: self.used_bytes,
            live_buffers: self.blocks.len(),
        }
    }
}

pub(crate) fn lock_pool(pool: &Mutex<MemoryPool>) -> Result<MutexGuard<'_, MemoryPool>> {
    pool.lock().map_err(|_| DeviceError::ContextPoisoned)
}

/// Handle to the modeled offload device.
///
/// The device owns a byte-accounted memory pool distinct from host memory.
/// Buffers are allocated against the pool and released when their handles
/// drop; data crosses only through queue transfers. Cloning the context
/// clones the handle, not the device.
#[derive(Debug, Clone)]
pub struct DeviceContext {
    pool: Arc<Mutex<MemoryPool>>,
}

impl DeviceContext {
    pub fn new(config: DeviceConfig) -> Self {
        DeviceContext {
            pool: Arc::new(Mutex::new(MemoryPool::new(config.memory_bytes))),
        }
    }

    /// Acquire a device-resident buffer of `len` f32 elements.
    ///
    /// The allocation is scoped to the returned handle and released when it
    /// drops, on every exit path.
    pub fn alloc(&self, len: usize) -> Result<DeviceBuffer> {
        let id = lock_pool(&self.pool)?.allocate(len)?;
        Ok(DeviceBuffer::new(id, len, Arc::clone(&self.pool)))
    }

    /// Open an in-order command queue against this device.
    pub fn queue(&self) -> DeviceQueue {
        DeviceQueue::new(Arc::clone(&self.pool))
    }

    /// Current memory accounting snapshot.
    pub fn memory_stats(&self) -> Result<MemoryStats> {
        Ok(lock_pool(&self.pool)?.stats())
    }
}

impl Default for DeviceContext {
    fn default() -> Self {
        Self::new(DeviceConfig::default())
    }
}
