use std::sync::{Arc, Mutex};

use crate::context::MemoryPool;

/// Scoped handle to one device-resident allocation.
///
/// Owning the handle is owning the storage: the allocation is released back
/// to the pool when the handle drops, on every exit path, and handles cannot
/// be cloned. Device memory is scarce and explicitly managed, so nothing
/// holds it past the scope that acquired it.
#[derive(Debug)]
pub struct DeviceBuffer {
    id: u64,
    len: usize,
    pool: Arc<Mutex<MemoryPool>>,
}

impl DeviceBuffer {
    pub(crate) fn new(id: u64, len: usize, pool: Arc<Mutex<MemoryPool>>) -> Self {
        DeviceBuffer { id, len, pool }
    }

    /// Device-side identifier of this allocation.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Number of f32 elements in the allocation.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the allocation holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Drop for DeviceBuffer {
    fn drop(&mut self) {
        // A poisoned pool means a panic is already unwinding; the pool is
        // torn down with the process, so skip the free rather than panic
        // again.
        if let Ok(mut pool) = self.pool.lock() {
            pool.free(self.id);
        }
    }
}
