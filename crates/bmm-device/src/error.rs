use thiserror::Error;

use bmm_core::MatmulError;

#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("device out of memory: requested {requested} bytes, {free} free of {capacity}")]
    OutOfMemory {
        requested: usize,
        free: usize,
        capacity: usize,
    },
    #[error("buffer {id}: holds {buffer} elements but host side has {host}")]
    SizeMismatch { id: u64, buffer: usize, host: usize },
    #[error("buffer {id} is not resident on the device")]
    InvalidBuffer { id: u64 },
    #[error("readback consumed before the queue completed")]
    ReadbackPending,
    #[error("device context poisoned by an earlier panic")]
    ContextPoisoned,
}

pub type Result<T> = std::result::Result<T, DeviceError>;

// Device failures cross the backend seam as the core error's device variant;
// the typed detail survives in the message.
impl From<DeviceError> for MatmulError {
    fn from(e: DeviceError) -> Self {
        MatmulError::Device(e.to_string())
    }
}
