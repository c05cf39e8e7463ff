use thiserror::Error;

use bmm_core::MatmulError;

#[derive(Error, Debug)]
pub enum BenchError {
    #[error("matmul error: {0}")]
    Matmul(#[from] MatmulError),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, BenchError>;
