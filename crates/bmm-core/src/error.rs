use thiserror::Error;

use crate::layout::Layout;

#[derive(Error, Debug)]
pub enum MatmulError {
    #[error("{operand}: buffer holds {got} elements but dims require {expected}")]
    SizeMismatch {
        operand: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("{operand}: expected shape {expected:?}, got {got:?}")]
    ShapeMismatch {
        operand: &'static str,
        expected: Vec<usize>,
        got: Vec<usize>,
    },
    #[error("{operand}: expected {expected:?} storage, got {got:?}")]
    LayoutMismatch {
        operand: &'static str,
        expected: Layout,
        got: Layout,
    },
    #[error("device failure: {0}")]
    Device(String),
}

pub type Result<T> = std::result::Result<T, MatmulError>;
