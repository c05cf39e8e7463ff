//! `bmm-bench` - Harness around the batched matmul engine.
//!
//! This crate provides:
//! - A seeded uniform operand generator
//! - A tolerance-based verifier comparing engine output to the host
//!   reference
//! - A dual-path harness that times the offload engine and the host
//!   reference with one consistent boundary and reports matrices/second

pub mod error;
pub mod generate;
pub mod harness;
pub mod verify;

// Re-export primary types at the crate root for convenience.
pub use error::{BenchError, Result};
pub use generate::{fill_rand, random_batch};
pub use harness::{run, run_offload, BenchConfig, BenchReport, PathReport};
pub use verify::{compare, VerifyReport, DEFAULT_TOLERANCE};
