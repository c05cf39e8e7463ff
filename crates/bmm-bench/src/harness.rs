use std::fmt;
use std::time::Instant;

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use bmm_core::{transpose_batch, HostBackend, Layout, MatmulBackend, MatmulDims, MatrixBatch};
use bmm_device::OffloadBackend;

use crate::error::{BenchError, Result};
use crate::generate::random_batch;
use crate::verify::{compare, VerifyReport, DEFAULT_TOLERANCE};

/// Parameters of one benchmark run, fixed at start and never mutated
/// mid-run.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub rows_a: usize,
    pub common: usize,
    pub cols_b: usize,
    pub num_matrices: usize,
    /// How many times each path re-executes the full multiply.
    pub repetitions: usize,
    /// Seed for the run's single pseudo-random source.
    pub seed: u64,
    /// Lower bound of the operand value range.
    pub lo: f32,
    /// Exclusive upper bound of the operand value range.
    pub hi: f32,
    /// Relative tolerance for verification.
    pub tolerance: f32,
}

impl Default for BenchConfig {
    fn default() -> Self {
        BenchConfig {
            rows_a: 64,
            common: 64,
            cols_b: 64,
            num_matrices: 1000,
            repetitions: 1,
            seed: 1138,
            lo: 1.0,
            hi: 10.0,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl BenchConfig {
    /// The multiply dimensions this config describes.
    pub fn dims(&self) -> MatmulDims {
        MatmulDims::new(self.rows_a, self.common, self.cols_b, self.num_matrices)
    }

    fn validate(&self) -> Result<()> {
        if self.repetitions == 0 {
            return Err(BenchError::InvalidConfig(
                "repetitions must be at least 1".to_string(),
            ));
        }
        if !(self.lo < self.hi) {
            return Err(BenchError::InvalidConfig(format!(
                "empty value range [{}, {})",
                self.lo, self.hi
            )));
        }
        Ok(())
    }
}

/// Timing of one path through the run.
#[derive(Debug, Clone)]
pub struct PathReport {
    /// Name of the backend that ran this path.
    pub backend: String,
    /// Wall-clock duration of all repetitions, in milliseconds.
    pub duration_ms: f64,
    /// `num_matrices * repetitions / duration_seconds`.
    pub matrices_per_sec: f64,
}

impl fmt::Display for PathReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:.3} ms, {:.0} matrices/s",
            self.backend, self.duration_ms, self.matrices_per_sec
        )
    }
}

/// Everything one benchmark run produces.
#[derive(Debug, Clone)]
pub struct BenchReport {
    pub dims: MatmulDims,
    pub repetitions: usize,
    pub engine: PathReport,
    pub reference: PathReport,
    pub verify: VerifyReport,
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} matrices of {}x{} @ {}x{}, {} repetition(s)",
            self.dims.num_matrices,
            self.dims.rows_a,
            self.dims.common,
            self.dims.common,
            self.dims.cols_b,
            self.repetitions
        )?;
        writeln!(f, "  {}", self.engine)?;
        writeln!(f, "  {}", self.reference)?;
        write!(f, "  verify {}", self.verify)
    }
}

/// Run the full benchmark against the given engine.
///
/// Generates both operand batches from one seeded source, transposes B into
/// the engine's operand order, times the engine and the host reference over
/// `repetitions` full invocations each, and verifies the engine output
/// against the reference. Verification failure lands in the report, not in
/// an `Err`.
pub fn run(config: &BenchConfig, engine: &dyn MatmulBackend) -> Result<BenchReport> {
    config.validate()?;
    let dims = config.dims();

    // One pseudo-random source for the whole run; A draws first, then B.
    let mut rng = StdRng::seed_from_u64(config.seed);
    let a = random_batch(
        dims.rows_a,
        dims.common,
        dims.num_matrices,
        Layout::ColMajor,
        config.lo,
        config.hi,
        &mut rng,
    );
    let b_raw = random_batch(
        dims.common,
        dims.cols_b,
        dims.num_matrices,
        Layout::RowMajor,
        config.lo,
        config.hi,
        &mut rng,
    );
    let b = transpose_batch(&b_raw);

    info!(
        "bench start: {} matrices of {}x{} @ {}x{}, {} repetition(s), seed {}",
        dims.num_matrices,
        dims.rows_a,
        dims.common,
        dims.common,
        dims.cols_b,
        config.repetitions,
        config.seed
    );

    let (engine_out, engine_report) = time_path(engine, &a, &b, &dims, config.repetitions)?;
    let reference_backend = HostBackend::new();
    let (reference_out, reference_report) =
        time_path(&reference_backend, &a, &b, &dims, config.repetitions)?;

    let verify = compare(engine_out.data(), reference_out.data(), config.tolerance)?;
    info!(
        "bench done: {} {:.3} ms, {} {:.3} ms, verify {}",
        engine_report.backend,
        engine_report.duration_ms,
        reference_report.backend,
        reference_report.duration_ms,
        verify
    );

    Ok(BenchReport {
        dims,
        repetitions: config.repetitions,
        engine: engine_report,
        reference: reference_report,
        verify,
    })
}

/// Run the benchmark with a default-configured offload engine.
pub fn run_offload(config: &BenchConfig) -> Result<BenchReport> {
    run(config, &OffloadBackend::default())
}

/// Time `repetitions` full multiply invocations on one backend.
///
/// The boundary is the whole invocation, acquire through copy-out
/// completion, identical for every backend; per-operation timing is out of
/// scope.
fn time_path(
    backend: &dyn MatmulBackend,
    a: &MatrixBatch,
    b: &MatrixBatch,
    dims: &MatmulDims,
    repetitions: usize,
) -> Result<(MatrixBatch, PathReport)> {
    let started = Instant::now();
    let mut out = backend.multiply(a, b, dims)?;
    for _ in 1..repetitions {
        out = backend.multiply(a, b, dims)?;
    }
    let elapsed = started.elapsed();

    let duration_ms = elapsed.as_secs_f64() * 1e3;
    let matrices_per_sec =
        (dims.num_matrices * repetitions) as f64 / elapsed.as_secs_f64();
    Ok((
        out,
        PathReport {
            backend: backend.name().to_string(),
            duration_ms,
            matrices_per_sec,
        },
    ))
}
