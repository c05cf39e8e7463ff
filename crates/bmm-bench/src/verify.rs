use std::fmt;

use bmm_core::MatmulError;

use crate::error::Result;

/// Default relative tolerance for engine-vs-reference comparison, sized for
/// reduction-order float drift across the chained multiply-accumulate.
pub const DEFAULT_TOLERANCE: f32 = 1e-3;

/// Outcome of comparing an engine output batch against the reference.
///
/// Divergence beyond tolerance is a verification result, not a fault:
/// callers inspect `passed` rather than matching on an error.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifyReport {
    /// True when every element is within tolerance.
    pub passed: bool,
    /// Elements compared.
    pub checked: usize,
    /// Elements beyond tolerance.
    pub mismatches: usize,
    /// Largest observed relative difference.
    pub max_relative_error: f32,
    /// Tolerance the comparison ran with.
    pub tolerance: f32,
}

impl fmt::Display for VerifyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed {
            write!(
                f,
                "PASS: {} elements within {:e} (max rel err {:e})",
                self.checked, self.tolerance, self.max_relative_error
            )
        } else {
            write!(
                f,
                "FAIL: {} of {} elements beyond {:e} (max rel err {:e})",
                self.mismatches, self.checked, self.tolerance, self.max_relative_error
            )
        }
    }
}

/// Compare engine output against reference output element-wise.
///
/// An element passes when exactly equal (which covers zeros of either sign)
/// or when `|e - r| <= tolerance * max(|e|, |r|)`.
///
/// # Errors
/// Returns a size mismatch if the slices disagree in length; outputs for
/// the same dims never do.
pub fn compare(engine: &[f32], reference: &[f32], tolerance: f32) -> Result<VerifyReport> {
    if engine.len() != reference.len() {
        return Err(MatmulError::SizeMismatch {
            operand: "reference",
            expected: engine.len(),
            got: reference.len(),
        }
        .into());
    }

    let mut mismatches = 0usize;
    let mut max_relative_error = 0.0f32;
    for (&e, &r) in engine.iter().zip(reference) {
        if e == r {
            continue;
        }
        let rel = (e - r).abs() / e.abs().max(r.abs());
        // NaN compares false either way; treat it as a mismatch.
        if !(rel <= tolerance) {
            mismatches += 1;
        }
        if rel > max_relative_error {
            max_relative_error = rel;
        }
    }

    Ok(VerifyReport {
        passed: mismatches == 0,
        checked: engine.len(),
        mismatches,
        max_relative_error,
        tolerance,
    })
}
