// Our Real scalar type:
pub type Real = f64;

use core::str::FromStr;
use std::sync::OnceLock;

/// Lazily-initialized tolerance used across the crate for degeneracy checks
/// (near-zero lengths, near-straight arcs, singular normal equations).
/// The default can be overridden:
///  1) **Build-time**: set env var `SKETCHFIT_TOLERANCE` (e.g. `SKETCHFIT_TOLERANCE=1e-10 cargo build`)
///  2) **Runtime**: call [`set_tolerance`] once before using the library
static TOLERANCE_CELL: OnceLock<Real> = OnceLock::new();

#[inline]
const fn default_tolerance() -> Real {
    1e-12
}

/// Returns the current tolerance value.
/// If not set yet, it tries `SKETCHFIT_TOLERANCE` (parsed as `Real`) and
/// falls back to a sensible default.
pub fn tolerance() -> Real {
    *TOLERANCE_CELL.get_or_init(|| {
        // Compile-time env if provided, inherited by dependencies
        if let Some(environment_variable) = option_env!("SKETCHFIT_TOLERANCE") {
            if let Ok(value) = Real::from_str(environment_variable) {
                return value.max(Real::EPSILON);
            }
        }
        default_tolerance()
    })
}

/// Set the tolerance programmatically once (subsequent calls are ignored).
/// Call near program start: `sketchfit::float_types::set_tolerance(1e-10);`
pub fn set_tolerance(value: Real) {
    let _ = TOLERANCE_CELL.set(value.max(Real::EPSILON));
}

/// Archimedes' constant (π)
pub const PI: Real = core::f64::consts::PI;

/// π/2
pub const FRAC_PI_2: Real = core::f64::consts::FRAC_PI_2;

/// The full circle constant (τ)
pub const TAU: Real = core::f64::consts::TAU;

/// Cost value meaning "this primitive type is never wanted".
pub const INFINITY: Real = Real::INFINITY;

/// Wraps an angle difference into `(-π, π]`.
#[inline]
pub fn wrap_angle(angle: Real) -> Real {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

/// Curvature sign convention shared by candidates: zero counts as positive.
#[inline]
pub fn curvature_sign(curvature: Real) -> i8 {
    if curvature >= 0.0 { 1 } else { -1 }
}
