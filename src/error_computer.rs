//! Residuals between a primitive and the polyline samples it covers.

use crate::curve::{CurvePrimitive, param};
use crate::float_types::Real;
use crate::polyline::Polyline;
use nalgebra::{DMatrix, DVector};

/// Measures how well a primitive approximates a span of samples.
///
/// Implementations are shared read-only across threads during the search.
pub trait ErrorComputer: Send + Sync {
    /// Total squared residual over the samples `start..=end` (forward,
    /// wrapping for closed polylines). Never negative.
    fn compute_error(&self, curve: &CurvePrimitive, start: usize, end: usize) -> Real;

    /// Per-sample residuals (two rows per sample, `x` then `y`) and, if asked
    /// for, their Jacobian with respect to the raw curve parameters
    /// (`2m × num_params`). Both outputs are resized as needed.
    fn compute_error_vector(
        &self,
        curve: &CurvePrimitive,
        start: usize,
        end: usize,
        residuals: &mut DVector<Real>,
        jacobian: Option<&mut DMatrix<Real>>,
    );
}

/// Matches samples to the curve by proportional arc length.
///
/// Sample `k` of the span is compared with the curve at
/// ```text
/// s_k = lengthFromTo(start, k) · L / lengthFromTo(start, end)
/// ```
/// where `L` is the curve length, so the curve is stretched over the span.
#[derive(Debug, Clone, Copy)]
pub struct ParametricErrorComputer<'a> {
    polyline: &'a Polyline,
}

impl<'a> ParametricErrorComputer<'a> {
    pub const fn new(polyline: &'a Polyline) -> Self {
        ParametricErrorComputer { polyline }
    }

    pub const fn polyline(&self) -> &'a Polyline {
        self.polyline
    }

    /// `(sample index, fraction of the span length)` for every sample of the
    /// span.
    fn span(&self, start: usize, end: usize) -> impl Iterator<Item = (usize, Real)> + '_ {
        let total = self.polyline.length_from_to(start, end);
        let mut finished = false;
        self.polyline
            .pts()
            .circulator(start)
            .take_while(move |&(idx, _)| {
                let take = !finished;
                finished = idx == end;
                take
            })
            .map(move |(idx, _)| {
                let fraction = if total > 0.0 {
                    self.polyline.length_from_to(start, idx) / total
                } else {
                    0.0
                };
                (idx, fraction)
            })
    }
}

impl ErrorComputer for ParametricErrorComputer<'_> {
    fn compute_error(&self, curve: &CurvePrimitive, start: usize, end: usize) -> Real {
        let length = curve.length();
        let pts = self.polyline.pts();
        self.span(start, end)
            .map(|(idx, fraction)| (curve.pos(fraction * length) - pts[idx]).norm_squared())
            .sum()
    }

    fn compute_error_vector(
        &self,
        curve: &CurvePrimitive,
        start: usize,
        end: usize,
        residuals: &mut DVector<Real>,
        jacobian: Option<&mut DMatrix<Real>>,
    ) {
        let samples: Vec<(usize, Real)> = self.span(start, end).collect();
        let rows = 2 * samples.len();
        let cols = curve.curve_type().num_params();
        let length = curve.length();
        let pts = self.polyline.pts();

        *residuals = DVector::zeros(rows);
        match jacobian {
            None => {
                for (k, &(idx, fraction)) in samples.iter().enumerate() {
                    let r = curve.pos(fraction * length) - pts[idx];
                    residuals[2 * k] = r.x;
                    residuals[2 * k + 1] = r.y;
                }
            },
            Some(jacobian) => {
                *jacobian = DMatrix::zeros(rows, cols);
                for (k, &(idx, fraction)) in samples.iter().enumerate() {
                    let d = curve.derivatives(fraction * length);
                    let r = d.pos - pts[idx];
                    residuals[2 * k] = r.x;
                    residuals[2 * k + 1] = r.y;
                    for j in 0..cols {
                        let mut column = d.d_params[j];
                        if j == param::LENGTH {
                            // s_k stretches with the curve length
                            column += d.der * fraction;
                        }
                        jacobian[(2 * k, j)] = column.x;
                        jacobian[(2 * k + 1, j)] = column.y;
                    }
                }
            },
        }
    }
}
