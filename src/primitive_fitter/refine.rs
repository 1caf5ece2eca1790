//! Constrained single-step refinement of a candidate.
//!
//! Clothoids are refined in a working parameterization where the
//! curvature-rate slot holds the **end** curvature instead:
//! ```text
//! raw:     (…, L, κ, κ')
//! working: (…, L, κ, κ_end)      κ_end = κ + L·κ'
//! ```
//! which decouples the rate from the length it is scaled by and lets the end
//! curvature carry a sign bound directly. Raw Jacobian columns map to the
//! working ones by the chain rule
//! ```text
//! ∂r/∂κ_end  = ∂r/∂κ' / L
//! ∂r/∂κ|w    = ∂r/∂κ − ∂r/∂κ_end
//! ∂r/∂L|w    = ∂r/∂L − ∂r/∂κ_end · (κ_end − κ) / L
//! ```
//! Other primitive types pass through unchanged.

use super::FitPrimitive;
use crate::curve::{CurvePrimitive, CurveType, param};
use crate::error_computer::ErrorComputer;
use crate::float_types::{Real, tolerance};
use crate::solver::{BoxConstraint, DenseEvalData, LsProblem, LsSolver};
use nalgebra::{DMatrix, DVector};

/// Raw curve parameters to working parameters.
pub fn to_working_params(curve: &CurvePrimitive) -> DVector<Real> {
    let mut out = curve.params();
    if curve.curve_type() == CurveType::Clothoid {
        out[param::DCURVATURE] = out[param::CURVATURE] + out[param::LENGTH] * out[param::DCURVATURE];
    }
    out
}

/// Writes working parameters `x` back into `curve`.
pub fn set_working_params(curve: &mut CurvePrimitive, x: &DVector<Real>) {
    if curve.curve_type() != CurveType::Clothoid {
        curve.set_params(x);
        return;
    }
    let mut raw = x.clone();
    let length = x[param::LENGTH];
    raw[param::DCURVATURE] = if length.abs() > tolerance() {
        (x[param::DCURVATURE] - x[param::CURVATURE]) / length
    } else {
        0.0
    };
    curve.set_params(&raw);
}

/// Converts a raw-parameter Jacobian of a clothoid into working-parameter
/// terms at working point `x`.
pub fn transform_jacobian(x: &DVector<Real>, jacobian: &mut DMatrix<Real>) {
    let length = x[param::LENGTH];
    let inv_length = if length.abs() > tolerance() { 1.0 / length } else { 0.0 };
    let rate = (x[param::DCURVATURE] - x[param::CURVATURE]) * inv_length;

    let mut d_end = jacobian.column(param::DCURVATURE).into_owned();
    d_end *= inv_length;
    jacobian.set_column(param::DCURVATURE, &d_end);
    let d_curvature = jacobian.column(param::CURVATURE) - &d_end;
    jacobian.set_column(param::CURVATURE, &d_curvature);
    let d_length = jacobian.column(param::LENGTH) - &d_end * rate;
    jacobian.set_column(param::LENGTH, &d_length);
}

/// Least squares problem over one candidate's working parameters.
pub struct OneCurveProblem<'a> {
    curve: CurvePrimitive,
    start_idx: usize,
    end_idx: usize,
    error_computer: &'a dyn ErrorComputer,
}

impl<'a> OneCurveProblem<'a> {
    pub fn new(
        curve: CurvePrimitive,
        start_idx: usize,
        end_idx: usize,
        error_computer: &'a dyn ErrorComputer,
    ) -> Self {
        OneCurveProblem {
            curve,
            start_idx,
            end_idx,
            error_computer,
        }
    }

    pub const fn curve(&self) -> &CurvePrimitive {
        &self.curve
    }

    pub fn into_curve(self) -> CurvePrimitive {
        self.curve
    }
}

impl LsProblem for OneCurveProblem<'_> {
    fn error(&mut self, x: &DVector<Real>) -> Real {
        self.set_params(x);
        self.error_computer
            .compute_error(&self.curve, self.start_idx, self.end_idx)
    }

    fn eval(&mut self, x: &DVector<Real>, data: &mut DenseEvalData) {
        self.set_params(x);
        self.error_computer.compute_error_vector(
            &self.curve,
            self.start_idx,
            self.end_idx,
            &mut data.residuals,
            Some(&mut data.jacobian),
        );
        if self.curve.curve_type() == CurveType::Clothoid {
            transform_jacobian(x, &mut data.jacobian);
        }
    }

    fn params(&self) -> DVector<Real> {
        to_working_params(&self.curve)
    }

    fn set_params(&mut self, x: &DVector<Real>) {
        set_working_params(&mut self.curve, x);
    }
}

/// Nudges candidates toward a nearby sign-consistent optimum with one damped
/// constrained step.
#[derive(Clone, Copy)]
pub struct CurveRefiner<'a> {
    error_computer: &'a dyn ErrorComputer,
    inflection_accounting: bool,
    damping: Real,
}

impl<'a> CurveRefiner<'a> {
    pub fn new(error_computer: &'a dyn ErrorComputer, inflection_accounting: bool, damping: Real) -> Self {
        CurveRefiner {
            error_computer,
            inflection_accounting,
            damping,
        }
    }

    /// Bounds for refining `fit`: the length may shrink to half, and with
    /// inflection accounting the start (and for clothoids end) curvature
    /// keeps its tagged sign.
    pub fn constraints(&self, fit: &FitPrimitive) -> Vec<BoxConstraint> {
        let ty = fit.curve.curve_type();
        let mut constraints = vec![BoxConstraint::new(
            param::LENGTH,
            fit.curve.length() * 0.5,
            1.0,
        )];
        if self.inflection_accounting {
            if ty >= CurveType::Arc {
                constraints.push(BoxConstraint::new(
                    param::CURVATURE,
                    0.0,
                    Real::from(fit.start_curv_sign),
                ));
            }
            if ty == CurveType::Clothoid {
                constraints.push(BoxConstraint::new(
                    param::DCURVATURE,
                    0.0,
                    Real::from(fit.end_curv_sign),
                ));
            }
        }
        constraints
    }

    /// Replaces `fit.curve` with the result of one damped step. The error is
    /// left for the caller to re-measure.
    pub fn refine(&self, fit: &mut FitPrimitive) {
        let constraints = self.constraints(fit);
        let mut problem = OneCurveProblem::new(
            fit.curve.clone(),
            fit.start_idx,
            fit.end_idx,
            self.error_computer,
        );
        let x0 = problem.params();
        let mut solver = LsSolver::new(&mut problem, constraints);
        solver.set_default_damping(self.damping);
        solver.set_max_iter(1);
        // leaves the problem at the returned parameters
        solver.solve(x0);
        fit.curve = problem.into_curve();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::Clothoid;
    use approx::assert_relative_eq;
    use nalgebra::Point2;

    #[test]
    fn working_params_round_trip() {
        let mut curve: CurvePrimitive = Clothoid::new(Point2::new(1.0, 2.0), 0.3, 12.0, -0.2, 0.03).into();
        let raw = curve.params();
        let working = to_working_params(&curve);
        assert_relative_eq!(working[param::DCURVATURE], -0.2 + 12.0 * 0.03, epsilon = 1e-15);
        set_working_params(&mut curve, &working);
        assert_relative_eq!(curve.params(), raw, epsilon = 1e-15);
    }

    #[test]
    fn non_clothoids_pass_through() {
        let curve: CurvePrimitive = crate::curve::Arc::new(Point2::origin(), 0.0, 2.0, 0.5).into();
        assert_eq!(to_working_params(&curve), curve.params());
    }
}
