//! Damped Gauss–Newton least squares with box constraints.
//!
//! [`LsSolver`] minimizes `½‖r(x)‖²` for an [`LsProblem`] subject to
//! one-sided bounds on individual parameters. Each iteration solves the
//! Marquardt-damped normal equations
//! ```text
//! (JᵀJ + λ·diag(JᵀJ)) δ = −Jᵀr
//! ```
//! on the free variables, pinning any variable whose step would leave the
//! feasible box at its bound and re-solving for the rest. A step is kept only
//! if it lowers the problem's error; otherwise `λ` grows and the step is
//! retried. The solver never fails: without an improving step it returns the
//! (projected) starting point.

use crate::float_types::Real;
use log::{trace, warn};
use nalgebra::{DMatrix, DVector};

/// Residuals and Jacobian at one parameter vector.
#[derive(Debug, Clone)]
pub struct DenseEvalData {
    pub residuals: DVector<Real>,
    pub jacobian: DMatrix<Real>,
}

impl Default for DenseEvalData {
    fn default() -> Self {
        DenseEvalData {
            residuals: DVector::zeros(0),
            jacobian: DMatrix::zeros(0, 0),
        }
    }
}

/// A least squares problem over a flat parameter vector.
pub trait LsProblem {
    /// Total squared residual at `x`.
    fn error(&mut self, x: &DVector<Real>) -> Real;

    /// Residuals and Jacobian at `x`.
    fn eval(&mut self, x: &DVector<Real>, data: &mut DenseEvalData);

    fn params(&self) -> DVector<Real>;

    fn set_params(&mut self, x: &DVector<Real>);
}

/// One-sided bound: `x[index]` must stay on the `sign` side of `value`,
/// i.e. `sign · (x[index] − value) ≥ 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxConstraint {
    pub index: usize,
    pub value: Real,
    pub sign: Real,
}

impl BoxConstraint {
    /// `sign` is normalized to ±1; zero counts as positive.
    pub fn new(index: usize, value: Real, sign: Real) -> Self {
        BoxConstraint {
            index,
            value,
            sign: if sign < 0.0 { -1.0 } else { 1.0 },
        }
    }

    #[inline]
    pub fn is_satisfied(&self, x: &DVector<Real>) -> bool {
        self.sign * (x[self.index] - self.value) >= 0.0
    }

    /// Moves `x[index]` onto the bound if it is on the wrong side.
    pub fn project(&self, x: &mut DVector<Real>) -> bool {
        if self.is_satisfied(x) {
            false
        } else {
            x[self.index] = self.value;
            true
        }
    }
}

const DAMPING_GROWTH: Real = 10.0;
const MAX_DAMPING_TRIES: usize = 8;

pub struct LsSolver<'a, P: LsProblem + ?Sized> {
    problem: &'a mut P,
    constraints: Vec<BoxConstraint>,
    default_damping: Real,
    max_iter: usize,
}

impl<'a, P: LsProblem + ?Sized> LsSolver<'a, P> {
    pub fn new(problem: &'a mut P, constraints: Vec<BoxConstraint>) -> Self {
        LsSolver {
            problem,
            constraints,
            default_damping: 1.0,
            max_iter: 100,
        }
    }

    pub fn set_default_damping(&mut self, damping: Real) {
        self.default_damping = damping.max(0.0);
    }

    pub fn set_max_iter(&mut self, max_iter: usize) {
        self.max_iter = max_iter;
    }

    pub fn constraints(&self) -> &[BoxConstraint] {
        &self.constraints
    }

    fn project(&self, x: &mut DVector<Real>) {
        for constraint in &self.constraints {
            constraint.project(x);
        }
    }

    /// Runs at most `max_iter` damped steps from `x0`.
    pub fn solve(&mut self, x0: DVector<Real>) -> DVector<Real> {
        let mut x = x0;
        self.project(&mut x);
        let mut error = self.problem.error(&x);
        let mut data = DenseEvalData::default();

        for iteration in 0..self.max_iter {
            if !error.is_finite() || error <= 0.0 {
                break;
            }
            self.problem.eval(&x, &mut data);
            let jt = data.jacobian.transpose();
            let normal = &jt * &data.jacobian;
            let gradient = &jt * &data.residuals;

            let mut damping = self.default_damping;
            let mut improved = false;
            for _ in 0..MAX_DAMPING_TRIES {
                let Some(candidate) = self.constrained_step(&x, &normal, &gradient, damping) else {
                    damping = damping.max(Real::EPSILON) * DAMPING_GROWTH;
                    continue;
                };
                let candidate_error = self.problem.error(&candidate);
                if candidate_error.is_finite() && candidate_error < error {
                    trace!("ls iteration {iteration}: error {error:.3e} -> {candidate_error:.3e} (damping {damping:.2e})");
                    x = candidate;
                    error = candidate_error;
                    improved = true;
                    break;
                }
                damping = damping.max(Real::EPSILON) * DAMPING_GROWTH;
            }
            if !improved {
                break;
            }
        }

        // error() leaves the problem at whatever was probed last
        self.problem.set_params(&x);
        x
    }

    /// Damped step from `x` honouring the box; `None` if the reduced system
    /// is singular.
    fn constrained_step(
        &self,
        x: &DVector<Real>,
        normal: &DMatrix<Real>,
        gradient: &DVector<Real>,
        damping: Real,
    ) -> Option<DVector<Real>> {
        let n = x.len();
        let mut pinned = vec![false; n];
        let mut candidate = x.clone();

        // Each pass pins at least one more variable, so n + 1 passes suffice.
        for _ in 0..=n {
            let free: Vec<usize> = (0..n).filter(|&i| !pinned[i]).collect();
            candidate = x.clone();
            for constraint in &self.constraints {
                if pinned[constraint.index] {
                    candidate[constraint.index] = constraint.value;
                }
            }
            if !free.is_empty() {
                let delta_pinned = &candidate - x;
                let m = free.len();
                let mut lhs = DMatrix::zeros(m, m);
                let mut rhs = DVector::zeros(m);
                for (a, &i) in free.iter().enumerate() {
                    // pinned variables contribute a fixed shift to the gradient
                    let shift: Real = (0..n).filter(|&j| pinned[j]).map(|j| normal[(i, j)] * delta_pinned[j]).sum();
                    rhs[a] = -(gradient[i] + shift);
                    for (b, &j) in free.iter().enumerate() {
                        lhs[(a, b)] = normal[(i, j)];
                    }
                    lhs[(a, a)] += damping * normal[(i, i)].max(Real::EPSILON);
                }
                let delta = match lhs.clone().cholesky() {
                    Some(chol) => chol.solve(&rhs),
                    None => {
                        let Some(delta) = lhs.lu().solve(&rhs) else {
                            warn!("ls step: singular normal equations (damping {damping:.2e})");
                            return None;
                        };
                        delta
                    },
                };
                for (a, &i) in free.iter().enumerate() {
                    candidate[i] += delta[a];
                }
            }

            let violated: Vec<usize> = self
                .constraints
                .iter()
                .filter(|c| !pinned[c.index] && !c.is_satisfied(&candidate))
                .map(|c| c.index)
                .collect();
            if violated.is_empty() {
                break;
            }
            for index in violated {
                pinned[index] = true;
            }
        }

        // Pinning handles single bounds per variable; projecting again covers
        // variables carrying several bounds.
        self.project(&mut candidate);
        candidate.iter().all(|v| v.is_finite()).then_some(candidate)
    }
}
