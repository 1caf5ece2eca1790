//! Quadrature for curves whose tangent angle is a quadratic in arc length.
//!
//! With `φ(u) = θ + κ u + ½ κ' u²` the position offset after arc length `s`
//! and its sensitivities are
//! ```text
//! Δp(s)      = ∫₀ˢ (cos φ, sin φ) du
//! ∂Δp/∂κ     = ∫₀ˢ u   · (−sin φ, cos φ) du
//! ∂Δp/∂κ'    = ∫₀ˢ ½u² · (−sin φ, cos φ) du
//! ```
//! evaluated by composite 5-point Gauss–Legendre quadrature, with panels
//! sized so the tangent turns by at most [`MAX_PANEL_TURN`] radians in each.

use crate::float_types::Real;
use nalgebra::Vector2;

const GAUSS_NODES: [Real; 5] = [
    -0.906_179_845_938_664,
    -0.538_469_310_105_683_1,
    0.0,
    0.538_469_310_105_683_1,
    0.906_179_845_938_664,
];
const GAUSS_WEIGHTS: [Real; 5] = [
    0.236_926_885_056_189_1,
    0.478_628_670_499_366_5,
    0.568_888_888_888_888_9,
    0.478_628_670_499_366_5,
    0.236_926_885_056_189_1,
];

const MAX_PANEL_TURN: Real = 0.2;
const MAX_PANELS: usize = 4096;

/// Offset from the curve start and its curvature sensitivities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpiralIntegral {
    pub offset: Vector2<Real>,
    pub d_curvature: Vector2<Real>,
    pub d_dcurvature: Vector2<Real>,
}

/// Integrates the spiral `(angle, curvature, dcurvature)` from 0 to `s`.
/// Negative `s` integrates backwards.
pub fn integrate(angle: Real, curvature: Real, dcurvature: Real, s: Real) -> SpiralIntegral {
    let turn = curvature.abs() * s.abs() + 0.5 * dcurvature.abs() * s * s;
    let panels = if turn.is_finite() {
        ((turn / MAX_PANEL_TURN).ceil() as usize).clamp(1, MAX_PANELS)
    } else {
        MAX_PANELS
    };
    let h = s / panels as Real;

    let mut out = SpiralIntegral {
        offset: Vector2::zeros(),
        d_curvature: Vector2::zeros(),
        d_dcurvature: Vector2::zeros(),
    };
    for panel in 0..panels {
        let mid = (panel as Real + 0.5) * h;
        for (node, weight) in GAUSS_NODES.iter().zip(GAUSS_WEIGHTS.iter()) {
            let u = mid + 0.5 * h * node;
            let phi = angle + u * (curvature + 0.5 * dcurvature * u);
            let (sin, cos) = phi.sin_cos();
            let w = 0.5 * h * weight;
            let normal = Vector2::new(-sin, cos);
            out.offset += Vector2::new(cos, sin) * w;
            out.d_curvature += normal * (w * u);
            out.d_dcurvature += normal * (w * 0.5 * u * u);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn straight_spiral_is_a_segment() {
        let r = integrate(0.3, 0.0, 0.0, 2.0);
        assert_relative_eq!(r.offset, Vector2::new(0.3f64.cos(), 0.3f64.sin()) * 2.0, epsilon = 1e-13);
        // ∫ u du · n = s²/2 · n
        assert_relative_eq!(r.d_curvature, Vector2::new(-0.3f64.sin(), 0.3f64.cos()) * 2.0, epsilon = 1e-13);
    }

    #[test]
    fn constant_curvature_matches_circle() {
        let (theta, kappa, s): (Real, Real, Real) = (0.1, 0.5, 5.0);
        let r = integrate(theta, kappa, 0.0, s);
        let expected = Vector2::new(
            ((theta + kappa * s).sin() - theta.sin()) / kappa,
            (theta.cos() - (theta + kappa * s).cos()) / kappa,
        );
        assert_relative_eq!(r.offset, expected, epsilon = 1e-12);
    }

    #[test]
    fn sensitivities_match_finite_differences() {
        let (theta, kappa, dkappa, s): (Real, Real, Real, Real) = (-0.4, 0.2, -0.03, 7.0);
        let base = integrate(theta, kappa, dkappa, s);
        let h = 1e-6;
        let dk = (integrate(theta, kappa + h, dkappa, s).offset
            - integrate(theta, kappa - h, dkappa, s).offset)
            / (2.0 * h);
        let ddk = (integrate(theta, kappa, dkappa + h, s).offset
            - integrate(theta, kappa, dkappa - h, s).offset)
            / (2.0 * h);
        assert_relative_eq!(base.d_curvature, dk, epsilon = 1e-6);
        assert_relative_eq!(base.d_dcurvature, ddk, epsilon = 1e-5);
    }
}
