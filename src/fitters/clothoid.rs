use super::{FitSamples, IncrementalFitter};
use crate::curve::{Clothoid, CurvePrimitive};
use crate::float_types::{Real, tolerance, wrap_angle};
use nalgebra::{DMatrix, DVector, Point2, Vector2};

/// Clothoid fit through the tangent-angle profile.
///
/// Segment directions of the fed samples are unwrapped and fitted, weighted
/// by segment length, with a quadratic in arc length
/// ```text
/// φ(u) = θ + κ·u + ½·κ'·u²
/// ```
/// evaluated at segment midpoints. The start point is then the translation
/// minimizing the squared distance between samples and the curve at their
/// chord-length parameters.
#[derive(Debug, Clone, Default)]
pub struct ClothoidFitter {
    samples: FitSamples,
}

impl ClothoidFitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refit with curvature pinned to zero at arc length `offset` from the
    /// span start.
    pub fn curve_with_zero_curvature(&self, offset: Real) -> CurvePrimitive {
        self.fit(Some(offset)).into()
    }

    fn fit(&self, zero_curvature_at: Option<Real>) -> Clothoid {
        let length = self.samples.total_length();
        if self.samples.len() < 2 || length <= tolerance() {
            return Clothoid::new(self.samples.first(), 0.0, 0.0, 0.0, 0.0);
        }

        let (angle, curvature, dcurvature) = self.fit_angle_profile(length, zero_curvature_at);
        let mut clothoid = Clothoid::new(Point2::origin(), angle, length, curvature, dcurvature);

        let offsets = clothoid.offsets(&self.samples.arc_lengths);
        let shift = self
            .samples
            .pts
            .iter()
            .zip(offsets.iter())
            .fold(Vector2::zeros(), |acc, (p, q)| acc + (p.coords - q));
        clothoid.start = Point2::from(shift / self.samples.len() as Real);
        clothoid
    }

    /// Weighted least squares on unwrapped segment angles, in the normalized
    /// arc length `t = u / length`. Returns `(θ, κ, κ')`.
    fn fit_angle_profile(&self, length: Real, zero_curvature_at: Option<Real>) -> (Real, Real, Real) {
        let pts = &self.samples.pts;
        let arc = &self.samples.arc_lengths;
        let columns = if zero_curvature_at.is_some() { 2 } else { 3 };
        let t_zero = zero_curvature_at.map(|o| o / length);

        let mut rows: Vec<[Real; 3]> = Vec::with_capacity(pts.len());
        let mut rhs: Vec<Real> = Vec::with_capacity(pts.len());
        let mut prev_angle: Option<Real> = None;
        for j in 0..pts.len() - 1 {
            let d = pts[j + 1] - pts[j];
            let w = d.norm();
            if w <= tolerance() {
                continue;
            }
            let raw = d.y.atan2(d.x);
            let phi = match prev_angle {
                Some(prev) => prev + wrap_angle(raw - prev),
                None => raw,
            };
            prev_angle = Some(phi);

            let t = 0.5 * (arc[j] + arc[j + 1]) / length;
            let sw = w.sqrt();
            let basis = match t_zero {
                Some(tz) => [1.0, t * t - 2.0 * tz * t, 0.0],
                None => [1.0, t, t * t],
            };
            rows.push(basis.map(|b| b * sw));
            rhs.push(phi * sw);
        }
        if rows.is_empty() {
            return (0.0, 0.0, 0.0);
        }

        let design = DMatrix::from_fn(rows.len(), columns, |r, c| rows[r][c]);
        let target = DVector::from_vec(rhs);
        let coeffs = design
            .svd(true, true)
            .solve(&target, Real::EPSILON)
            .unwrap_or_else(|_| DVector::zeros(columns));

        let inv_len2 = 1.0 / (length * length);
        match zero_curvature_at {
            Some(offset) => {
                let dcurvature = 2.0 * coeffs[1] * inv_len2;
                (coeffs[0], -dcurvature * offset, dcurvature)
            },
            None => (coeffs[0], coeffs[1] / length, 2.0 * coeffs[2] * inv_len2),
        }
    }
}

impl IncrementalFitter for ClothoidFitter {
    fn add_point(&mut self, pt: Point2<Real>) {
        self.samples.push(pt);
    }

    fn num_points(&self) -> usize {
        self.samples.len()
    }

    fn primitive(&self) -> CurvePrimitive {
        self.fit(None).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::Curve;
    use approx::assert_relative_eq;

    fn sampled(truth: &Clothoid, count: usize) -> ClothoidFitter {
        let mut fitter = ClothoidFitter::new();
        for i in 0..count {
            let s = truth.length * i as Real / (count - 1) as Real;
            fitter.add_point(truth.pos(s));
        }
        fitter
    }

    #[test]
    fn recovers_dense_clothoid() {
        let truth = Clothoid::new(Point2::new(2.0, 1.0), -0.3, 40.0, 0.05, 0.004);
        let fitter = sampled(&truth, 81);
        let fit = fitter.primitive();
        assert_relative_eq!(fit.start_curvature(), 0.05, epsilon = 1e-3);
        assert_relative_eq!(fit.end_curvature(), 0.05 + 0.004 * 40.0, epsilon = 2e-3);
        assert_relative_eq!(fit.length(), 40.0, epsilon = 0.05);
        assert!((fit.start_pos() - truth.start).norm() < 0.05);
        assert!((fit.end_pos() - truth.pos(40.0)).norm() < 0.1);
    }

    #[test]
    fn zero_curvature_is_pinned_where_asked() {
        let truth = Clothoid::new(Point2::origin(), 0.0, 20.0, -0.1, 0.01);
        let fitter = sampled(&truth, 41);
        let length = fitter.samples.total_length();

        let at_start = fitter.curve_with_zero_curvature(0.0);
        assert_relative_eq!(at_start.start_curvature(), 0.0, epsilon = 1e-12);

        let at_end = fitter.curve_with_zero_curvature(length);
        assert_relative_eq!(at_end.end_curvature(), 0.0, epsilon = 1e-12);
        assert!(at_end.start_curvature() < 0.0);
    }

    #[test]
    fn straight_samples_give_zero_curvature() {
        let mut fitter = ClothoidFitter::new();
        for i in 0..5 {
            fitter.add_point(Point2::new(i as Real, 0.0));
        }
        let fit = fitter.primitive();
        assert_relative_eq!(fit.start_curvature(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(fit.end_curvature(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(fit.start_pos(), Point2::origin(), epsilon = 1e-12);
    }
}
