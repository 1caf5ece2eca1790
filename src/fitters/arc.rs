use super::line::principal_direction;
use super::{FitSamples, IncrementalFitter};
use crate::curve::{Arc, CurvePrimitive};
use crate::float_types::{Real, tolerance};
use nalgebra::{Matrix4, Point2, SymmetricEigen, Vector2, Vector4};

/// Below this curvature (in units of the inverse sample spread) the fit is
/// treated as a straight arc.
const STRAIGHT_CURVATURE: Real = 1e-7;

/// Algebraic circle fit.
///
/// Minimizes `Σ (A·(x² + y²) + B·x + C·y + D)²` over unit-norm `(A, B, C, D)`
/// in a centered and scaled frame. The normalization keeps `A → 0`
/// admissible, so collinear samples degrade to a straight arc instead of a
/// singular system.
#[derive(Debug, Clone, Default)]
pub struct ArcFitter {
    samples: FitSamples,
}

impl ArcFitter {
    pub fn new() -> Self {
        Self::default()
    }

    fn straight(&self) -> CurvePrimitive {
        let centroid = self.samples.centroid();
        let dir = principal_direction(&self.samples, centroid);
        let t_start = (self.samples.first() - centroid).dot(&dir);
        let t_end = (self.samples.last() - centroid).dot(&dir);
        Arc::new(
            centroid + dir * t_start,
            dir.y.atan2(dir.x),
            (t_end - t_start).max(0.0),
            0.0,
        )
        .into()
    }

    /// Circle coefficients `(A, B, C, D)` in the frame `(p − centroid) / scale`.
    fn algebraic_circle(&self, centroid: Point2<Real>, scale: Real) -> Vector4<Real> {
        let mut moments = Matrix4::zeros();
        for p in &self.samples.pts {
            let q = (p - centroid) / scale;
            let row = Vector4::new(q.norm_squared(), q.x, q.y, 1.0);
            moments += row * row.transpose();
        }
        let eigen = SymmetricEigen::new(moments);
        let smallest = eigen.eigenvalues.imin();
        eigen.eigenvectors.column(smallest).into_owned()
    }
}

impl IncrementalFitter for ArcFitter {
    fn add_point(&mut self, pt: Point2<Real>) {
        self.samples.push(pt);
    }

    fn num_points(&self) -> usize {
        self.samples.len()
    }

    fn primitive(&self) -> CurvePrimitive {
        if self.samples.len() < 3 {
            return self.straight();
        }
        let centroid = self.samples.centroid();
        let scale = (self
            .samples
            .pts
            .iter()
            .map(|p| (p - centroid).norm_squared())
            .sum::<Real>()
            / self.samples.len() as Real)
            .sqrt();
        if scale <= tolerance() {
            return self.straight();
        }

        let coeffs = self.algebraic_circle(centroid, scale);
        let (a, b, c, d) = (coeffs[0], coeffs[1], coeffs[2], coeffs[3]);
        let discriminant = b * b + c * c - 4.0 * a * d;
        if discriminant <= 0.0 || 2.0 * a.abs() < STRAIGHT_CURVATURE * discriminant.sqrt() {
            return self.straight();
        }

        let center = centroid + Vector2::new(-b, -c) * (scale / (2.0 * a));
        let radius = discriminant.sqrt() / (2.0 * a.abs()) * scale;

        // Swept angle of the samples around the center decides orientation.
        let mut sweep = 0.0;
        for pair in self.samples.pts.windows(2) {
            let (r0, r1) = (pair[0] - center, pair[1] - center);
            sweep += r0.perp(&r1).atan2(r0.dot(&r1));
        }
        let sign = if sweep >= 0.0 { 1.0 } else { -1.0 };

        let first = self.samples.first() - center;
        if first.norm() <= tolerance() {
            return self.straight();
        }
        let radial = first.normalize();
        let tangent = Vector2::new(-radial.y, radial.x) * sign;
        Arc::new(
            center + radial * radius,
            tangent.y.atan2(tangent.x),
            sweep.abs() * radius,
            sign / radius,
        )
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::Curve;
    use approx::assert_relative_eq;

    fn fit(points: &[Point2<Real>]) -> CurvePrimitive {
        let mut fitter = ArcFitter::new();
        points.iter().for_each(|&p| fitter.add_point(p));
        fitter.primitive()
    }

    #[test]
    fn recovers_exact_circle() {
        let truth = Arc::new(Point2::new(3.0, -1.0), 0.4, 6.0, -0.25);
        let pts: Vec<_> = (0..=12).map(|i| truth.pos(i as Real * 0.5)).collect();
        let arc = fit(&pts);
        assert_relative_eq!(arc.start_curvature(), -0.25, epsilon = 1e-9);
        assert_relative_eq!(arc.length(), 6.0, epsilon = 1e-9);
        assert_relative_eq!(arc.start_pos(), truth.start, epsilon = 1e-9);
        assert_relative_eq!(arc.angle(0.0).sin(), truth.angle.sin(), epsilon = 1e-9);
        assert_relative_eq!(arc.end_pos(), truth.pos(6.0), epsilon = 1e-8);
    }

    #[test]
    fn three_points_define_circle() {
        let arc = fit(&[Point2::new(1.0, 0.0), Point2::new(0.0, 1.0), Point2::new(-1.0, 0.0)]);
        assert_relative_eq!(arc.start_curvature(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(arc.length(), crate::float_types::PI, epsilon = 1e-9);
    }

    #[test]
    fn collinear_points_give_straight_arc() {
        let pts: Vec<_> = (0..4).map(|i| Point2::new(i as Real, 2.0 * i as Real)).collect();
        let arc = fit(&pts);
        assert_eq!(arc.start_curvature(), 0.0);
        assert_relative_eq!(arc.length(), (45.0 as Real).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn almost_full_circle_keeps_orientation() {
        let truth = Arc::new(Point2::new(0.0, -2.0), 0.0, 11.5, 0.5);
        let pts: Vec<_> = (0..=23).map(|i| truth.pos(i as Real * 0.5)).collect();
        let arc = fit(&pts);
        assert_relative_eq!(arc.start_curvature(), 0.5, epsilon = 1e-9);
        assert_relative_eq!(arc.length(), 11.5, epsilon = 1e-8);
    }
}
