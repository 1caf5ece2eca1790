use super::{FitSamples, IncrementalFitter};
use crate::curve::{CurvePrimitive, Line};
use crate::float_types::{PI, Real};
use nalgebra::{Point2, Vector2};

/// Total least squares line fit.
#[derive(Debug, Clone, Default)]
pub struct LineFitter {
    samples: FitSamples,
}

impl LineFitter {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Principal axis of the samples through `centroid`, oriented from the first
/// towards the last sample.
///
/// ```text
/// θ = ½ atan2(2 Sxy, Sxx − Syy)
/// ```
pub(crate) fn principal_direction(samples: &FitSamples, centroid: Point2<Real>) -> Vector2<Real> {
    let (mut sxx, mut sxy, mut syy) = (0.0, 0.0, 0.0);
    for p in &samples.pts {
        let d = p - centroid;
        sxx += d.x * d.x;
        sxy += d.x * d.y;
        syy += d.y * d.y;
    }
    let mut angle = 0.5 * (2.0 * sxy).atan2(sxx - syy);
    let (sin, cos) = angle.sin_cos();
    if Vector2::new(cos, sin).dot(&(samples.last() - samples.first())) < 0.0 {
        angle += PI;
    }
    let (sin, cos) = angle.sin_cos();
    Vector2::new(cos, sin)
}

impl IncrementalFitter for LineFitter {
    fn add_point(&mut self, pt: Point2<Real>) {
        self.samples.push(pt);
    }

    fn num_points(&self) -> usize {
        self.samples.len()
    }

    fn primitive(&self) -> CurvePrimitive {
        let centroid = self.samples.centroid();
        let dir = principal_direction(&self.samples, centroid);
        let t_start = (self.samples.first() - centroid).dot(&dir);
        let t_end = (self.samples.last() - centroid).dot(&dir);
        Line::new(
            centroid + dir * t_start,
            dir.y.atan2(dir.x),
            (t_end - t_start).max(0.0),
        )
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::CurveType;
    use approx::assert_relative_eq;

    #[test]
    fn fits_collinear_points_exactly() {
        let mut fitter = LineFitter::new();
        for i in 0..5 {
            fitter.add_point(Point2::new(1.0 - i as Real, 2.0 + 2.0 * i as Real));
        }
        let line = fitter.primitive();
        assert_eq!(line.curve_type(), CurveType::Line);
        assert_relative_eq!(line.start_pos(), Point2::new(1.0, 2.0), epsilon = 1e-12);
        assert_relative_eq!(line.end_pos(), Point2::new(-3.0, 10.0), epsilon = 1e-12);
        assert_relative_eq!(line.length(), (80.0 as Real).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn noisy_points_average_out() {
        let mut fitter = LineFitter::new();
        for i in 0..6 {
            let wobble = if i % 2 == 0 { 0.1 } else { -0.1 };
            fitter.add_point(Point2::new(i as Real, wobble));
        }
        let line = fitter.primitive();
        assert!(line.angle(0.0).abs() < 0.05);
        assert!(line.start_pos().y.abs() < 0.1);
    }
}
