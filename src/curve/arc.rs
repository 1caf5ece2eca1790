use super::{Curve, CurveDerivatives, CurveType, check_param_len, param, perp};
use crate::float_types::Real;
use nalgebra::{DVector, Point2, Vector2};

/// Below this turning angle the closed forms lose precision to cancellation
/// and the series expansions take over.
const SERIES_TURN: Real = 1e-3;

/// Circular arc of signed `curvature` (positive turns left).
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    pub start: Point2<Real>,
    pub angle: Real,
    pub length: Real,
    pub curvature: Real,
}

impl Arc {
    pub const fn new(start: Point2<Real>, angle: Real, length: Real, curvature: Real) -> Self {
        Arc {
            start,
            angle,
            length,
            curvature,
        }
    }

    /// Center of the supporting circle, `None` when the arc is straight.
    pub fn center(&self) -> Option<Point2<Real>> {
        if self.curvature == 0.0 {
            return None;
        }
        let (sin, cos) = self.angle.sin_cos();
        Some(self.start + Vector2::new(-sin, cos) / self.curvature)
    }

    /// Offset from the start after arc length `s`, and its derivative with
    /// respect to curvature.
    fn offset_and_d_curvature(&self, s: Real) -> (Vector2<Real>, Vector2<Real>) {
        let (theta, k) = (self.angle, self.curvature);
        let (sin0, cos0) = theta.sin_cos();
        if (k * s).abs() < SERIES_TURN {
            let (s2, s3, s4) = (s * s, s * s * s, s * s * s * s);
            let offset = Vector2::new(
                s * cos0 - 0.5 * k * s2 * sin0 - k * k * s3 / 6.0 * cos0,
                s * sin0 + 0.5 * k * s2 * cos0 - k * k * s3 / 6.0 * sin0,
            );
            let d_k = Vector2::new(
                -0.5 * s2 * sin0 - k * s3 / 3.0 * cos0 + k * k * s4 / 8.0 * sin0,
                0.5 * s2 * cos0 - k * s3 / 3.0 * sin0 - k * k * s4 / 8.0 * cos0,
            );
            (offset, d_k)
        } else {
            let (sin1, cos1) = (theta + k * s).sin_cos();
            let offset = Vector2::new((sin1 - sin0) / k, (cos0 - cos1) / k);
            let d_k = Vector2::new((s * cos1 - offset.x) / k, (s * sin1 - offset.y) / k);
            (offset, d_k)
        }
    }
}

impl Curve for Arc {
    const TYPE: CurveType = CurveType::Arc;

    fn start_pos(&self) -> Point2<Real> {
        self.start
    }

    fn start_angle(&self) -> Real {
        self.angle
    }

    fn length(&self) -> Real {
        self.length
    }

    fn curvature(&self, _s: Real) -> Real {
        self.curvature
    }

    fn angle(&self, s: Real) -> Real {
        self.angle + self.curvature * s
    }

    fn pos(&self, s: Real) -> Point2<Real> {
        self.start + self.offset_and_d_curvature(s).0
    }

    fn derivatives(&self, s: Real) -> CurveDerivatives {
        let (offset, d_k) = self.offset_and_d_curvature(s);
        let mut d_params = [Vector2::zeros(); param::MAX];
        d_params[param::X] = Vector2::x();
        d_params[param::Y] = Vector2::y();
        d_params[param::ANGLE] = perp(offset);
        d_params[param::CURVATURE] = d_k;
        CurveDerivatives {
            pos: self.start + offset,
            der: self.der(s),
            d_params,
        }
    }

    fn params(&self) -> DVector<Real> {
        DVector::from_row_slice(&[
            self.start.x,
            self.start.y,
            self.angle,
            self.length,
            self.curvature,
        ])
    }

    fn set_params(&mut self, params: &DVector<Real>) {
        check_param_len(Self::TYPE, params);
        self.start = Point2::new(params[param::X], params[param::Y]);
        self.angle = params[param::ANGLE];
        self.length = params[param::LENGTH];
        self.curvature = params[param::CURVATURE];
    }
}
