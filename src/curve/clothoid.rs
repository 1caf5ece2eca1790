use super::spiral::{self, SpiralIntegral};
use super::{Curve, CurveDerivatives, CurveType, check_param_len, param, perp};
use crate::float_types::Real;
use nalgebra::{DVector, Point2, Vector2};

/// Euler spiral: curvature varies linearly with arc length,
/// `κ(s) = curvature + dcurvature · s`.
#[derive(Debug, Clone, PartialEq)]
pub struct Clothoid {
    pub start: Point2<Real>,
    pub angle: Real,
    pub length: Real,
    pub curvature: Real,
    pub dcurvature: Real,
}

impl Clothoid {
    pub const fn new(
        start: Point2<Real>,
        angle: Real,
        length: Real,
        curvature: Real,
        dcurvature: Real,
    ) -> Self {
        Clothoid {
            start,
            angle,
            length,
            curvature,
            dcurvature,
        }
    }

    fn integrate(&self, s: Real) -> SpiralIntegral {
        spiral::integrate(self.angle, self.curvature, self.dcurvature, s)
    }

    /// Arc-length offsets from the start for many parameters at once.
    pub fn offsets(&self, arc_lengths: &[Real]) -> Vec<Vector2<Real>> {
        arc_lengths.iter().map(|&s| self.integrate(s).offset).collect()
    }
}

impl Curve for Clothoid {
    const TYPE: CurveType = CurveType::Clothoid;

    fn start_pos(&self) -> Point2<Real> {
        self.start
    }

    fn start_angle(&self) -> Real {
        self.angle
    }

    fn length(&self) -> Real {
        self.length
    }

    fn curvature(&self, s: Real) -> Real {
        self.curvature + self.dcurvature * s
    }

    fn angle(&self, s: Real) -> Real {
        self.angle + s * (self.curvature + 0.5 * self.dcurvature * s)
    }

    fn pos(&self, s: Real) -> Point2<Real> {
        self.start + self.integrate(s).offset
    }

    fn derivatives(&self, s: Real) -> CurveDerivatives {
        let integral = self.integrate(s);
        let mut d_params = [Vector2::zeros(); param::MAX];
        d_params[param::X] = Vector2::x();
        d_params[param::Y] = Vector2::y();
        d_params[param::ANGLE] = perp(integral.offset);
        d_params[param::CURVATURE] = integral.d_curvature;
        d_params[param::DCURVATURE] = integral.d_dcurvature;
        CurveDerivatives {
            pos: self.start + integral.offset,
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
            self.dcurvature,
        ])
    }

    fn set_params(&mut self, params: &DVector<Real>) {
        check_param_len(Self::TYPE, params);
        self.start = Point2::new(params[param::X], params[param::Y]);
        self.angle = params[param::ANGLE];
        self.length = params[param::LENGTH];
        self.curvature = params[param::CURVATURE];
        self.dcurvature = params[param::DCURVATURE];
    }
}
