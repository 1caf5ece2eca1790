use super::{Curve, CurveDerivatives, CurveType, check_param_len, param, perp};
use crate::float_types::Real;
use nalgebra::{DVector, Point2, Vector2};

/// Straight segment from `start` in direction `angle`.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub start: Point2<Real>,
    pub angle: Real,
    pub length: Real,
}

impl Line {
    pub const fn new(start: Point2<Real>, angle: Real, length: Real) -> Self {
        Line {
            start,
            angle,
            length,
        }
    }

    #[inline]
    fn direction(&self) -> Vector2<Real> {
        let (sin, cos) = self.angle.sin_cos();
        Vector2::new(cos, sin)
    }
}

impl Curve for Line {
    const TYPE: CurveType = CurveType::Line;

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
        0.0
    }

    fn angle(&self, _s: Real) -> Real {
        self.angle
    }

    fn pos(&self, s: Real) -> Point2<Real> {
        self.start + self.direction() * s
    }

    fn der(&self, _s: Real) -> Vector2<Real> {
        self.direction()
    }

    fn derivatives(&self, s: Real) -> CurveDerivatives {
        let der = self.direction();
        let offset = der * s;
        let mut d_params = [Vector2::zeros(); param::MAX];
        d_params[param::X] = Vector2::x();
        d_params[param::Y] = Vector2::y();
        d_params[param::ANGLE] = perp(offset);
        CurveDerivatives {
            pos: self.start + offset,
            der,
            d_params,
        }
    }

    fn params(&self) -> DVector<Real> {
        DVector::from_row_slice(&[self.start.x, self.start.y, self.angle, self.length])
    }

    fn set_params(&mut self, params: &DVector<Real>) {
        check_param_len(Self::TYPE, params);
        self.start = Point2::new(params[param::X], params[param::Y]);
        self.angle = params[param::ANGLE];
        self.length = params[param::LENGTH];
    }
}
