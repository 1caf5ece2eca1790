//! Fitting primitives: straight lines, circular arcs and clothoids.
//!
//! Every primitive is parameterized by arc length from its start point and
//! exposes its parameters as a flat vector whose slots have fixed meaning
//! (see [`param`]). The slot layout is shared by all types; a primitive uses
//! the prefix of length [`CurveType::num_params`].

use crate::float_types::Real;
use nalgebra::{DVector, Point2, Vector2};

mod arc;
mod clothoid;
mod line;
pub mod spiral;

pub use arc::Arc;
pub use clothoid::Clothoid;
pub use line::Line;

/// Fixed parameter slots.
pub mod param {
    pub const X: usize = 0;
    pub const Y: usize = 1;
    pub const ANGLE: usize = 2;
    pub const LENGTH: usize = 3;
    pub const CURVATURE: usize = 4;
    pub const DCURVATURE: usize = 5;
    /// Number of slots in the widest layout (clothoid).
    pub const MAX: usize = 6;
}

/// Primitive family tag. The discriminant is the type index used for
/// minimum point counts and cost lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CurveType {
    Line = 0,
    Arc = 1,
    Clothoid = 2,
}

impl CurveType {
    pub const ALL: [CurveType; 3] = [CurveType::Line, CurveType::Arc, CurveType::Clothoid];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Fewest samples that determine a primitive of this type.
    #[inline]
    pub const fn min_points(self) -> usize {
        self.index() + 2
    }

    pub const fn num_params(self) -> usize {
        match self {
            CurveType::Line => 4,
            CurveType::Arc => 5,
            CurveType::Clothoid => 6,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            CurveType::Line => "Lines",
            CurveType::Arc => "Arcs",
            CurveType::Clothoid => "Clothoids",
        }
    }

    /// Debug color: the unit vector on this type's channel.
    pub const fn color(self) -> [Real; 3] {
        match self {
            CurveType::Line => [1.0, 0.0, 0.0],
            CurveType::Arc => [0.0, 1.0, 0.0],
            CurveType::Clothoid => [0.0, 0.0, 1.0],
        }
    }
}

/// Position, tangent and parameter sensitivities at a fixed arc length.
///
/// `d_params[j]` is `∂pos/∂param_j` with the arc length held fixed; slots
/// past the type's parameter count are zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveDerivatives {
    pub pos: Point2<Real>,
    pub der: Vector2<Real>,
    pub d_params: [Vector2<Real>; param::MAX],
}

/// Shared behaviour of the primitive types.
pub trait Curve {
    const TYPE: CurveType;

    fn start_pos(&self) -> Point2<Real>;
    fn start_angle(&self) -> Real;
    fn length(&self) -> Real;
    fn curvature(&self, s: Real) -> Real;
    fn angle(&self, s: Real) -> Real;
    fn pos(&self, s: Real) -> Point2<Real>;
    fn derivatives(&self, s: Real) -> CurveDerivatives;
    fn params(&self) -> DVector<Real>;
    fn set_params(&mut self, params: &DVector<Real>);

    /// Unit tangent at arc length `s`.
    fn der(&self, s: Real) -> Vector2<Real> {
        let (sin, cos) = self.angle(s).sin_cos();
        Vector2::new(cos, sin)
    }

    fn start_curvature(&self) -> Real {
        self.curvature(0.0)
    }

    fn end_curvature(&self) -> Real {
        self.curvature(self.length())
    }
}

pub(crate) fn check_param_len(ty: CurveType, params: &DVector<Real>) {
    assert_eq!(
        params.len(),
        ty.num_params(),
        "{} take {} parameters, got {}",
        ty.name(),
        ty.num_params(),
        params.len()
    );
}

/// Closed tagged union over the primitive types.
#[derive(Debug, Clone, PartialEq)]
pub enum CurvePrimitive {
    Line(Line),
    Arc(Arc),
    Clothoid(Clothoid),
}

macro_rules! dispatch {
    ($self:expr, $c:ident => $body:expr) => {
        match $self {
            CurvePrimitive::Line($c) => $body,
            CurvePrimitive::Arc($c) => $body,
            CurvePrimitive::Clothoid($c) => $body,
        }
    };
}

impl CurvePrimitive {
    pub const fn curve_type(&self) -> CurveType {
        match self {
            CurvePrimitive::Line(_) => CurveType::Line,
            CurvePrimitive::Arc(_) => CurveType::Arc,
            CurvePrimitive::Clothoid(_) => CurveType::Clothoid,
        }
    }

    pub fn length(&self) -> Real {
        dispatch!(self, c => c.length())
    }

    pub fn start_pos(&self) -> Point2<Real> {
        dispatch!(self, c => c.start_pos())
    }

    pub fn end_pos(&self) -> Point2<Real> {
        self.pos(self.length())
    }

    pub fn start_curvature(&self) -> Real {
        dispatch!(self, c => c.start_curvature())
    }

    pub fn end_curvature(&self) -> Real {
        dispatch!(self, c => c.end_curvature())
    }

    pub fn curvature(&self, s: Real) -> Real {
        dispatch!(self, c => c.curvature(s))
    }

    pub fn angle(&self, s: Real) -> Real {
        dispatch!(self, c => c.angle(s))
    }

    pub fn pos(&self, s: Real) -> Point2<Real> {
        dispatch!(self, c => c.pos(s))
    }

    pub fn der(&self, s: Real) -> Vector2<Real> {
        dispatch!(self, c => c.der(s))
    }

    pub fn derivatives(&self, s: Real) -> CurveDerivatives {
        dispatch!(self, c => c.derivatives(s))
    }

    pub fn params(&self) -> DVector<Real> {
        dispatch!(self, c => c.params())
    }

    /// Overwrites all parameters. The vector length must match the type's
    /// parameter count.
    pub fn set_params(&mut self, params: &DVector<Real>) {
        dispatch!(self, c => c.set_params(params))
    }
}

impl From<Line> for CurvePrimitive {
    fn from(line: Line) -> Self {
        CurvePrimitive::Line(line)
    }
}

impl From<Arc> for CurvePrimitive {
    fn from(arc: Arc) -> Self {
        CurvePrimitive::Arc(arc)
    }
}

impl From<Clothoid> for CurvePrimitive {
    fn from(clothoid: Clothoid) -> Self {
        CurvePrimitive::Clothoid(clothoid)
    }
}

/// Rotational sensitivity of a point attached to the start frame:
/// rotating the start angle rotates every offset about the start point.
#[inline]
pub(crate) fn perp(v: Vector2<Real>) -> Vector2<Real> {
    Vector2::new(-v.y, v.x)
}
