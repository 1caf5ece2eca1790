//! Incremental per-type fitters.
//!
//! A fitter is fed the samples of a span one at a time and can produce the
//! best primitive of its type over everything seen so far. Fitters keep the
//! cumulative chord length of the fed samples, which matches the polyline's
//! arc-length parameterization over the same span.

use crate::curve::{CurvePrimitive, CurveType};
use crate::float_types::Real;
use nalgebra::{Point2, Vector2};

mod arc;
mod clothoid;
mod line;

pub use arc::ArcFitter;
pub use clothoid::ClothoidFitter;
pub use line::LineFitter;

/// Common fitter interface.
pub trait IncrementalFitter: Send {
    fn add_point(&mut self, pt: Point2<Real>);

    fn num_points(&self) -> usize;

    /// Best fit over all points added so far. Callers feed at least the
    /// type's minimum point count first; fewer points yield a degenerate but
    /// finite primitive.
    fn primitive(&self) -> CurvePrimitive;
}

/// Samples fed so far, with cumulative chord lengths.
#[derive(Debug, Clone, Default)]
pub(crate) struct FitSamples {
    pub pts: Vec<Point2<Real>>,
    pub arc_lengths: Vec<Real>,
}

impl FitSamples {
    pub fn push(&mut self, pt: Point2<Real>) {
        let s = match (self.pts.last(), self.arc_lengths.last()) {
            (Some(prev), Some(&s)) => s + (pt - prev).norm(),
            _ => 0.0,
        };
        self.pts.push(pt);
        self.arc_lengths.push(s);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pts.len()
    }

    #[inline]
    pub fn total_length(&self) -> Real {
        self.arc_lengths.last().copied().unwrap_or(0.0)
    }

    pub fn centroid(&self) -> Point2<Real> {
        let sum = self
            .pts
            .iter()
            .fold(Vector2::zeros(), |acc, p| acc + p.coords);
        Point2::from(sum / self.len().max(1) as Real)
    }

    pub fn first(&self) -> Point2<Real> {
        self.pts.first().copied().unwrap_or_else(Point2::origin)
    }

    pub fn last(&self) -> Point2<Real> {
        self.pts.last().copied().unwrap_or_else(Point2::origin)
    }
}

/// Tagged union over the three fitters.
#[derive(Debug, Clone)]
pub enum Fitter {
    Line(LineFitter),
    Arc(ArcFitter),
    Clothoid(ClothoidFitter),
}

impl Fitter {
    /// Fresh fitter for primitives of type `ty`.
    pub fn for_type(ty: CurveType) -> Self {
        match ty {
            CurveType::Line => Fitter::Line(LineFitter::new()),
            CurveType::Arc => Fitter::Arc(ArcFitter::new()),
            CurveType::Clothoid => Fitter::Clothoid(ClothoidFitter::new()),
        }
    }

    pub const fn curve_type(&self) -> CurveType {
        match self {
            Fitter::Line(_) => CurveType::Line,
            Fitter::Arc(_) => CurveType::Arc,
            Fitter::Clothoid(_) => CurveType::Clothoid,
        }
    }

    /// The clothoid-only capabilities, when this fitter is a clothoid fitter.
    pub const fn as_clothoid(&self) -> Option<&ClothoidFitter> {
        match self {
            Fitter::Clothoid(fitter) => Some(fitter),
            _ => None,
        }
    }

    fn inner(&self) -> &dyn IncrementalFitter {
        match self {
            Fitter::Line(fitter) => fitter,
            Fitter::Arc(fitter) => fitter,
            Fitter::Clothoid(fitter) => fitter,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn IncrementalFitter {
        match self {
            Fitter::Line(fitter) => fitter,
            Fitter::Arc(fitter) => fitter,
            Fitter::Clothoid(fitter) => fitter,
        }
    }
}

impl IncrementalFitter for Fitter {
    fn add_point(&mut self, pt: Point2<Real>) {
        self.inner_mut().add_point(pt)
    }

    fn num_points(&self) -> usize {
        self.inner().num_points()
    }

    fn primitive(&self) -> CurvePrimitive {
        self.inner().primitive()
    }
}
