//! Arc-length parameterized polylines.
//!
//! A [`Polyline`] maps sample indices to arc-length parameters and back, and
//! interpolates positions and unit tangents at arbitrary parameters. Closed
//! polylines include the segment from the last sample back to the first, and
//! index `len()` is synonymous with index `0` at the seam.

use crate::errors::FitError;
use crate::float_types::Real;
use nalgebra::{Point2, Vector2};

pub mod circular;
pub use circular::{Circulator, VectorC};

#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pts: VectorC<Point2<Real>>,
    /// Cumulative length at each sample; closed polylines carry one extra
    /// entry for the seam.
    params: Vec<Real>,
}

impl Polyline {
    /// Builds the arc-length parameterization of `pts`.
    ///
    /// Fails for fewer than two samples, non-finite coordinates, or
    /// consecutive samples that coincide (including the closing pair of a
    /// closed polyline), since those leave tangents undefined.
    pub fn new(pts: VectorC<Point2<Real>>) -> Result<Self, FitError> {
        if pts.len() < 2 {
            return Err(FitError::TooFewPoints(pts.len()));
        }
        if let Some((index, p)) = pts
            .iter()
            .enumerate()
            .find(|(_, p)| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(FitError::InvalidCoordinate {
                index,
                x: p.x,
                y: p.y,
            });
        }

        let segments = if pts.is_closed() { pts.len() } else { pts.len() - 1 };
        let mut params = Vec::with_capacity(segments + 1);
        params.push(0.0);
        let mut total = 0.0;
        for index in 0..segments {
            let next = (index + 1) % pts.len();
            let step = (pts[next] - pts[index]).norm();
            if step <= 0.0 {
                return Err(FitError::RepeatedPoint { index, next });
            }
            total += step;
            params.push(total);
        }

        Ok(Polyline { pts, params })
    }

    pub fn from_points(pts: Vec<Point2<Real>>, closed: bool) -> Result<Self, FitError> {
        Self::new(VectorC::new(pts, closed))
    }

    /// Converts a `geo` line string. A closed ring becomes a closed polyline
    /// with its duplicated closing coordinate dropped.
    pub fn from_line_string(line: &geo::LineString<Real>) -> Result<Self, FitError> {
        let mut pts: Vec<Point2<Real>> = line.coords().map(|c| Point2::new(c.x, c.y)).collect();
        let closed = pts.len() > 2 && line.is_closed();
        if closed {
            pts.pop();
        }
        Self::from_points(pts, closed)
    }

    pub const fn pts(&self) -> &VectorC<Point2<Real>> {
        &self.pts
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pts.len()
    }

    /// Always false; construction requires at least two samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pts.is_empty()
    }

    #[inline]
    pub const fn is_closed(&self) -> bool {
        self.pts.is_closed()
    }

    /// Total length, including the closing segment of a closed polyline.
    #[inline]
    pub fn length(&self) -> Real {
        self.params[self.params.len() - 1]
    }

    /// Arc-length parameter of sample `idx`. For closed polylines `len()` is
    /// accepted and maps to the total length.
    pub fn idx_to_param(&self, idx: usize) -> Real {
        assert!(
            idx < self.params.len(),
            "sample index {idx} out of range (len = {})",
            self.len()
        );
        self.params[idx]
    }

    /// Index of the segment containing `param`.
    ///
    /// Non-decreasing over `[0, length()]`; `length()` itself maps to the
    /// last segment. Beyond that range an open polyline clamps to its end
    /// segments while a closed one wraps around, so that
    /// `param_to_idx(length() + e) == param_to_idx(e)`.
    pub fn param_to_idx(&self, param: Real) -> usize {
        let param = self.normalize_param(param);
        let last_segment = self.params.len() - 2;
        // params is sorted; find the last sample whose parameter is <= param.
        let upper = self.params.partition_point(|&p| p <= param);
        upper.saturating_sub(1).min(last_segment)
    }

    /// Position at arc-length `param`.
    pub fn pos(&self, param: Real) -> Point2<Real> {
        let param = self.normalize_param(param);
        let idx = self.param_to_idx(param);
        self.pts[idx] + self.segment_direction(idx) * (param - self.params[idx])
    }

    /// Unit tangent at arc-length `param`.
    pub fn der(&self, param: Real) -> Vector2<Real> {
        self.segment_direction(self.param_to_idx(param))
    }

    /// Forward length from sample `from` to sample `to`.
    ///
    /// Closed polylines wrap through the seam when `to < from`. For an open
    /// polyline `to < from` is a contract violation.
    pub fn length_from_to(&self, from: usize, to: usize) -> Real {
        let (a, b) = (self.idx_to_param(from), self.idx_to_param(to));
        if b >= a {
            b - a
        } else {
            assert!(
                self.is_closed(),
                "length_from_to({from}, {to}) runs backwards on an open polyline"
            );
            self.length() - a + b
        }
    }

    fn normalize_param(&self, param: Real) -> Real {
        if self.is_closed() && !(0.0..=self.length()).contains(&param) {
            param.rem_euclid(self.length())
        } else {
            param
        }
    }

    fn segment_direction(&self, idx: usize) -> Vector2<Real> {
        let next = (idx + 1) % self.len();
        (self.pts[next] - self.pts[idx]) / (self.params[idx + 1] - self.params[idx])
    }
}
