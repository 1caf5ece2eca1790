//! Test support library
//! Stroke generators and small helpers shared by the integration tests.
#![allow(dead_code)]

use nalgebra::Point2;
use sketchfit::float_types::Real;
use sketchfit::{CurvePrimitive, DebugSink, Parameters, Polyline};
use std::sync::Mutex;

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

pub fn polyline(pts: &[(Real, Real)], closed: bool) -> Polyline {
    Polyline::from_points(pts.iter().map(|&(x, y)| Point2::new(x, y)).collect(), closed).unwrap()
}

/// `n` unit-spaced samples along the x axis.
pub fn straight_stroke(n: usize) -> Polyline {
    let pts: Vec<(Real, Real)> = (0..n).map(|i| (i as Real, 0.0)).collect();
    polyline(&pts, false)
}

/// `n` samples on a circle of `radius` about the origin, counter-clockwise
/// from angle 0 through `sweep` (inclusive).
pub fn arc_stroke(n: usize, radius: Real, sweep: Real) -> Polyline {
    let pts: Vec<(Real, Real)> = (0..n)
        .map(|i| {
            let a = sweep * i as Real / (n - 1) as Real;
            (radius * a.cos(), radius * a.sin())
        })
        .collect();
    polyline(&pts, false)
}

/// `n` samples evenly around a full circle, as a closed loop.
pub fn circle_loop(n: usize, radius: Real) -> Polyline {
    let pts: Vec<(Real, Real)> = (0..n)
        .map(|i| {
            let a = sketchfit::float_types::TAU * i as Real / n as Real;
            (radius * a.cos(), radius * a.sin())
        })
        .collect();
    polyline(&pts, true)
}

/// Six samples along x, then five up a vertical leg from the last one.
pub fn l_stroke() -> Polyline {
    let mut pts: Vec<(Real, Real)> = (0..6).map(|i| (i as Real, 0.0)).collect();
    pts.extend((1..6).map(|i| (5.0, i as Real)));
    polyline(&pts, false)
}

/// One period of a sine wave: curvature changes sign in the middle.
pub fn s_stroke(n: usize) -> Polyline {
    let pts: Vec<(Real, Real)> = (0..n)
        .map(|i| {
            let t = i as Real / (n - 1) as Real;
            (8.0 * t, (sketchfit::float_types::TAU * t).sin())
        })
        .collect();
    polyline(&pts, false)
}

pub fn no_corners(poly: &Polyline) -> Vec<bool> {
    vec![false; poly.len()]
}

/// Defaults with the given algorithm and error threshold.
pub fn params(algorithm: &str, error_threshold: Real, inflection: bool) -> Parameters {
    Parameters {
        error_threshold,
        inflection_cost: if inflection { 5.0 } else { 0.0 },
        primitive_fitting: algorithm.to_string(),
        ..Parameters::default()
    }
}

/// Records every draw call as `(group, color)`.
#[derive(Default)]
pub struct RecordingSink {
    pub draws: Mutex<Vec<(String, [Real; 3])>>,
}

impl RecordingSink {
    pub fn count(&self, group: &str) -> usize {
        self.draws.lock().unwrap().iter().filter(|(g, _)| g == group).count()
    }
}

impl DebugSink for RecordingSink {
    fn draw_curve(&self, _curve: &CurvePrimitive, color: [Real; 3], group: &str) {
        self.draws.lock().unwrap().push((group.to_string(), color));
    }
}
