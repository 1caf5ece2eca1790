//! Candidate primitive fitting for sketched 2-D strokes.
//!
//! A resampled stroke ([`Polyline`]) plus per-sample corner flags go in; every
//! viable straight segment, circular arc and clothoid over a contiguous span
//! comes out as a [`FitPrimitive`], tagged with its curvature signs and
//! squared error. Choosing among the candidates is left to the caller.
//!
//! ```no_run
//! use nalgebra::Point2;
//! use sketchfit::{LogDebug, Parameters, Polyline, fit_primitives};
//!
//! let pts = (0..20).map(|i| Point2::new(i as f64, (i as f64 * 0.3).sin())).collect();
//! let stroke = Polyline::from_points(pts, false)?;
//! let corners = vec![false; stroke.len()];
//! let candidates = fit_primitives(&stroke, &corners, &Parameters::default(), &LogDebug)?;
//! # Ok::<(), sketchfit::errors::FitError>(())
//! ```
//!
//! # Features
//! #### Optional
//! - **parallel**: use rayon to search start samples in parallel

#![forbid(unsafe_code)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod curve;
pub mod debug;
pub mod error_computer;
pub mod errors;
pub mod fitters;
pub mod float_types;
pub mod params;
pub mod polyline;
pub mod primitive_fitter;
pub mod solver;

pub use curve::{CurvePrimitive, CurveType};
pub use debug::{DebugSink, LogDebug, NoDebug};
pub use error_computer::{ErrorComputer, ParametricErrorComputer};
pub use errors::FitError;
pub use params::Parameters;
pub use polyline::Polyline;
pub use primitive_fitter::{
    AlgorithmRegistry, DefaultPrimitiveFitter, FitPrimitive, FittingInput, PrimitiveFittingAlgorithm,
    fit_primitives,
};
