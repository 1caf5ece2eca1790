//! Candidate generation and constrained refinement.
//!
//! Every start sample grows spans of each primitive type until the fit
//! degrades past the error budget or a corner is reached; every viable span
//! becomes a [`FitPrimitive`]. Downstream selection picks among them.
//!
//! The outer loop over start samples has no shared mutable state, so it is
//! dispatched through [`CandidateSearchOps`]: serial by default, rayon-backed
//! with the `parallel` feature.

pub mod candidates;
pub mod refine;
pub mod serial;
pub mod traits;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use candidates::fit_from_start;
pub use refine::{CurveRefiner, OneCurveProblem};
pub use serial::SerialCandidateSearch;
pub use traits::CandidateSearchOps;

#[cfg(feature = "parallel")]
pub use parallel::ParallelCandidateSearch;

use crate::curve::{CurvePrimitive, CurveType};
use crate::debug::DebugSink;
use crate::error_computer::{ErrorComputer, ParametricErrorComputer};
use crate::errors::FitError;
use crate::float_types::{Real, curvature_sign};
use crate::params::Parameters;
use crate::polyline::Polyline;
use log::debug;

/// One candidate: a primitive over the samples `start_idx..=end_idx`.
#[derive(Debug, Clone)]
pub struct FitPrimitive {
    pub curve: CurvePrimitive,
    pub start_idx: usize,
    /// May be smaller than `start_idx` on closed polylines.
    pub end_idx: usize,
    /// Samples fed to the fitter.
    pub num_pts: usize,
    pub start_curv_sign: i8,
    pub end_curv_sign: i8,
    /// Total squared residual, not normalized by span length.
    pub error: Real,
}

impl FitPrimitive {
    /// Tags the end signs from the curve's own end curvatures.
    pub fn new(curve: CurvePrimitive, start_idx: usize, end_idx: usize, num_pts: usize) -> Self {
        let start_curv_sign = curvature_sign(curve.start_curvature());
        let end_curv_sign = curvature_sign(curve.end_curvature());
        FitPrimitive {
            curve,
            start_idx,
            end_idx,
            num_pts,
            start_curv_sign,
            end_curv_sign,
            error: 0.0,
        }
    }

    /// Both ends tagged with `sign`.
    pub fn with_signs(curve: CurvePrimitive, start_idx: usize, end_idx: usize, num_pts: usize, sign: i8) -> Self {
        FitPrimitive {
            curve,
            start_idx,
            end_idx,
            num_pts,
            start_curv_sign: sign,
            end_curv_sign: sign,
            error: 0.0,
        }
    }

    pub const fn curve_type(&self) -> CurveType {
        self.curve.curve_type()
    }

    /// Same geometry and error with both sign tags flipped.
    pub fn mirrored(&self) -> Self {
        FitPrimitive {
            start_curv_sign: -self.start_curv_sign,
            end_curv_sign: -self.end_curv_sign,
            ..self.clone()
        }
    }
}

/// Everything a fitting algorithm reads. Shared read-only across start
/// samples.
pub struct FittingInput<'a> {
    pub polyline: &'a Polyline,
    /// One flag per sample; `true` marks a hard span boundary.
    pub corners: &'a [bool],
    pub error_computer: &'a dyn ErrorComputer,
    pub params: &'a Parameters,
    pub debug: &'a dyn DebugSink,
}

impl FittingInput<'_> {
    pub fn validate(&self) -> Result<(), FitError> {
        if self.corners.len() != self.polyline.len() {
            return Err(FitError::CornerCountMismatch {
                expected: self.polyline.len(),
                got: self.corners.len(),
            });
        }
        self.params.validate()
    }
}

/// One search: the input plus the refiner when adjustment is on.
pub struct SearchContext<'a> {
    pub input: &'a FittingInput<'a>,
    pub refiner: Option<CurveRefiner<'a>>,
}

impl<'a> SearchContext<'a> {
    pub fn new(input: &'a FittingInput<'a>, adjust: bool) -> Self {
        let refiner = adjust.then(|| {
            CurveRefiner::new(
                input.error_computer,
                input.params.inflection_accounting(),
                input.params.curve_adjust_damping,
            )
        });
        SearchContext { input, refiner }
    }
}

/// A named strategy producing candidates from a fitting input.
pub trait PrimitiveFittingAlgorithm: Send + Sync {
    fn name(&self) -> &'static str;

    fn run(&self, input: &FittingInput<'_>) -> Result<Vec<FitPrimitive>, FitError>;
}

/// The greedy multi-start search, with or without the refinement step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultPrimitiveFitter {
    adjust: bool,
}

impl DefaultPrimitiveFitter {
    pub const fn new(adjust: bool) -> Self {
        DefaultPrimitiveFitter { adjust }
    }

    pub const fn adjusts(&self) -> bool {
        self.adjust
    }
}

impl PrimitiveFittingAlgorithm for DefaultPrimitiveFitter {
    fn name(&self) -> &'static str {
        if self.adjust { "Adjust" } else { "Default" }
    }

    fn run(&self, input: &FittingInput<'_>) -> Result<Vec<FitPrimitive>, FitError> {
        input.validate()?;
        let ctx = SearchContext::new(input, self.adjust);

        #[cfg(not(feature = "parallel"))]
        let ops = SerialCandidateSearch::new();
        #[cfg(feature = "parallel")]
        let ops = ParallelCandidateSearch::new();

        let out = ops.search(&ctx);
        if log::log_enabled!(log::Level::Debug) {
            let mut counts = [0usize; 3];
            for fit in &out {
                counts[fit.curve_type().index()] += 1;
            }
            debug!(
                "{}: {} samples -> {} candidates (lines {}, arcs {}, clothoids {})",
                self.name(),
                input.polyline.len(),
                out.len(),
                counts[0],
                counts[1],
                counts[2]
            );
        }
        Ok(out)
    }
}

/// Fitting algorithms by name, populated explicitly.
pub struct AlgorithmRegistry {
    algorithms: Vec<Box<dyn PrimitiveFittingAlgorithm>>,
}

impl AlgorithmRegistry {
    pub fn new() -> Self {
        AlgorithmRegistry { algorithms: Vec::new() }
    }

    /// "Default" and "Adjust".
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(DefaultPrimitiveFitter::new(false)));
        registry.register(Box::new(DefaultPrimitiveFitter::new(true)));
        registry
    }

    /// Adds `algorithm`, replacing any registered under the same name.
    pub fn register(&mut self, algorithm: Box<dyn PrimitiveFittingAlgorithm>) {
        match self.algorithms.iter_mut().find(|a| a.name() == algorithm.name()) {
            Some(slot) => *slot = algorithm,
            None => self.algorithms.push(algorithm),
        }
    }

    pub fn get(&self, name: &str) -> Result<&dyn PrimitiveFittingAlgorithm, FitError> {
        self.algorithms
            .iter()
            .find(|a| a.name() == name)
            .map(|a| a.as_ref())
            .ok_or_else(|| FitError::UnknownAlgorithm(name.to_string()))
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.algorithms.iter().map(|a| a.name()).collect()
    }
}

impl Default for AlgorithmRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Runs the algorithm named by `params.primitive_fitting` with a
/// [`ParametricErrorComputer`] over `polyline`.
pub fn fit_primitives(
    polyline: &Polyline,
    corners: &[bool],
    params: &Parameters,
    debug: &dyn DebugSink,
) -> Result<Vec<FitPrimitive>, FitError> {
    let registry = AlgorithmRegistry::with_defaults();
    let algorithm = registry.get(&params.primitive_fitting)?;
    let error_computer = ParametricErrorComputer::new(polyline);
    algorithm.run(&FittingInput {
        polyline,
        corners,
        error_computer: &error_computer,
        params,
        debug,
    })
}
