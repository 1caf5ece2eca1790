//! Input and configuration errors

use crate::float_types::Real;

/// All the possible input issues we might encounter.
///
/// Quality outcomes of the search (a candidate over the error budget, a span
/// too short for a primitive type, a refinement step that does not help) are
/// not errors and never show up here.
#[derive(Debug, thiserror::Error)]
pub enum FitError {
    /// (TooFewPoints) A polyline needs at least two samples
    #[error("(TooFewPoints) A polyline needs at least 2 samples, got {0}")]
    TooFewPoints(usize),
    /// (InvalidCoordinate) A sample has a NaN or infinite coordinate
    #[error("(InvalidCoordinate) Sample {index} ({x}, {y}) has a NaN or infinite coordinate")]
    InvalidCoordinate { index: usize, x: Real, y: Real },
    /// (RepeatedPoint) Two consecutive samples coincide
    #[error("(RepeatedPoint) Samples {index} and {next} coincide")]
    RepeatedPoint { index: usize, next: usize },
    /// (CornerCountMismatch) One corner flag is required per sample
    #[error("(CornerCountMismatch) Expected {expected} corner flags, got {got}")]
    CornerCountMismatch { expected: usize, got: usize },
    /// (InvalidParameter) A configuration value is out of range
    #[error("(InvalidParameter) {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: Real,
        reason: &'static str,
    },
    /// (UnknownAlgorithm) No primitive fitting algorithm is registered under that name
    #[error("(UnknownAlgorithm) No primitive fitting algorithm named {0:?}")]
    UnknownAlgorithm(String),
    /// Reading a configuration or stroke file failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// A configuration or stroke file is not valid JSON for the expected shape
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
