//! Visualization hooks for accepted candidates.

use crate::curve::CurvePrimitive;
use crate::float_types::Real;
use log::trace;

/// Receives every accepted candidate curve. Notifications only: nothing a
/// sink does feeds back into the search.
pub trait DebugSink: Sync {
    fn draw_curve(&self, _curve: &CurvePrimitive, _color: [Real; 3], _group: &str) {}
}

/// Ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDebug;

impl DebugSink for NoDebug {}

/// Writes one `trace!` line per curve.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDebug;

impl DebugSink for LogDebug {
    fn draw_curve(&self, curve: &CurvePrimitive, color: [Real; 3], group: &str) {
        let (start, end) = (curve.start_pos(), curve.end_pos());
        trace!(
            "[{group}] {:?} ({:.3}, {:.3}) -> ({:.3}, {:.3}) length {:.3} color {color:?}",
            curve.curve_type(),
            start.x,
            start.y,
            end.x,
            end.y,
            curve.length()
        );
    }
}
