//! Seam between the candidate search and how start samples are scheduled.

use super::{FitPrimitive, SearchContext};

/// Runs the per-start search over every sample of the polyline.
pub trait CandidateSearchOps {
    /// Candidates from all start samples, grouped by start sample in
    /// increasing order.
    fn search(&self, ctx: &SearchContext<'_>) -> Vec<FitPrimitive>;
}
