//! Parallel candidate search

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::candidates::fit_from_start;
use super::traits::CandidateSearchOps;
use super::{FitPrimitive, SearchContext};

/// Start samples mapped on the rayon pool; per-start lists are concatenated
/// in start order, so the output matches [`super::SerialCandidateSearch`].
#[cfg(feature = "parallel")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelCandidateSearch;

#[cfg(feature = "parallel")]
impl ParallelCandidateSearch {
    pub const fn new() -> Self {
        ParallelCandidateSearch
    }
}

#[cfg(feature = "parallel")]
impl CandidateSearchOps for ParallelCandidateSearch {
    fn search(&self, ctx: &SearchContext<'_>) -> Vec<FitPrimitive> {
        let per_start: Vec<Vec<FitPrimitive>> = (0..ctx.input.polyline.len())
            .into_par_iter()
            .map(|start| fit_from_start(ctx, start))
            .collect();
        per_start.into_iter().flatten().collect()
    }
}
