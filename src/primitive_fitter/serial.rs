//! Serial candidate search

use super::candidates::fit_from_start;
use super::traits::CandidateSearchOps;
use super::{FitPrimitive, SearchContext};

/// One start sample after another on the calling thread
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialCandidateSearch;

impl SerialCandidateSearch {
    pub const fn new() -> Self {
        SerialCandidateSearch
    }
}

impl CandidateSearchOps for SerialCandidateSearch {
    fn search(&self, ctx: &SearchContext<'_>) -> Vec<FitPrimitive> {
        (0..ctx.input.polyline.len())
            .flat_map(|start| fit_from_start(ctx, start))
            .collect()
    }
}
