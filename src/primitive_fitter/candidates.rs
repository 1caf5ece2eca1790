//! Candidate enumeration from one start sample.

use super::{FitPrimitive, SearchContext};
use crate::curve::CurveType;
use crate::fitters::{Fitter, IncrementalFitter};
use crate::float_types::Real;
use log::trace;

/// Whether to keep extending the current span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Growth {
    Continue,
    Stop,
}

/// All candidates of every type whose span begins at sample `start`.
///
/// For each type a fresh fitter is grown one sample at a time along the
/// polyline (wrapping for closed ones). Growth stops at the first span whose
/// length-normalized error exceeds the threshold, at a corner after the start,
/// when the polyline is exhausted, or once a type that is not needed has
/// produced the spans its neighbours need from it.
///
/// Output order: by type, then by growing span.
pub fn fit_from_start(ctx: &SearchContext<'_>, start: usize) -> Vec<FitPrimitive> {
    let input = ctx.input;
    let pts = input.polyline.pts();
    assert!(start < pts.len(), "start sample {start} out of range");

    let mut out = Vec::new();
    for ty in CurveType::ALL {
        let needed = input.params.needs(ty);
        let mut fitter = Fitter::for_type(ty);
        let mut fit_so_far = 0;
        for (idx, pt) in pts.circulator(start) {
            fit_so_far += 1;
            // Unneeded lines and arcs still supply the shortest spans.
            if !needed && (ty == CurveType::Clothoid || fit_so_far >= 3 + ty.index()) {
                break;
            }
            fitter.add_point(*pt);
            if fit_so_far >= ty.min_points()
                && ctx.add_candidates(&fitter, start, idx, fit_so_far, &mut out) == Growth::Stop
            {
                break;
            }
            if fit_so_far > 1 && input.corners[idx] {
                break;
            }
        }
    }
    out
}

impl SearchContext<'_> {
    /// Materializes the fitter's current primitive over `start..=end` and
    /// appends it (plus any inflection variants) to `out`.
    fn add_candidates(
        &self,
        fitter: &Fitter,
        start: usize,
        end: usize,
        num_pts: usize,
        out: &mut Vec<FitPrimitive>,
    ) -> Growth {
        let input = self.input;
        let ty = fitter.curve_type();
        let span = input.polyline.length_from_to(start, end);
        let threshold = input.params.error_threshold * input.params.error_threshold;
        let inflection = input.params.inflection_accounting();

        let mut fit = FitPrimitive::new(fitter.primitive(), start, end, num_pts);
        self.measure(&mut fit);
        if fit.error / span > threshold {
            trace!(
                "{} from {start} rejected at {end}: normalized error {:.3e}",
                ty.name(),
                fit.error / span
            );
            return Growth::Stop;
        }
        self.emit(fit.clone(), out);

        if ty == CurveType::Line && inflection {
            out.push(fit.mirrored());
        }

        if inflection && fit.start_curv_sign != fit.end_curv_sign {
            if let Some(clothoids) = fitter.as_clothoid() {
                // Zero curvature at the start: the sign is carried by the end.
                let curve = clothoids.curve_with_zero_curvature(0.0);
                let sign = if curve.end_curvature() > 0.0 { 1 } else { -1 };
                self.add_split(FitPrimitive::with_signs(curve, start, end, num_pts, sign), span, out);

                let curve = clothoids.curve_with_zero_curvature(span);
                let sign = if curve.start_curvature() > 0.0 { 1 } else { -1 };
                self.add_split(FitPrimitive::with_signs(curve, start, end, num_pts, sign), span, out);
            }
        }
        Growth::Continue
    }

    fn add_split(&self, mut fit: FitPrimitive, span: Real, out: &mut Vec<FitPrimitive>) {
        self.measure(&mut fit);
        let threshold = self.input.params.error_threshold * self.input.params.error_threshold;
        if fit.error / span < threshold {
            self.emit(fit, out);
        } else {
            trace!(
                "single-sign clothoid {}..{} rejected: normalized error {:.3e}",
                fit.start_idx,
                fit.end_idx,
                fit.error / span
            );
        }
    }

    /// Refines `fit` when adjustment is on, then records its error.
    fn measure(&self, fit: &mut FitPrimitive) {
        if let Some(refiner) = &self.refiner {
            refiner.refine(fit);
        }
        fit.error = self
            .input
            .error_computer
            .compute_error(&fit.curve, fit.start_idx, fit.end_idx);
    }

    fn emit(&self, fit: FitPrimitive, out: &mut Vec<FitPrimitive>) {
        let ty = fit.curve.curve_type();
        self.input.debug.draw_curve(&fit.curve, ty.color(), ty.name());
        out.push(fit);
    }
}
