mod support;

use sketchfit::float_types::{INFINITY, PI};
use sketchfit::primitive_fitter::{SearchContext, fit_from_start};
use sketchfit::{
    CurveType, FitError, FitPrimitive, FittingInput, NoDebug, ParametricErrorComputer, Parameters, Polyline,
    fit_primitives,
};
use std::collections::BTreeMap;
use support::{RecordingSink, arc_stroke, circle_loop, l_stroke, no_corners, params, s_stroke, straight_stroke};

fn of_type(fits: &[FitPrimitive], ty: CurveType) -> Vec<&FitPrimitive> {
    fits.iter().filter(|f| f.curve_type() == ty).collect()
}

#[test]
fn collinear_lines_come_in_sign_pairs() {
    let poly = straight_stroke(5);
    let sink = RecordingSink::default();
    let fits = fit_primitives(&poly, &no_corners(&poly), &Parameters::default(), &sink).unwrap();

    let lines = of_type(&fits, CurveType::Line);
    // every span of at least two samples, once per sign orientation
    assert_eq!(lines.len(), 20);
    let mut spans: BTreeMap<(usize, usize), Vec<&FitPrimitive>> = BTreeMap::new();
    for &fit in &lines {
        spans.entry((fit.start_idx, fit.end_idx)).or_default().push(fit);
    }
    assert_eq!(spans.len(), 10);
    for ((start, end), pair) in spans {
        assert_eq!(pair.len(), 2, "span {start}..{end}");
        let (a, b) = (pair[0], pair[1]);
        assert_eq!((a.start_curv_sign, a.end_curv_sign), (1, 1));
        assert_eq!((b.start_curv_sign, b.end_curv_sign), (-1, -1));
        assert_eq!(a.error, b.error);
        assert_eq!(a.curve.params(), b.curve.params());
        assert_eq!(a.num_pts, end - start + 1);
    }
    // mirrored copies are not drawn
    assert_eq!(sink.count("Lines"), 10);
}

#[test]
fn lines_are_not_mirrored_without_inflection_accounting() {
    let poly = straight_stroke(5);
    let fits = fit_primitives(&poly, &no_corners(&poly), &params("Default", 1.0, false), &NoDebug).unwrap();
    let lines = of_type(&fits, CurveType::Line);
    assert_eq!(lines.len(), 10);
    assert!(lines.iter().all(|f| f.start_curv_sign == 1 && f.end_curv_sign == 1));
}

#[test]
fn pruning_is_monotonic_per_start_and_type() {
    let poly = l_stroke();
    for algorithm in ["Default", "Adjust"] {
        let fits = fit_primitives(&poly, &no_corners(&poly), &params(algorithm, 0.05, false), &NoDebug).unwrap();
        let mut runs: BTreeMap<(usize, CurveType), Vec<usize>> = BTreeMap::new();
        for fit in &fits {
            runs.entry((fit.start_idx, fit.curve_type())).or_default().push(fit.num_pts);
        }
        for ((start, ty), counts) in &runs {
            let expected: Vec<usize> = (ty.min_points()..ty.min_points() + counts.len()).collect();
            assert_eq!(counts, &expected, "{algorithm}: start {start}, {}", ty.name());
        }
        // the bend cuts the first line short
        let first_line = &runs[&(0, CurveType::Line)];
        assert_eq!(first_line.last(), Some(&6), "{algorithm}");
    }
}

#[test]
fn errors_respect_the_threshold() {
    let poly = s_stroke(30);
    let threshold = 0.1;
    let fits = fit_primitives(&poly, &no_corners(&poly), &params("Adjust", threshold, true), &NoDebug).unwrap();
    assert!(!fits.is_empty());
    for fit in &fits {
        assert!(fit.error >= 0.0);
        let span = poly.length_from_to(fit.start_idx, fit.end_idx);
        assert!(fit.error / span <= threshold * threshold);
        assert!(fit.num_pts >= fit.curve_type().min_points());
    }
}

#[test]
fn inflection_splits_carry_a_single_sign() {
    let poly = s_stroke(30);
    let fits = fit_primitives(&poly, &no_corners(&poly), &params("Default", 0.5, true), &NoDebug).unwrap();
    let clothoids = of_type(&fits, CurveType::Clothoid);
    let mixed: Vec<_> = clothoids.iter().filter(|f| f.start_curv_sign != f.end_curv_sign).collect();
    assert!(!mixed.is_empty(), "the stroke has an inflection");
    // every mixed-sign clothoid over a span is followed by split candidates over
    // the same span, tagged with one sign at both ends
    let single = clothoids
        .iter()
        .filter(|f| f.start_curv_sign == f.end_curv_sign)
        .filter(|f| mixed.iter().any(|m| m.start_idx == f.start_idx && m.end_idx == f.end_idx))
        .count();
    assert!(single > 0);
}

#[test]
fn corners_bound_spans() {
    let poly = arc_stroke(12, 5.0, 1.5);
    let mut corners = no_corners(&poly);
    corners[5] = true;
    let fits = fit_primitives(&poly, &corners, &params("Adjust", 1e3, true), &NoDebug).unwrap();

    for fit in &fits {
        if fit.start_idx < 5 {
            assert!(fit.end_idx <= 5, "span {}..{} crosses the corner", fit.start_idx, fit.end_idx);
        }
    }
    assert!(fits.iter().any(|f| f.start_idx == 0 && f.end_idx == 5));
    // a corner only ends spans, it does not stop them from starting there
    assert!(fits.iter().any(|f| f.start_idx == 5 && f.end_idx == 11));
}

#[test]
fn closed_loops_wrap_around_the_seam() {
    let poly = circle_loop(12, 3.0);
    let n = poly.len();
    let fits = fit_primitives(&poly, &no_corners(&poly), &Parameters::default(), &NoDebug).unwrap();

    assert!(fits.iter().any(|f| f.end_idx < f.start_idx));
    for fit in &fits {
        assert!(fit.num_pts <= n);
        assert_eq!((fit.end_idx + n - fit.start_idx) % n + 1, fit.num_pts);
    }
    // arcs fit a circle exactly, so some arc reaches all the way around
    assert!(of_type(&fits, CurveType::Arc).iter().any(|f| f.num_pts == n));
}

#[test]
fn unneeded_types_only_seed_short_spans() {
    let poly = arc_stroke(10, 4.0, PI / 2.0);
    let corners = no_corners(&poly);

    let mut p = params("Default", 1.0, false);
    p.line_cost = INFINITY;
    let fits = fit_primitives(&poly, &corners, &p, &NoDebug).unwrap();
    let lines = of_type(&fits, CurveType::Line);
    assert_eq!(lines.len(), 9);
    assert!(lines.iter().all(|f| f.num_pts == 2));
    assert!(of_type(&fits, CurveType::Arc).iter().any(|f| f.num_pts > 3));

    let mut p = params("Default", 1.0, false);
    p.arc_cost = INFINITY;
    let fits = fit_primitives(&poly, &corners, &p, &NoDebug).unwrap();
    let arcs = of_type(&fits, CurveType::Arc);
    assert_eq!(arcs.len(), 8);
    assert!(arcs.iter().all(|f| f.num_pts == 3));

    let mut p = params("Default", 1.0, true);
    p.clothoid_cost = INFINITY;
    let fits = fit_primitives(&poly, &corners, &p, &NoDebug).unwrap();
    assert!(of_type(&fits, CurveType::Clothoid).is_empty());
}

#[test]
fn output_is_grouped_by_start_then_type() {
    let poly = s_stroke(16);
    let p = params("Adjust", 0.3, true);
    let fits = fit_primitives(&poly, &no_corners(&poly), &p, &NoDebug).unwrap();
    let keys: Vec<(usize, CurveType)> = fits.iter().map(|f| (f.start_idx, f.curve_type())).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);

    // the per-start search reproduces each group
    let ec = ParametricErrorComputer::new(&poly);
    let corners = no_corners(&poly);
    let input = FittingInput {
        polyline: &poly,
        corners: &corners,
        error_computer: &ec,
        params: &p,
        debug: &NoDebug,
    };
    let ctx = SearchContext::new(&input, true);
    let from_three = fit_from_start(&ctx, 3);
    let expected: Vec<_> = fits.iter().filter(|f| f.start_idx == 3).collect();
    assert_eq!(from_three.len(), expected.len());
    for (a, b) in from_three.iter().zip(expected) {
        assert_eq!((a.end_idx, a.num_pts, a.error), (b.end_idx, b.num_pts, b.error));
    }
}

#[test]
#[should_panic]
fn start_out_of_range_panics() {
    let poly = straight_stroke(4);
    let ec = ParametricErrorComputer::new(&poly);
    let corners = no_corners(&poly);
    let p = Parameters::default();
    let input = FittingInput {
        polyline: &poly,
        corners: &corners,
        error_computer: &ec,
        params: &p,
        debug: &NoDebug,
    };
    fit_from_start(&SearchContext::new(&input, false), 4);
}

#[test]
fn bad_input_is_reported() {
    let poly: Polyline = straight_stroke(4);
    let err = fit_primitives(&poly, &[false; 3], &Parameters::default(), &NoDebug).unwrap_err();
    assert!(matches!(err, FitError::CornerCountMismatch { expected: 4, got: 3 }));

    let p = params("Mystery", 1.0, true);
    let err = fit_primitives(&poly, &no_corners(&poly), &p, &NoDebug).unwrap_err();
    assert!(matches!(err, FitError::UnknownAlgorithm(_)));

    let p = params("Default", -1.0, true);
    let err = fit_primitives(&poly, &no_corners(&poly), &p, &NoDebug).unwrap_err();
    assert!(matches!(err, FitError::InvalidParameter { name: "error_threshold", .. }));
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_search_matches_serial() {
    use sketchfit::primitive_fitter::{CandidateSearchOps, ParallelCandidateSearch, SerialCandidateSearch};

    let poly = s_stroke(24);
    let ec = ParametricErrorComputer::new(&poly);
    let corners = no_corners(&poly);
    let p = params("Adjust", 0.3, true);
    let input = FittingInput {
        polyline: &poly,
        corners: &corners,
        error_computer: &ec,
        params: &p,
        debug: &NoDebug,
    };
    let ctx = SearchContext::new(&input, true);
    let serial = SerialCandidateSearch::new().search(&ctx);
    let parallel = ParallelCandidateSearch::new().search(&ctx);
    assert_eq!(serial.len(), parallel.len());
    for (a, b) in serial.iter().zip(&parallel) {
        assert_eq!((a.start_idx, a.end_idx, a.curve_type(), a.error), (b.start_idx, b.end_idx, b.curve_type(), b.error));
    }
}
