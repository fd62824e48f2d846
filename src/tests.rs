//! Test suite for the nodal engine
//!
//! Includes:
//! - Unit tests for the inflow and outflow correlations
//! - Grid and solver behaviour, including degenerate crossings
//! - Scenario comparison and recommendation logic
//! - End-to-end regression for the reference well

use crate::compare::{
    baseline_index, compare_scenarios, gas_lift_scenarios, recommend_gas_lift, recommend_tubing, tubing_scenarios,
    Recommendation, Scenario, ScenarioOverrides, LABEL_CURRENT, LABEL_HIGH_GAS_LIFT,
    LABEL_LARGE_TUBING, LABEL_NO_GAS_LIFT, LABEL_SMALL_TUBING,
};
use crate::curves::{
    compute_inflow_curve, compute_outflow_curve, grid_step, sample_curves, CurvePoint, GRID_POINTS,
};
use crate::error::NodalError;
use crate::ipr::{inflow_pressure, inflow_region, InflowRegion};
use crate::params::SystemParameters;
use crate::solver::{
    compute_operating_point, compute_resolved_operating_point, find_crossings, find_operating_point,
    resolve_operating_point, CrossingDirection, ReservoirState,
};
use crate::vlp::{outflow_pressure, VlpShape};

/// Reference well: Pr=3000, Pb=1800, J=1.2, Qmax=700, Pwh=150, D=3.5, no gas lift.
fn default_params() -> SystemParameters {
    SystemParameters::default()
}

/// Same reservoir with a low productivity index, so Qb=360 < Qmax and the
/// scaled Vogel branch is reached.
fn low_pi_params() -> SystemParameters {
    SystemParameters { productivity_index: 0.3, ..default_params() }
}

/// Outflow sits above inflow over the whole grid.
fn no_crossing_params() -> SystemParameters {
    SystemParameters {
        reservoir_pressure: 1000.0,
        bubble_point_pressure: 800.0,
        productivity_index: 1.0,
        tubing_diameter: 2.0,
        ..default_params()
    }
}

fn point(flow_rate: f64, inflow_pressure: f64, outflow_pressure: f64) -> CurvePoint {
    CurvePoint { flow_rate, inflow_pressure, outflow_pressure }
}

fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected} +/- {tol}, got {actual}"
    );
}

// =============================================================================
// Parameter Validation
// =============================================================================

#[test]
fn test_default_params_valid() {
    assert!(default_params().validate().is_ok());
}

fn invalid_field(params: SystemParameters) -> &'static str {
    match params.validate() {
        Err(NodalError::InvalidParameter { field, .. }) => field,
        other => panic!("expected InvalidParameter, got {other:?}"),
    }
}

#[test]
fn test_bubble_point_above_reservoir_rejected() {
    let params = SystemParameters { bubble_point_pressure: 3500.0, ..default_params() };
    assert_eq!(invalid_field(params), "bubble_point_pressure");
}

#[test]
fn test_non_positive_bubble_point_rejected() {
    let params = SystemParameters { bubble_point_pressure: 0.0, ..default_params() };
    assert_eq!(invalid_field(params), "bubble_point_pressure");
}

#[test]
fn test_non_positive_max_rate_rejected() {
    let params = SystemParameters { max_flow_rate: 0.0, ..default_params() };
    assert_eq!(invalid_field(params), "max_flow_rate");
    let params = SystemParameters { max_flow_rate: -10.0, ..default_params() };
    assert_eq!(invalid_field(params), "max_flow_rate");
}

#[test]
fn test_tubing_diameter_range() {
    assert_eq!(invalid_field(default_params().with_tubing_diameter(1.5)), "tubing_diameter");
    assert_eq!(invalid_field(default_params().with_tubing_diameter(5.5)), "tubing_diameter");
    assert!(default_params().with_tubing_diameter(2.0).validate().is_ok());
    assert!(default_params().with_tubing_diameter(5.0).validate().is_ok());
}

#[test]
fn test_negative_gas_lift_rate() {
    // Only checked when gas lift is on.
    assert_eq!(invalid_field(default_params().with_gas_lift(-0.5)), "gas_lift_rate");
    let disabled = SystemParameters { gas_lift_rate: -0.5, ..default_params() };
    assert!(disabled.validate().is_ok());
}

#[test]
fn test_non_finite_rejected() {
    let params = SystemParameters { productivity_index: f64::NAN, ..default_params() };
    assert_eq!(invalid_field(params), "productivity_index");
}

#[test]
fn test_invalid_params_rejected_before_sampling() {
    let params = SystemParameters { bubble_point_pressure: 3500.0, ..default_params() };
    assert!(sample_curves(&params).is_err());
    assert!(compute_operating_point(&params).is_err());
    assert!(compute_inflow_curve(&params).is_err());
}

// =============================================================================
// Inflow Model
// =============================================================================

#[test]
fn test_inflow_reference_values() {
    let params = default_params();
    assert_eq!(inflow_pressure(&params, 0.0), 3000.0);
    // Qb = 1440 > Qmax, so the whole range is on the Darcy line.
    assert_eq!(inflow_region(&params, 700.0), InflowRegion::Darcy);
    assert_close(inflow_pressure(&params, 700.0), 3000.0 - 700.0 / 1.2, 1e-9);
}

#[test]
fn test_inflow_reaches_zero_at_max_rate() {
    let params = low_pi_params();
    assert_eq!(inflow_region(&params, 700.0), InflowRegion::ScaledVogel);
    assert_close(inflow_pressure(&params, 700.0), 0.0, 1e-9);
}

#[test]
fn test_inflow_saturated_vogel() {
    let params = SystemParameters {
        reservoir_pressure: 2000.0,
        bubble_point_pressure: 2000.0,
        ..default_params()
    };
    assert_eq!(inflow_region(&params, 100.0), InflowRegion::Saturated);
    assert_eq!(inflow_pressure(&params, 0.0), 2000.0);
    // x = 0.5: 1 - 0.1 - 0.2 = 0.7
    assert_close(inflow_pressure(&params, 350.0), 1400.0, 1e-9);
    assert_close(inflow_pressure(&params, 700.0), 0.0, 1e-9);
}

#[test]
fn test_inflow_continuous_at_bubble_point() {
    let params = low_pi_params();
    let q_b = params.bubble_point_flow_rate();
    assert_close(q_b, 360.0, 1e-9);

    let darcy = inflow_pressure(&params, q_b);
    let vogel = inflow_pressure(&params, q_b + 1e-7);
    assert_eq!(inflow_region(&params, q_b), InflowRegion::Darcy);
    assert_eq!(inflow_region(&params, q_b + 1e-7), InflowRegion::ScaledVogel);
    assert_close(darcy, params.bubble_point_pressure, 1e-9);
    assert_close(vogel, darcy, 1e-4);
}

#[test]
fn test_inflow_degenerate_vogel_span() {
    // Qb = 0.5 * 1200 = 600 = Qmax
    let params = SystemParameters { productivity_index: 0.5, max_flow_rate: 600.0, ..default_params() };
    assert_eq!(inflow_pressure(&params, 650.0), params.bubble_point_pressure);
    assert!(inflow_pressure(&params, 650.0).is_finite());
}

#[test]
fn test_inflow_non_negative_and_non_increasing() {
    let cases = [
        default_params(),
        low_pi_params(),
        no_crossing_params(),
        SystemParameters { reservoir_pressure: 1800.0, ..default_params() },
        SystemParameters { productivity_index: 5.0, max_flow_rate: 2000.0, ..default_params() },
    ];
    for params in cases {
        let curve = compute_inflow_curve(&params).expect("valid params");
        for pair in curve.windows(2) {
            assert!(pair[1].pressure >= 0.0);
            assert!(
                pair[1].pressure <= pair[0].pressure + 1e-9,
                "inflow rises between {} and {} STB/d",
                pair[0].flow_rate,
                pair[1].flow_rate
            );
        }
    }
}

// =============================================================================
// Outflow Model
// =============================================================================

#[test]
fn test_vlp_shape_for_tubing() {
    let shape = VlpShape::for_tubing(3.5);
    assert_close(shape.a, 1080.0, 1e-9);
    assert_close(shape.b, 0.625, 1e-12);
    assert_close(shape.c, 220.0, 1e-9);
}

#[test]
fn test_vlp_reference_values() {
    let params = default_params();
    // Hydrostatic branch below 10 STB/d.
    assert_close(outflow_pressure(&params, 0.0), 1220.0, 1e-9);
    assert_close(outflow_pressure(&params, 9.9), 1220.0, 1e-9);
    // Q = 10 already takes the friction branch.
    assert_close(
        outflow_pressure(&params, 10.0),
        150.0 + 1080.0 - 220.0 * 0.1f64.sqrt() + 0.625 * 0.01 * 100.0,
        1e-9,
    );
    // 150 + 1080 - 220 * 1 + 0.625 * 1 * 100
    assert_close(outflow_pressure(&params, 100.0), 1072.5, 1e-9);
}

#[test]
fn test_vlp_u_shape() {
    let params = default_params();
    let low = outflow_pressure(&params, 0.0);
    let mid = outflow_pressure(&params, 100.0);
    let high = outflow_pressure(&params, 700.0);
    assert!(mid < low, "outflow should dip at moderate rate");
    assert!(high > mid, "friction should dominate at high rate");
}

#[test]
fn test_gas_lift_lowers_intercept() {
    for diameter in [2.0, 2.5, 3.0, 3.5, 4.0, 4.5, 5.0] {
        let plain = VlpShape::for_tubing(diameter);
        let lifted = plain.with_gas_lift(1.5);
        assert!(lifted.a < plain.a, "a should drop at D={diameter}");
        assert!(lifted.b > plain.b);
        assert!(lifted.c < plain.c);

        let on = default_params().with_tubing_diameter(diameter).with_gas_lift(1.5);
        let off = on.without_gas_lift();
        assert!(outflow_pressure(&on, 0.0) < outflow_pressure(&off, 0.0));
    }
}

#[test]
fn test_gas_lift_ignored_when_disabled() {
    let params = SystemParameters { gas_lift_rate: 1.5, ..default_params() };
    assert_eq!(VlpShape::for_params(&params), VlpShape::for_tubing(3.5));
    assert_eq!(params.effective_gas_lift_rate(), 0.0);
}

#[test]
fn test_outflow_not_clamped() {
    // a = 900 * (1 - 1.25) = -225
    let shape = VlpShape::for_tubing(5.0).with_gas_lift(5.0);
    assert_close(shape.pressure(0.0, 0.0), -235.0, 1e-9);

    let params = SystemParameters { wellhead_pressure: 0.0, ..default_params() }
        .with_tubing_diameter(5.0)
        .with_gas_lift(5.0);
    let curve = compute_outflow_curve(&params).expect("valid params");
    assert!(curve[0].pressure < 0.0);
}

// =============================================================================
// Curve Sampling
// =============================================================================

#[test]
fn test_grid_layout() {
    let params = default_params();
    let points = sample_curves(&params).expect("valid params");
    let step = grid_step(params.max_flow_rate);

    assert_eq!(points.len(), GRID_POINTS);
    assert_eq!(points[0].flow_rate, 0.0);
    assert_eq!(points[GRID_POINTS - 1].flow_rate, params.max_flow_rate);
    assert_close(step, 17.5, 1e-12);
    for (i, p) in points.iter().enumerate() {
        assert_close(p.flow_rate, step * i as f64, 1e-9);
    }
}

#[test]
fn test_curves_share_flow_rates() {
    let params = low_pi_params().with_gas_lift(0.8);
    let points = sample_curves(&params).expect("valid params");
    let inflow = compute_inflow_curve(&params).expect("valid params");
    let outflow = compute_outflow_curve(&params).expect("valid params");

    for ((p, i), o) in points.iter().zip(&inflow).zip(&outflow) {
        assert_eq!(p.flow_rate, i.flow_rate);
        assert_eq!(p.flow_rate, o.flow_rate);
        assert_eq!(p.inflow_pressure, inflow_pressure(&params, p.flow_rate));
        assert_eq!(p.outflow_pressure, outflow_pressure(&params, p.flow_rate));
    }
}

#[test]
fn test_sampling_is_deterministic() {
    let params = default_params();
    assert_eq!(sample_curves(&params).ok(), sample_curves(&params).ok());
}

// =============================================================================
// Intersection Solver
// =============================================================================

#[test]
fn test_no_crossing_returns_none() {
    let params = no_crossing_params();
    let points = sample_curves(&params).expect("valid params");
    assert!(points.iter().all(|p| p.outflow_pressure > p.inflow_pressure));
    assert_eq!(find_operating_point(&points), Ok(None));
    assert_eq!(compute_operating_point(&params), Ok(None));
    assert!(find_crossings(&points).expect("no degenerate segment").is_empty());
}

#[test]
fn test_crossing_inflow_falling() {
    let points = [point(0.0, 100.0, 50.0), point(10.0, 50.0, 100.0)];
    let op = find_operating_point(&points).expect("finite").expect("crossing");
    assert_close(op.flow_rate, 5.0, 1e-12);
    assert_close(op.pressure, 75.0, 1e-12);

    let crossings = find_crossings(&points).expect("finite");
    assert_eq!(crossings.len(), 1);
    assert_eq!(crossings[0].segment, 1);
    assert_eq!(crossings[0].direction, CrossingDirection::InflowFalling);
}

#[test]
fn test_crossing_inflow_rising() {
    let points = [point(0.0, 40.0, 60.0), point(20.0, 80.0, 60.0)];
    let op = find_operating_point(&points).expect("finite").expect("crossing");
    assert_close(op.flow_rate, 10.0, 1e-12);
    assert_close(op.pressure, 60.0, 1e-12);
    let crossings = find_crossings(&points).expect("finite");
    assert_eq!(crossings[0].direction, CrossingDirection::InflowRising);
}

#[test]
fn test_first_crossing_wins() {
    let points = [
        point(0.0, 110.0, 100.0),
        point(10.0, 90.0, 100.0),
        point(20.0, 110.0, 100.0),
        point(30.0, 90.0, 100.0),
    ];
    let op = find_operating_point(&points).expect("finite").expect("crossing");
    assert_close(op.flow_rate, 5.0, 1e-12);

    let crossings = find_crossings(&points).expect("finite");
    let directions: Vec<_> = crossings.iter().map(|c| c.direction).collect();
    assert_eq!(
        directions,
        [
            CrossingDirection::InflowFalling,
            CrossingDirection::InflowRising,
            CrossingDirection::InflowFalling
        ]
    );
    assert_eq!(crossings[0].point, op);
}

#[test]
fn test_tangent_touch_on_grid_point() {
    let points = [
        point(0.0, 105.0, 100.0),
        point(10.0, 100.0, 100.0),
        point(20.0, 105.0, 100.0),
    ];
    let op = find_operating_point(&points).expect("finite").expect("touch");
    assert_close(op.flow_rate, 10.0, 1e-12);
    assert_close(op.pressure, 100.0, 1e-12);
    // Reported once, not again as the start of the next segment.
    assert_eq!(find_crossings(&points).expect("finite").len(), 1);
}

#[test]
fn test_root_on_first_grid_point() {
    let points = [point(0.0, 100.0, 100.0), point(10.0, 90.0, 120.0)];
    let op = find_operating_point(&points).expect("finite").expect("root");
    assert_eq!(op.flow_rate, 0.0);
    assert_eq!(op.pressure, 100.0);
}

#[test]
fn test_coincident_segment_is_degenerate() {
    let points = [point(0.0, 100.0, 100.0), point(10.0, 90.0, 90.0)];
    assert_eq!(
        find_operating_point(&points),
        Err(NodalError::DegenerateIntersection { segment: 1 })
    );
    assert!(find_crossings(&points).is_err());
}

#[test]
fn test_degenerate_crossing_resolves_to_none() {
    let coincident = [point(0.0, 100.0, 100.0), point(10.0, 90.0, 90.0)];
    assert_eq!(resolve_operating_point(&coincident), Ok(None));

    let non_finite = [point(0.0, 100.0, 50.0), point(10.0, f64::NEG_INFINITY, 100.0)];
    assert_eq!(resolve_operating_point(&non_finite), Ok(None));

    // Ordinary crossings and invalid parameters pass through unchanged.
    let simple = [point(0.0, 100.0, 50.0), point(10.0, 50.0, 100.0)];
    assert_eq!(resolve_operating_point(&simple), find_operating_point(&simple));
    assert_eq!(
        compute_resolved_operating_point(&default_params()),
        compute_operating_point(&default_params())
    );
    let bad = SystemParameters { productivity_index: 0.0, ..default_params() };
    assert!(matches!(
        compute_resolved_operating_point(&bad),
        Err(NodalError::InvalidParameter { field: "productivity_index", .. })
    ));
}

#[test]
fn test_non_finite_input_is_degenerate() {
    let points = [point(0.0, 100.0, 50.0), point(10.0, f64::NEG_INFINITY, 100.0)];
    assert_eq!(
        find_operating_point(&points),
        Err(NodalError::DegenerateIntersection { segment: 1 })
    );
}

#[test]
fn test_crossing_within_bracketing_segment() {
    let cases = [
        default_params(),
        low_pi_params(),
        default_params().with_gas_lift(1.5),
        default_params().with_tubing_diameter(2.0),
        default_params().with_tubing_diameter(5.0),
    ];
    for params in cases {
        let points = sample_curves(&params).expect("valid params");
        for crossing in find_crossings(&points).expect("finite") {
            let lo = points[crossing.segment - 1].flow_rate;
            let hi = points[crossing.segment].flow_rate;
            assert!(
                (lo..=hi).contains(&crossing.point.flow_rate),
                "crossing {} outside [{lo}, {hi}]",
                crossing.point.flow_rate
            );
        }
    }
}

#[test]
fn test_short_series() {
    assert_eq!(find_operating_point(&[]), Ok(None));
    assert_eq!(find_operating_point(&[point(0.0, 1.0, 0.0)]), Ok(None));
}

// =============================================================================
// Scenario Comparison
// =============================================================================

#[test]
fn test_tubing_comparison() {
    let result = compare_scenarios(&default_params(), &tubing_scenarios()).expect("valid");
    assert_eq!(result.baseline, LABEL_SMALL_TUBING);
    assert_eq!(result.rows.len(), 3);

    let baseline = result.baseline_row().expect("baseline row");
    assert_eq!(baseline.flow_improvement_pct, Some(0.0));

    let small = result.operating_point(LABEL_SMALL_TUBING).expect("small solves");
    let large = result.operating_point(LABEL_LARGE_TUBING).expect("large solves");
    assert!(large.flow_rate > small.flow_rate);

    let large_row = result.get(LABEL_LARGE_TUBING).expect("row");
    let expected = (large.flow_rate - small.flow_rate) / small.flow_rate * 100.0;
    assert_close(large_row.flow_improvement_pct.expect("improvement"), expected, 1e-12);
    assert_close(large_row.drawdown.expect("drawdown"), 3000.0 - large.pressure, 1e-12);
    assert_eq!(large_row.reservoir_state, Some(ReservoirState::Undersaturated));

    assert_eq!(recommend_tubing(&result), Some(Recommendation::IncreaseTubing));
}

#[test]
fn test_gas_lift_comparison() {
    let base = default_params();
    let result = compare_scenarios(&base, &gas_lift_scenarios()).expect("valid");
    assert_eq!(result.baseline, LABEL_NO_GAS_LIFT);
    assert_eq!(result.baseline_row().and_then(|r| r.flow_improvement_pct), Some(0.0));
    assert_eq!(recommend_gas_lift(&base, &result), Some(Recommendation::InstallGasLift));

    // With gas lift already on at 1.0, more injection costs rate for this well.
    let lifted = base.with_gas_lift(1.0);
    let result = compare_scenarios(&lifted, &gas_lift_scenarios()).expect("valid");
    let current = result.operating_point(LABEL_CURRENT).expect("current solves");
    let high = result.operating_point(LABEL_HIGH_GAS_LIFT).expect("high solves");
    assert!(high.flow_rate < current.flow_rate);
    assert_eq!(recommend_gas_lift(&lifted, &result), Some(Recommendation::KeepGasLift));
}

#[test]
fn test_first_entry_is_default_baseline() {
    let scenarios = [
        Scenario::new("a", ScenarioOverrides { tubing_diameter: Some(3.0), ..Default::default() }),
        Scenario::new("b", ScenarioOverrides { tubing_diameter: Some(4.0), ..Default::default() }),
    ];
    let result = compare_scenarios(&default_params(), &scenarios).expect("valid");
    assert_eq!(result.baseline, "a");
    assert_eq!(result.rows[0].flow_improvement_pct, Some(0.0));
}

#[test]
fn test_named_baseline_without_flag() {
    let scenarios = [
        Scenario::new(LABEL_CURRENT, ScenarioOverrides::default()),
        Scenario::new(
            LABEL_NO_GAS_LIFT,
            ScenarioOverrides { gas_lift_enabled: Some(false), ..Default::default() },
        ),
    ];
    let result = compare_scenarios(&default_params().with_gas_lift(1.0), &scenarios).expect("valid");
    assert_eq!(result.baseline, LABEL_NO_GAS_LIFT);
    assert_eq!(result.get(LABEL_NO_GAS_LIFT).and_then(|r| r.flow_improvement_pct), Some(0.0));
    assert!(result.get(LABEL_CURRENT).and_then(|r| r.flow_improvement_pct).is_some());

    let tubing = [
        Scenario::new(LABEL_LARGE_TUBING, ScenarioOverrides::default()),
        Scenario::new(LABEL_SMALL_TUBING, ScenarioOverrides::default()),
    ];
    assert_eq!(baseline_index(&tubing), 1);

    // "no gas lift" outranks "small tubing"; an explicit flag outranks both.
    let mixed = [
        Scenario::new(LABEL_SMALL_TUBING, ScenarioOverrides::default()),
        Scenario::new(LABEL_NO_GAS_LIFT, ScenarioOverrides::default()),
        Scenario::new("chosen", ScenarioOverrides::default()),
    ];
    assert_eq!(baseline_index(&mixed), 1);
    let mut flagged = mixed.to_vec();
    flagged[2].baseline = true;
    assert_eq!(baseline_index(&flagged), 2);
}

#[test]
fn test_na_rows_excluded_from_percentages() {
    let dead = ScenarioOverrides {
        reservoir_pressure: Some(1000.0),
        bubble_point_pressure: Some(800.0),
        productivity_index: Some(1.0),
        tubing_diameter: Some(2.0),
        ..Default::default()
    };
    let scenarios = [
        Scenario::new("live", ScenarioOverrides::default()),
        Scenario::new("dead", dead),
    ];
    let result = compare_scenarios(&default_params(), &scenarios).expect("valid");
    let row = result.get("dead").expect("row kept");
    assert_eq!(row.operating_point, None);
    assert_eq!(row.drawdown, None);
    assert_eq!(row.flow_improvement_pct, None);
    assert_eq!(result.get("live").and_then(|r| r.flow_improvement_pct), Some(0.0));

    // An N/A baseline leaves every row without an improvement figure.
    let scenarios = [
        Scenario::new("dead", dead).as_baseline(),
        Scenario::new("live", ScenarioOverrides::default()),
    ];
    let result = compare_scenarios(&default_params(), &scenarios).expect("valid");
    assert!(result.rows.iter().all(|r| r.flow_improvement_pct.is_none()));
    assert!(result.get("live").and_then(|r| r.operating_point).is_some());
}

#[test]
fn test_comparison_rejects_bad_input() {
    assert!(matches!(
        compare_scenarios(&default_params(), &[]),
        Err(NodalError::InvalidParameter { field: "scenarios", .. })
    ));

    let twice = [
        Scenario::new("x", ScenarioOverrides::default()),
        Scenario::new("x", ScenarioOverrides::default()),
    ];
    assert!(compare_scenarios(&default_params(), &twice).is_err());

    let out_of_range = [Scenario::new(
        "huge",
        ScenarioOverrides { tubing_diameter: Some(6.0), ..Default::default() },
    )];
    assert!(matches!(
        compare_scenarios(&default_params(), &out_of_range),
        Err(NodalError::InvalidParameter { field: "tubing_diameter", .. })
    ));
}

// =============================================================================
// Regression Tests
// =============================================================================

#[test]
fn test_regression_reference_well() {
    let params = default_params();
    let points = sample_curves(&params).expect("valid params");

    let crossings = find_crossings(&points).expect("finite");
    assert_eq!(crossings.len(), 1, "reference well has exactly one crossing");
    assert_eq!(crossings[0].direction, CrossingDirection::InflowFalling);

    let op = compute_operating_point(&params).expect("valid").expect("operating point");
    assert_eq!(op, crossings[0].point);
    assert!(op.flow_rate > 525.0 && op.flow_rate < 542.5, "q = {}", op.flow_rate);
    assert!(op.pressure > 2540.0 && op.pressure < 2560.0, "pwf = {}", op.pressure);

    // Closed-form curves at the reported rate agree within the grid step.
    let tol = grid_step(params.max_flow_rate);
    assert!((inflow_pressure(&params, op.flow_rate) - op.pressure).abs() < tol);
    assert!((outflow_pressure(&params, op.flow_rate) - op.pressure).abs() < tol);

    assert_close(op.drawdown(params.reservoir_pressure), 3000.0 - op.pressure, 1e-12);
    assert_eq!(op.reservoir_state(params.bubble_point_pressure), ReservoirState::Undersaturated);
}

#[test]
fn test_regression_saturated_operating_point() {
    let params = low_pi_params();
    let op = compute_operating_point(&params).expect("valid").expect("operating point");
    assert!(op.pressure < params.bubble_point_pressure);
    assert_eq!(op.reservoir_state(params.bubble_point_pressure), ReservoirState::Saturated);
}
