//! Scenario comparison: solve the same well under several parameter
//! overrides and report each operating point against a baseline.

use crate::error::{NodalError, Result};
use crate::params::SystemParameters;
use crate::solver::{compute_resolved_operating_point, OperatingPoint, ReservoirState};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

pub const SMALL_TUBING_DIAMETER: f64 = 2.5;
pub const LARGE_TUBING_DIAMETER: f64 = 4.5;
pub const LOW_GAS_LIFT_RATE: f64 = 0.5;
pub const HIGH_GAS_LIFT_RATE: f64 = 1.5;

pub const LABEL_CURRENT: &str = "current";
pub const LABEL_SMALL_TUBING: &str = "small tubing";
pub const LABEL_LARGE_TUBING: &str = "large tubing";
pub const LABEL_NO_GAS_LIFT: &str = "no gas lift";
pub const LABEL_LOW_GAS_LIFT: &str = "low gas lift";
pub const LABEL_HIGH_GAS_LIFT: &str = "high gas lift";

/// Fields a scenario may change relative to the base parameters.
/// Unset fields keep the base value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScenarioOverrides {
    pub tubing_diameter: Option<f64>,
    pub gas_lift_enabled: Option<bool>,
    pub gas_lift_rate: Option<f64>,
    pub reservoir_pressure: Option<f64>,
    pub bubble_point_pressure: Option<f64>,
    pub productivity_index: Option<f64>,
}

impl ScenarioOverrides {
    pub fn apply(&self, base: &SystemParameters) -> SystemParameters {
        SystemParameters {
            tubing_diameter: self.tubing_diameter.unwrap_or(base.tubing_diameter),
            gas_lift_enabled: self.gas_lift_enabled.unwrap_or(base.gas_lift_enabled),
            gas_lift_rate: self.gas_lift_rate.unwrap_or(base.gas_lift_rate),
            reservoir_pressure: self.reservoir_pressure.unwrap_or(base.reservoir_pressure),
            bubble_point_pressure: self.bubble_point_pressure.unwrap_or(base.bubble_point_pressure),
            productivity_index: self.productivity_index.unwrap_or(base.productivity_index),
            ..*base
        }
    }
}

/// A labelled variant of the base well.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Scenario {
    pub label: String,
    /// Percent improvements are measured against this scenario.
    #[serde(default)]
    pub baseline: bool,
    #[serde(flatten)]
    pub overrides: ScenarioOverrides,
}

impl Scenario {
    pub fn new(label: impl Into<String>, overrides: ScenarioOverrides) -> Self {
        Self { label: label.into(), baseline: false, overrides }
    }

    pub fn as_baseline(mut self) -> Self {
        self.baseline = true;
        self
    }
}

/// One line of the comparison table. Derived metrics are `None` for
/// N/A rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioRow {
    pub label: String,
    pub params: SystemParameters,
    pub operating_point: Option<OperatingPoint>,
    pub drawdown: Option<f64>,
    pub reservoir_state: Option<ReservoirState>,
    pub flow_improvement_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub baseline: String,
    pub rows: Vec<ScenarioRow>,
}

impl ComparisonResult {
    pub fn get(&self, label: &str) -> Option<&ScenarioRow> {
        self.rows.iter().find(|row| row.label == label)
    }

    pub fn operating_point(&self, label: &str) -> Option<OperatingPoint> {
        self.get(label).and_then(|row| row.operating_point)
    }

    pub fn baseline_row(&self) -> Option<&ScenarioRow> {
        self.get(&self.baseline)
    }
}

/// Index of the reference scenario: the first one flagged `baseline`,
/// else the first labelled [`LABEL_NO_GAS_LIFT`], else the first labelled
/// [`LABEL_SMALL_TUBING`], else the first entry.
pub fn baseline_index(scenarios: &[Scenario]) -> usize {
    scenarios
        .iter()
        .position(|s| s.baseline)
        .or_else(|| scenarios.iter().position(|s| s.label == LABEL_NO_GAS_LIFT))
        .or_else(|| scenarios.iter().position(|s| s.label == LABEL_SMALL_TUBING))
        .unwrap_or(0)
}

/// Solve every scenario and derive drawdown and percent flow improvement.
///
/// The baseline is chosen by [`baseline_index`]. A scenario whose
/// crossing cannot be interpolated is kept as an N/A row. When the
/// baseline has no operating point (or zero flow) no row carries an
/// improvement figure.
pub fn compare_scenarios(base: &SystemParameters, scenarios: &[Scenario]) -> Result<ComparisonResult> {
    if scenarios.is_empty() {
        return Err(NodalError::invalid("scenarios", "at least one scenario is required"));
    }
    let mut seen = HashSet::new();
    for scenario in scenarios {
        if !seen.insert(scenario.label.as_str()) {
            return Err(NodalError::invalid(
                "scenarios",
                format!("duplicate scenario label '{}'", scenario.label),
            ));
        }
    }

    let baseline_index = baseline_index(scenarios);

    let mut rows = Vec::with_capacity(scenarios.len());
    for scenario in scenarios {
        let params = scenario.overrides.apply(base);
        let operating_point = compute_resolved_operating_point(&params)?;
        debug!(label = %scenario.label, ?operating_point, "scenario solved");
        rows.push(ScenarioRow {
            label: scenario.label.clone(),
            params,
            operating_point,
            drawdown: operating_point.map(|p| p.drawdown(params.reservoir_pressure)),
            reservoir_state: operating_point.map(|p| p.reservoir_state(params.bubble_point_pressure)),
            flow_improvement_pct: None,
        });
    }

    let baseline_flow = rows[baseline_index]
        .operating_point
        .map(|p| p.flow_rate)
        .filter(|&q| q > 0.0);

    if let Some(base_q) = baseline_flow {
        for (i, row) in rows.iter_mut().enumerate() {
            row.flow_improvement_pct = row.operating_point.map(|p| {
                if i == baseline_index {
                    0.0
                } else {
                    (p.flow_rate - base_q) / base_q * 100.0
                }
            });
        }
    }

    Ok(ComparisonResult {
        baseline: scenarios[baseline_index].label.clone(),
        rows,
    })
}

/// Small tubing (baseline), the base well as given, and large tubing.
pub fn tubing_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new(
            LABEL_SMALL_TUBING,
            ScenarioOverrides { tubing_diameter: Some(SMALL_TUBING_DIAMETER), ..Default::default() },
        )
        .as_baseline(),
        Scenario::new(LABEL_CURRENT, ScenarioOverrides::default()),
        Scenario::new(
            LABEL_LARGE_TUBING,
            ScenarioOverrides { tubing_diameter: Some(LARGE_TUBING_DIAMETER), ..Default::default() },
        ),
    ]
}

/// No gas lift (baseline), low and high injection, and the base well as given.
pub fn gas_lift_scenarios() -> Vec<Scenario> {
    let lift = |rate: f64| ScenarioOverrides {
        gas_lift_enabled: Some(true),
        gas_lift_rate: Some(rate),
        ..Default::default()
    };
    vec![
        Scenario::new(
            LABEL_NO_GAS_LIFT,
            ScenarioOverrides { gas_lift_enabled: Some(false), ..Default::default() },
        )
        .as_baseline(),
        Scenario::new(LABEL_LOW_GAS_LIFT, lift(LOW_GAS_LIFT_RATE)),
        Scenario::new(LABEL_CURRENT, ScenarioOverrides::default()),
        Scenario::new(LABEL_HIGH_GAS_LIFT, lift(HIGH_GAS_LIFT_RATE)),
    ]
}

/// Design action suggested by a preset comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    IncreaseTubing,
    ReduceTubing,
    KeepTubing,
    IncreaseGasLift,
    KeepGasLift,
    InstallGasLift,
}

/// Read a [`tubing_scenarios`] comparison. `None` when the current well
/// or either tubing alternative has no operating point.
pub fn recommend_tubing(result: &ComparisonResult) -> Option<Recommendation> {
    let current = result.operating_point(LABEL_CURRENT)?;
    let small = result.operating_point(LABEL_SMALL_TUBING)?;
    let large = result.operating_point(LABEL_LARGE_TUBING)?;

    let recommendation = if large.flow_rate > current.flow_rate && large.flow_rate > small.flow_rate {
        Recommendation::IncreaseTubing
    } else if small.flow_rate > current.flow_rate {
        Recommendation::ReduceTubing
    } else {
        Recommendation::KeepTubing
    };
    Some(recommendation)
}

/// Read a [`gas_lift_scenarios`] comparison for a base well. `None` when
/// the current well has no operating point, or gas lift is on and the
/// high-injection case has none.
pub fn recommend_gas_lift(base: &SystemParameters, result: &ComparisonResult) -> Option<Recommendation> {
    let current = result.operating_point(LABEL_CURRENT)?;
    if !base.gas_lift_enabled {
        return Some(Recommendation::InstallGasLift);
    }
    let high = result.operating_point(LABEL_HIGH_GAS_LIFT)?;
    if high.flow_rate > current.flow_rate {
        Some(Recommendation::IncreaseGasLift)
    } else {
        Some(Recommendation::KeepGasLift)
    }
}
