//! Operating point search over a sampled inflow/outflow grid.
//!
//! The curves are compared pointwise; a grid segment brackets a crossing
//! when the inflow-minus-outflow margin changes sign across it, or hits
//! exactly zero at its upper end. The crossing is located by linear
//! interpolation of both curves over that segment.

use crate::curves::{sample_curves, CurvePoint};
use crate::error::{NodalError, Result};
use crate::params::SystemParameters;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Flow rate / bottomhole pressure pair where inflow meets outflow.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct OperatingPoint {
    pub flow_rate: f64,
    pub pressure: f64,
}

/// Fluid state at the bottomhole operating pressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservoirState {
    /// Operating pressure below bubble point: free gas at the sandface.
    Saturated,
    Undersaturated,
}

impl OperatingPoint {
    /// Reservoir pressure minus flowing bottomhole pressure.
    pub fn drawdown(&self, reservoir_pressure: f64) -> f64 {
        reservoir_pressure - self.pressure
    }

    pub fn reservoir_state(&self, bubble_point_pressure: f64) -> ReservoirState {
        if self.pressure < bubble_point_pressure {
            ReservoirState::Saturated
        } else {
            ReservoirState::Undersaturated
        }
    }
}

/// How the curves cross, read in ascending flow rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossingDirection {
    /// Inflow drops from above outflow to below it. This is the stable
    /// crossing of a normal well.
    InflowFalling,
    /// Inflow climbs from below outflow to above it.
    InflowRising,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Crossing {
    /// Index `i` of the upper grid point of the bracketing segment `(i-1, i)`.
    pub segment: usize,
    pub direction: CrossingDirection,
    pub point: OperatingPoint,
}

fn brackets(segment: usize, prev_margin: f64, curr_margin: f64) -> bool {
    (prev_margin > 0.0 && curr_margin < 0.0)
        || (prev_margin < 0.0 && curr_margin > 0.0)
        || curr_margin == 0.0
        // A root on the very first grid point has no earlier segment to claim it.
        || (segment == 1 && prev_margin == 0.0)
}

/// Linear interpolation of both curves across segment `(segment-1, segment)`.
fn interpolate(prev: &CurvePoint, curr: &CurvePoint, segment: usize) -> Result<OperatingPoint> {
    let inflow_delta = curr.inflow_pressure - prev.inflow_pressure;
    let outflow_delta = curr.outflow_pressure - prev.outflow_pressure;
    let denominator = inflow_delta - outflow_delta;

    if denominator == 0.0 {
        debug!(segment, "zero interpolation denominator");
        return Err(NodalError::DegenerateIntersection { segment });
    }

    let ratio = (prev.outflow_pressure - prev.inflow_pressure) / denominator;
    let flow_rate = prev.flow_rate + ratio * (curr.flow_rate - prev.flow_rate);
    let pressure = prev.inflow_pressure + ratio * inflow_delta;

    if !(ratio.is_finite() && flow_rate.is_finite() && pressure.is_finite()) {
        debug!(segment, ratio, "non-finite interpolation result");
        return Err(NodalError::DegenerateIntersection { segment });
    }

    Ok(OperatingPoint { flow_rate, pressure })
}

/// Every bracketed crossing on the grid, in ascending flow rate.
pub fn find_crossings(points: &[CurvePoint]) -> Result<Vec<Crossing>> {
    let mut crossings = Vec::new();
    for (offset, pair) in points.windows(2).enumerate() {
        let segment = offset + 1;
        let (prev, curr) = (&pair[0], &pair[1]);
        let (prev_margin, curr_margin) = (prev.pressure_margin(), curr.pressure_margin());
        if !brackets(segment, prev_margin, curr_margin) {
            continue;
        }

        let direction = if prev_margin >= 0.0 && curr_margin <= 0.0 {
            CrossingDirection::InflowFalling
        } else {
            CrossingDirection::InflowRising
        };
        crossings.push(Crossing {
            segment,
            direction,
            point: interpolate(prev, curr, segment)?,
        });
    }
    Ok(crossings)
}

/// First crossing by ascending flow rate, or `None` when the curves never
/// meet on the grid. Later crossings are not examined.
pub fn find_operating_point(points: &[CurvePoint]) -> Result<Option<OperatingPoint>> {
    for (offset, pair) in points.windows(2).enumerate() {
        let segment = offset + 1;
        let (prev, curr) = (&pair[0], &pair[1]);
        if brackets(segment, prev.pressure_margin(), curr.pressure_margin()) {
            let point = interpolate(prev, curr, segment)?;
            debug!(segment, flow_rate = point.flow_rate, pressure = point.pressure, "operating point");
            return Ok(Some(point));
        }
    }
    Ok(None)
}

/// Sample both curves for `params` and solve for the operating point.
pub fn compute_operating_point(params: &SystemParameters) -> Result<Option<OperatingPoint>> {
    let points = sample_curves(params)?;
    let point = find_operating_point(&points)?;
    if point.is_none() {
        debug!(
            tubing_diameter = params.tubing_diameter,
            gas_lift_rate = params.effective_gas_lift_rate(),
            "inflow and outflow curves do not cross"
        );
    }
    Ok(point)
}

/// Like [`find_operating_point`], but a degenerate crossing is reported as
/// "no operating point" instead of an error. Used where one unsolvable case
/// must not abort a batch.
pub fn resolve_operating_point(points: &[CurvePoint]) -> Result<Option<OperatingPoint>> {
    match find_operating_point(points) {
        Err(NodalError::DegenerateIntersection { segment }) => {
            warn!(segment, "degenerate crossing, reporting no operating point");
            Ok(None)
        }
        other => other,
    }
}

/// Sample both curves for `params` and resolve the operating point,
/// mapping a degenerate crossing to `None`. Invalid parameters are still
/// an error.
pub fn compute_resolved_operating_point(params: &SystemParameters) -> Result<Option<OperatingPoint>> {
    match compute_operating_point(params) {
        Err(NodalError::DegenerateIntersection { segment }) => {
            warn!(
                segment,
                tubing_diameter = params.tubing_diameter,
                gas_lift_rate = params.effective_gas_lift_rate(),
                "degenerate crossing, reporting no operating point"
            );
            Ok(None)
        }
        other => other,
    }
}
