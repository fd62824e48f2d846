use crate::error::Result;
use crate::ipr::inflow_pressure;
use crate::params::SystemParameters;
use crate::vlp::{is_infeasible, VlpShape};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Number of samples on the shared rate grid, endpoints included.
pub const GRID_POINTS: usize = 41;

/// Inflow and outflow pressure evaluated at the same flow rate.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct CurvePoint {
    pub flow_rate: f64,
    pub inflow_pressure: f64,
    pub outflow_pressure: f64,
}

impl CurvePoint {
    /// Inflow minus outflow; changes sign where the curves cross.
    pub fn pressure_margin(&self) -> f64 {
        self.inflow_pressure - self.outflow_pressure
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct PressurePoint {
    pub flow_rate: f64,
    pub pressure: f64,
}

/// Grid spacing for a given maximum rate.
pub fn grid_step(max_flow_rate: f64) -> f64 {
    max_flow_rate / (GRID_POINTS - 1) as f64
}

/// Sample both curves on `GRID_POINTS` ascending rates spanning
/// `[0, max_flow_rate]`.
pub fn sample_curves(params: &SystemParameters) -> Result<Vec<CurvePoint>> {
    params.validate()?;

    let step = grid_step(params.max_flow_rate);
    let shape = VlpShape::for_params(params);

    let points: Vec<CurvePoint> = (0..GRID_POINTS)
        .map(|i| {
            // Index-based so the last rate is exactly Qmax.
            let flow_rate = if i == GRID_POINTS - 1 {
                params.max_flow_rate
            } else {
                step * i as f64
            };
            CurvePoint {
                flow_rate,
                inflow_pressure: inflow_pressure(params, flow_rate),
                outflow_pressure: shape.pressure(params.wellhead_pressure, flow_rate),
            }
        })
        .collect();

    let infeasible = points.iter().filter(|p| is_infeasible(p.outflow_pressure)).count();
    if infeasible > 0 {
        warn!(
            infeasible,
            tubing_diameter = params.tubing_diameter,
            gas_lift_rate = params.effective_gas_lift_rate(),
            "outflow pressure negative on part of the grid"
        );
    }
    debug!(points = points.len(), step, "sampled inflow/outflow curves");

    Ok(points)
}

pub fn compute_inflow_curve(params: &SystemParameters) -> Result<Vec<PressurePoint>> {
    Ok(sample_curves(params)?
        .iter()
        .map(|p| PressurePoint { flow_rate: p.flow_rate, pressure: p.inflow_pressure })
        .collect())
}

pub fn compute_outflow_curve(params: &SystemParameters) -> Result<Vec<PressurePoint>> {
    Ok(sample_curves(params)?
        .iter()
        .map(|p| PressurePoint { flow_rate: p.flow_rate, pressure: p.outflow_pressure })
        .collect())
}
