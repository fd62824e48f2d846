//! Inflow performance relationship (reservoir deliverability).
//!
//! Undersaturated reservoirs follow a straight Darcy line down to the
//! bubble point and a Vogel curve, rescaled to the remaining rate range,
//! below it. Saturated reservoirs follow Vogel over the whole range.

use crate::params::SystemParameters;

/// Which analytic branch of the inflow model applies at a given rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InflowRegion {
    /// Pr <= Pb: Vogel over [0, Qmax].
    Saturated,
    /// Undersaturated, Q <= Qb: linear productivity index.
    Darcy,
    /// Undersaturated, Q > Qb: Vogel rescaled onto [Qb, Qmax].
    ScaledVogel,
}

pub fn inflow_region(params: &SystemParameters, flow_rate: f64) -> InflowRegion {
    if params.reservoir_pressure <= params.bubble_point_pressure {
        InflowRegion::Saturated
    } else if flow_rate <= params.bubble_point_flow_rate() {
        InflowRegion::Darcy
    } else {
        InflowRegion::ScaledVogel
    }
}

/// Vogel dimensionless inflow: 1 - 0.2 x - 0.8 x^2.
fn vogel(ratio: f64) -> f64 {
    1.0 - 0.2 * ratio - 0.8 * ratio.powi(2)
}

/// Flowing bottomhole pressure the reservoir sustains at `flow_rate`.
///
/// Defined for `flow_rate` in `[0, max_flow_rate]`; the result is clamped
/// to zero from below.
pub fn inflow_pressure(params: &SystemParameters, flow_rate: f64) -> f64 {
    let pr = params.reservoir_pressure;
    let pb = params.bubble_point_pressure;
    let q_max = params.max_flow_rate;

    let pressure = match inflow_region(params, flow_rate) {
        InflowRegion::Saturated => pr * vogel(flow_rate / q_max),
        InflowRegion::Darcy => pr - flow_rate / params.productivity_index,
        InflowRegion::ScaledVogel => {
            let q_b = params.bubble_point_flow_rate();
            let span = q_max - q_b;
            if span == 0.0 {
                // Qmax == Qb leaves no rate range for the Vogel branch.
                pb
            } else {
                pb * vogel((flow_rate - q_b) / span)
            }
        }
    };

    pressure.max(0.0)
}
