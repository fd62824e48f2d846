//! Vertical lift performance (tubing outflow).
//!
//! A reduced-order U-shaped curve: a hydrostatic intercept `a`, a
//! low-rate pressure drop scaled by `c`, and high-rate friction growth
//! scaled by `b`. All three depend on tubing diameter and are rescaled
//! when gas lift lightens the fluid column.

use crate::params::SystemParameters;
use serde::Serialize;

/// Below this rate the square-root term is dropped and only the
/// hydrostatic column is kept.
pub const LOW_RATE_THRESHOLD: f64 = 10.0;

/// Rate normalisation used by the shape terms, STB/d.
const RATE_SCALE: f64 = 100.0;

/// Shape coefficients of the outflow curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VlpShape {
    /// Minimum-point intercept, psi.
    pub a: f64,
    /// High-rate friction curvature.
    pub b: f64,
    /// Low-rate slope factor.
    pub c: f64,
}

impl VlpShape {
    pub fn for_tubing(diameter: f64) -> Self {
        Self {
            a: 1500.0 - 120.0 * diameter,
            b: 0.8 - 0.05 * diameter,
            c: 150.0 + 20.0 * diameter,
        }
    }

    /// Rescale for gas injection at `rate` MMscf/d: shorter hydrostatic
    /// column, more friction at high rate, smaller initial drop.
    pub fn with_gas_lift(self, rate: f64) -> Self {
        Self {
            a: self.a * (1.0 - 0.25 * rate),
            b: self.b * (1.0 + 0.15 * rate),
            c: self.c * (1.0 - 0.1 * rate),
        }
    }

    pub fn for_params(params: &SystemParameters) -> Self {
        let shape = Self::for_tubing(params.tubing_diameter);
        if params.gas_lift_enabled {
            shape.with_gas_lift(params.gas_lift_rate)
        } else {
            shape
        }
    }

    /// Pressure required at the bottom of the tubing to lift `flow_rate`
    /// against `wellhead_pressure`. Not clamped.
    pub fn pressure(&self, wellhead_pressure: f64, flow_rate: f64) -> f64 {
        if flow_rate < LOW_RATE_THRESHOLD {
            return wellhead_pressure + self.a - 10.0;
        }
        let x = flow_rate / RATE_SCALE;
        wellhead_pressure + self.a - self.c * x.sqrt() + self.b * x.powi(2) * RATE_SCALE
    }
}

/// Outflow pressure at `flow_rate`. A negative value means the tubing
/// cannot be operated at that rate; it is returned as-is.
pub fn outflow_pressure(params: &SystemParameters, flow_rate: f64) -> f64 {
    VlpShape::for_params(params).pressure(params.wellhead_pressure, flow_rate)
}

pub fn is_infeasible(pressure: f64) -> bool {
    pressure < 0.0
}
