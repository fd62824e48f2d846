use crate::error::{NodalError, Result};
use serde::{Deserialize, Serialize};

/// Supported tubing inner diameters, inches.
pub const TUBING_DIAMETER_MIN: f64 = 2.0;
pub const TUBING_DIAMETER_MAX: f64 = 5.0;

/// Inputs for one nodal-analysis calculation.
///
/// Units: pressures in psi, rates in STB/d, productivity index in
/// STB/d/psi, tubing diameter in inches, gas lift rate in MMscf/d.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SystemParameters {
    pub reservoir_pressure: f64,
    pub bubble_point_pressure: f64,
    pub productivity_index: f64,
    pub max_flow_rate: f64,
    pub wellhead_pressure: f64,
    pub tubing_diameter: f64,
    pub gas_lift_enabled: bool,
    /// Only read when `gas_lift_enabled` is set.
    pub gas_lift_rate: f64,
}

impl Default for SystemParameters {
    fn default() -> Self {
        Self {
            reservoir_pressure: 3000.0,
            bubble_point_pressure: 1800.0,
            productivity_index: 1.2,
            max_flow_rate: 700.0,
            wellhead_pressure: 150.0,
            tubing_diameter: 3.5,
            gas_lift_enabled: false,
            gas_lift_rate: 1.0,
        }
    }
}

impl SystemParameters {
    pub fn with_tubing_diameter(mut self, diameter: f64) -> Self {
        self.tubing_diameter = diameter;
        self
    }

    pub fn with_gas_lift(mut self, rate: f64) -> Self {
        self.gas_lift_enabled = true;
        self.gas_lift_rate = rate;
        self
    }

    pub fn without_gas_lift(mut self) -> Self {
        self.gas_lift_enabled = false;
        self
    }

    /// Gas lift rate actually applied to the outflow model (zero when disabled).
    pub fn effective_gas_lift_rate(&self) -> f64 {
        if self.gas_lift_enabled {
            self.gas_lift_rate
        } else {
            0.0
        }
    }

    /// Flow rate at which the reservoir reaches bubble point, `J * (Pr - Pb)`.
    pub fn bubble_point_flow_rate(&self) -> f64 {
        self.productivity_index * (self.reservoir_pressure - self.bubble_point_pressure)
    }

    /// Reject parameter sets the models are not defined for. Nothing is clamped.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("reservoir_pressure", self.reservoir_pressure),
            ("bubble_point_pressure", self.bubble_point_pressure),
            ("productivity_index", self.productivity_index),
            ("max_flow_rate", self.max_flow_rate),
            ("wellhead_pressure", self.wellhead_pressure),
            ("tubing_diameter", self.tubing_diameter),
            ("gas_lift_rate", self.gas_lift_rate),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(NodalError::invalid(field, format!("must be finite, got {value}")));
            }
        }

        if self.bubble_point_pressure <= 0.0 {
            return Err(NodalError::invalid(
                "bubble_point_pressure",
                format!("must be positive, got {}", self.bubble_point_pressure),
            ));
        }
        if self.bubble_point_pressure > self.reservoir_pressure {
            return Err(NodalError::invalid(
                "bubble_point_pressure",
                format!(
                    "must not exceed reservoir_pressure ({} > {})",
                    self.bubble_point_pressure, self.reservoir_pressure
                ),
            ));
        }
        if self.productivity_index <= 0.0 {
            return Err(NodalError::invalid(
                "productivity_index",
                format!("must be positive, got {}", self.productivity_index),
            ));
        }
        if self.max_flow_rate <= 0.0 {
            return Err(NodalError::invalid(
                "max_flow_rate",
                format!("must be positive, got {}", self.max_flow_rate),
            ));
        }
        if self.wellhead_pressure < 0.0 {
            return Err(NodalError::invalid(
                "wellhead_pressure",
                format!("must be non-negative, got {}", self.wellhead_pressure),
            ));
        }
        if !(TUBING_DIAMETER_MIN..=TUBING_DIAMETER_MAX).contains(&self.tubing_diameter) {
            return Err(NodalError::invalid(
                "tubing_diameter",
                format!(
                    "must be in [{TUBING_DIAMETER_MIN}, {TUBING_DIAMETER_MAX}] in, got {}",
                    self.tubing_diameter
                ),
            ));
        }
        if self.gas_lift_enabled && self.gas_lift_rate < 0.0 {
            return Err(NodalError::invalid(
                "gas_lift_rate",
                format!("must be non-negative when gas lift is enabled, got {}", self.gas_lift_rate),
            ));
        }
        Ok(())
    }
}
