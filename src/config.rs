use crate::compare::Scenario;
use crate::params::{SystemParameters, TUBING_DIAMETER_MAX, TUBING_DIAMETER_MIN};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const PROGRAM_NAME: &str = "nodal";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Root {
    pub program: Program,
    #[serde(default)]
    pub well: SystemParameters,
    pub sweep: Option<Sweep>,
    #[serde(default, rename = "scenario")]
    pub scenarios: Vec<Scenario>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Program {
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub well_name: String,
}

/// Tubing diameter x gas lift rate grid.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Sweep {
    pub diameter_min: f64,
    pub diameter_max: f64,
    pub diameter_n: usize,
    #[serde(default)]
    pub gas_lift_min: f64,
    #[serde(default)]
    pub gas_lift_max: f64,
    /// Gas lift rates to try. A single rate of zero sweeps tubing only.
    #[serde(default = "default_one")]
    pub gas_lift_n: usize,
}

fn default_one() -> usize {
    1
}

fn linspace(min: f64, max: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            if n > 1 {
                min + (max - min) * (i as f64) / ((n - 1) as f64)
            } else {
                min
            }
        })
        .collect()
}

impl Sweep {
    pub fn diameters(&self) -> Vec<f64> {
        linspace(self.diameter_min, self.diameter_max, self.diameter_n)
    }

    pub fn gas_lift_rates(&self) -> Vec<f64> {
        linspace(self.gas_lift_min, self.gas_lift_max, self.gas_lift_n)
    }

    /// Parameters for one grid case. A zero gas lift rate means no injection.
    pub fn case(&self, well: &SystemParameters, diameter: f64, gas_lift_rate: f64) -> SystemParameters {
        let params = well.with_tubing_diameter(diameter);
        if gas_lift_rate > 0.0 {
            params.with_gas_lift(gas_lift_rate)
        } else {
            params.without_gas_lift()
        }
    }
}

impl Root {
    /// Read, parse and validate a config file. Returns the raw text as well
    /// so callers can fingerprint it.
    pub fn load(path: impl AsRef<Path>) -> Result<(Self, String)> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let cfg = Self::parse(&text)
            .with_context(|| format!("failed to parse config: {}", path.display()))?;
        cfg.validate()?;
        Ok((cfg, text))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.program.name != PROGRAM_NAME {
            bail!("program.name must be {}", PROGRAM_NAME);
        }

        self.well.validate().context("invalid [well] parameters")?;

        if let Some(ref sweep) = self.sweep {
            if sweep.diameter_n == 0 || sweep.gas_lift_n == 0 {
                bail!("sweep.diameter_n and sweep.gas_lift_n must be >= 1");
            }
            if sweep.diameter_min > sweep.diameter_max {
                bail!("sweep.diameter_min must be <= sweep.diameter_max");
            }
            if sweep.diameter_min < TUBING_DIAMETER_MIN || sweep.diameter_max > TUBING_DIAMETER_MAX {
                bail!(
                    "sweep diameters must be in [{}, {}]",
                    TUBING_DIAMETER_MIN,
                    TUBING_DIAMETER_MAX
                );
            }
            if sweep.gas_lift_min < 0.0 {
                bail!("sweep.gas_lift_min must be >= 0");
            }
            if sweep.gas_lift_min > sweep.gas_lift_max {
                bail!("sweep.gas_lift_min must be <= sweep.gas_lift_max");
            }
        }

        let mut baselines = 0;
        for (i, scenario) in self.scenarios.iter().enumerate() {
            if scenario.label.trim().is_empty() {
                bail!("scenario[{}].label must not be empty", i);
            }
            if self.scenarios[..i].iter().any(|s| s.label == scenario.label) {
                bail!("scenario label '{}' is used more than once", scenario.label);
            }
            if scenario.baseline {
                baselines += 1;
            }
            scenario
                .overrides
                .apply(&self.well)
                .validate()
                .with_context(|| format!("invalid overrides in scenario '{}'", scenario.label))?;
        }
        if baselines > 1 {
            bail!("at most one scenario may set baseline = true");
        }

        Ok(())
    }
}
