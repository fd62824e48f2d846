//! NODAL - deterministic well nodal analysis.
//!
//! Samples the reservoir inflow curve (IPR) and the tubing outflow curve
//! (VLP) on a shared rate grid and locates the operating point where they
//! cross. Everything in the engine is a pure function of
//! [`SystemParameters`].

pub mod compare;
pub mod config;
pub mod curves;
pub mod error;
pub mod io;
pub mod ipr;
pub mod params;
pub mod solver;
pub mod vlp;

#[cfg(test)]
mod tests;

pub use compare::{
    baseline_index, compare_scenarios, gas_lift_scenarios, recommend_gas_lift, recommend_tubing, tubing_scenarios,
    ComparisonResult, Recommendation, Scenario, ScenarioOverrides, ScenarioRow,
};
pub use curves::{
    compute_inflow_curve, compute_outflow_curve, sample_curves, CurvePoint, PressurePoint, GRID_POINTS,
};
pub use error::{NodalError, Result};
pub use ipr::{inflow_pressure, inflow_region, InflowRegion};
pub use params::SystemParameters;
pub use solver::{
    compute_operating_point, compute_resolved_operating_point, find_crossings, find_operating_point,
    resolve_operating_point, Crossing, CrossingDirection, OperatingPoint, ReservoirState,
};
pub use vlp::{outflow_pressure, VlpShape};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
