use crate::compare::ComparisonResult;
use crate::curves::CurvePoint;
use crate::solver::OperatingPoint;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct CsvWriter<W: Write = BufWriter<File>> {
    w: W,
}

impl CsvWriter {
    /// Create `path`, making parent directories as needed.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create output directory: {}", dir.display()))?;
        }
        let f = File::create(path).with_context(|| format!("failed to create: {}", path.display()))?;
        Ok(Self { w: BufWriter::new(f) })
    }
}

fn opt(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{:.*}", precision, v))
}

impl<W: Write> CsvWriter<W> {
    pub fn new(w: W) -> Self {
        Self { w }
    }

    pub fn write_curves(&mut self, points: &[CurvePoint]) -> Result<()> {
        writeln!(self.w, "flow_rate,inflow_pressure,outflow_pressure")?;
        for p in points {
            writeln!(
                self.w,
                "{:.4},{:.4},{:.4}",
                p.flow_rate, p.inflow_pressure, p.outflow_pressure
            )?;
        }
        Ok(())
    }

    pub fn write_case_header(&mut self) -> Result<()> {
        writeln!(
            self.w,
            "case,tubing_diameter,gas_lift_rate,flow_rate,pressure,drawdown"
        )?;
        Ok(())
    }

    pub fn write_case_row(
        &mut self,
        case: &str,
        tubing_diameter: f64,
        gas_lift_rate: f64,
        reservoir_pressure: f64,
        point: Option<&OperatingPoint>,
    ) -> Result<()> {
        writeln!(
            self.w,
            "{},{:.3},{:.3},{},{},{}",
            case,
            tubing_diameter,
            gas_lift_rate,
            opt(point.map(|p| p.flow_rate), 2),
            opt(point.map(|p| p.pressure), 2),
            opt(point.map(|p| p.drawdown(reservoir_pressure)), 2)
        )?;
        Ok(())
    }

    pub fn write_comparison(&mut self, result: &ComparisonResult) -> Result<()> {
        writeln!(
            self.w,
            "scenario,baseline,tubing_diameter,gas_lift_rate,flow_rate,pressure,drawdown,flow_improvement_pct"
        )?;
        for row in &result.rows {
            writeln!(
                self.w,
                "{},{},{:.3},{:.3},{},{},{},{}",
                row.label,
                row.label == result.baseline,
                row.params.tubing_diameter,
                row.params.effective_gas_lift_rate(),
                opt(row.operating_point.map(|p| p.flow_rate), 2),
                opt(row.operating_point.map(|p| p.pressure), 2),
                opt(row.drawdown, 2),
                opt(row.flow_improvement_pct, 2)
            )?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.w.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.w
    }
}
