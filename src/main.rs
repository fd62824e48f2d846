use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use nodal::config::{self, Root};
use nodal::io::CsvWriter;
use nodal::{
    compare_scenarios, find_crossings, find_operating_point, gas_lift_scenarios, recommend_gas_lift,
    recommend_tubing, sample_curves, tubing_scenarios, ComparisonResult, CurvePoint, Crossing,
    OperatingPoint, ReservoirState, Scenario, SystemParameters, VlpShape,
};
use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::time::Instant;
use tracing::{info, warn};

const SCHEMA_VERSION: &str = "1.0.0";
const PROGRAM_ID: &str = "CSTNSystems-NODAL";

#[derive(Parser, Debug)]
#[command(name = "nodal")]
#[command(author = "CSTNSystems")]
#[command(version)]
#[command(about = "CSTNSystems/NODAL - Deterministic well nodal analysis solver")]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Output path (CSV file; JSON is written alongside)
    #[arg(short, long, global = true)]
    out: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sample the IPR/VLP curves and solve for the operating point
    Run {
        /// Generate JSON result bundle
        #[arg(long)]
        json: bool,
    },
    /// Solve over a tubing diameter x gas lift rate grid
    Sweep {
        /// Generate JSON summary
        #[arg(long)]
        json: bool,
    },
    /// Compare operating points across scenarios
    Compare {
        /// Scenario set: tubing, gas-lift, or config ([[scenario]] tables)
        #[arg(long, value_enum, default_value = "tubing")]
        preset: Preset,
        /// Generate JSON outputs
        #[arg(long)]
        json: bool,
    },
    /// Validate a configuration file
    Validate,
    /// Print version information
    Version,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Preset {
    Tubing,
    GasLift,
    Config,
}

impl Preset {
    fn name(self) -> String {
        self.to_possible_value()
            .map(|v| v.get_name().to_string())
            .unwrap_or_default()
    }
}

// ============================================================================
// JSON Output Structures
// ============================================================================

#[derive(Serialize)]
struct Manifest {
    schema_version: String,
    solver_version: String,
    program_id: String,
    timestamp_utc: String,
    platform: String,
    config_hash: String,
    config_snapshot: config::Root,
}

#[derive(Serialize)]
struct Summary {
    operating_point: Option<OperatingPoint>,
    drawdown: Option<f64>,
    reservoir_state: Option<ReservoirState>,
    crossings: Vec<Crossing>,
    vlp_shape: VlpShape,
    wall_time_ms: f64,
}

#[derive(Serialize)]
struct ResultBundle {
    manifest: Manifest,
    summary: Summary,
    curves: Vec<CurvePoint>,
}

#[derive(Serialize)]
struct ComparisonOutput<'a> {
    manifest: Manifest,
    preset: String,
    recommendation: Option<nodal::Recommendation>,
    comparison: &'a ComparisonResult,
}

// ============================================================================
// Helper Functions
// ============================================================================

fn compute_hash(data: &str) -> String {
    let mut hasher = DefaultHasher::new();
    data.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

fn create_manifest(cfg: &Root, cfg_text: &str) -> Manifest {
    Manifest {
        schema_version: SCHEMA_VERSION.to_string(),
        solver_version: nodal::VERSION.to_string(),
        program_id: PROGRAM_ID.to_string(),
        timestamp_utc: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        platform: std::env::consts::OS.to_string(),
        config_hash: compute_hash(cfg_text),
        config_snapshot: cfg.clone(),
    }
}

fn json_path(out_path: &str, suffix: &str) -> String {
    match out_path.strip_suffix(".csv") {
        Some(stem) => format!("{stem}{suffix}"),
        None => format!("{out_path}{suffix}"),
    }
}

fn write_json<T: Serialize>(path: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("failed to write: {path}"))?;
    Ok(())
}

// ============================================================================
// Run Modes
// ============================================================================

fn run_single(cfg: &Root, cfg_text: &str, out_path: &str, json_output: bool) -> Result<()> {
    let well = &cfg.well;

    let start = Instant::now();
    let curves = sample_curves(well)?;
    let point = find_operating_point(&curves)?;
    let wall_time_ms = start.elapsed().as_secs_f64() * 1000.0;

    let mut w = CsvWriter::create(out_path)?;
    w.write_curves(&curves)?;
    w.flush()?;

    match point {
        Some(p) => info!(
            flow_rate = p.flow_rate,
            pressure = p.pressure,
            drawdown = p.drawdown(well.reservoir_pressure),
            state = ?p.reservoir_state(well.bubble_point_pressure),
            "operating point"
        ),
        None => warn!("no operating point: inflow and outflow curves do not cross"),
    }
    info!("curves written to {}", out_path);

    if json_output {
        let path = json_path(out_path, ".json");
        let bundle = ResultBundle {
            manifest: create_manifest(cfg, cfg_text),
            summary: Summary {
                operating_point: point,
                drawdown: point.map(|p| p.drawdown(well.reservoir_pressure)),
                reservoir_state: point.map(|p| p.reservoir_state(well.bubble_point_pressure)),
                crossings: find_crossings(&curves)?,
                vlp_shape: VlpShape::for_params(well),
                wall_time_ms,
            },
            curves,
        };
        write_json(&path, &bundle)?;
        info!("JSON bundle: {}", path);
    }

    Ok(())
}

fn run_sweep(cfg: &Root, cfg_text: &str, out_path: &str, json_output: bool) -> Result<()> {
    let sweep = cfg.sweep.as_ref().context("[sweep] section required for sweep mode")?;

    let mut w = CsvWriter::create(out_path)?;
    w.write_case_header()?;

    let mut total = 0;
    let mut solved = 0;
    let mut best: Option<(f64, f64, OperatingPoint)> = None;

    let start = Instant::now();

    for (i, diameter) in sweep.diameters().into_iter().enumerate() {
        for (j, gas_lift_rate) in sweep.gas_lift_rates().into_iter().enumerate() {
            let params = sweep.case(&cfg.well, diameter, gas_lift_rate);
            let point = nodal::compute_resolved_operating_point(&params)?;
            let case = format!("sweep_{:04}_{:04}", i, j);
            w.write_case_row(&case, diameter, gas_lift_rate, params.reservoir_pressure, point.as_ref())?;

            total += 1;
            if let Some(p) = point {
                solved += 1;
                if best.map_or(true, |(_, _, b)| p.flow_rate > b.flow_rate) {
                    best = Some((diameter, gas_lift_rate, p));
                }
            }
        }
    }

    w.flush()?;
    let wall_time_ms = start.elapsed().as_secs_f64() * 1000.0;

    info!(
        "sweep complete: {}/{} cases with an operating point ({:.1}%) in {:.1}ms",
        solved,
        total,
        100.0 * solved as f64 / total as f64,
        wall_time_ms
    );
    if let Some((diameter, gas_lift_rate, p)) = best {
        info!(
            "highest rate: {:.2} STB/d at tubing {:.2} in, gas lift {:.2} MMscf/d",
            p.flow_rate, diameter, gas_lift_rate
        );
    }

    if json_output {
        let path = json_path(out_path, "_summary.json");

        #[derive(Serialize)]
        struct BestCase {
            tubing_diameter: f64,
            gas_lift_rate: f64,
            operating_point: OperatingPoint,
        }

        #[derive(Serialize)]
        struct SweepSummary {
            manifest: Manifest,
            total_cases: usize,
            solved_cases: usize,
            solved_rate: f64,
            wall_time_ms: f64,
            best: Option<BestCase>,
            parameter_ranges: ParameterRanges,
        }

        #[derive(Serialize)]
        struct ParameterRanges {
            tubing_diameter: (f64, f64, usize),
            gas_lift_rate: (f64, f64, usize),
        }

        let summary = SweepSummary {
            manifest: create_manifest(cfg, cfg_text),
            total_cases: total,
            solved_cases: solved,
            solved_rate: solved as f64 / total as f64,
            wall_time_ms,
            best: best.map(|(tubing_diameter, gas_lift_rate, operating_point)| BestCase {
                tubing_diameter,
                gas_lift_rate,
                operating_point,
            }),
            parameter_ranges: ParameterRanges {
                tubing_diameter: (sweep.diameter_min, sweep.diameter_max, sweep.diameter_n),
                gas_lift_rate: (sweep.gas_lift_min, sweep.gas_lift_max, sweep.gas_lift_n),
            },
        };
        write_json(&path, &summary)?;
        info!("JSON summary: {}", path);
    }

    Ok(())
}

fn run_compare(cfg: &Root, cfg_text: &str, out_path: &str, preset: Preset, json_output: bool) -> Result<()> {
    let scenarios: Vec<Scenario> = match preset {
        Preset::Tubing => tubing_scenarios(),
        Preset::GasLift => gas_lift_scenarios(),
        Preset::Config => {
            if cfg.scenarios.is_empty() {
                bail!("--preset config requires at least one [[scenario]] table");
            }
            cfg.scenarios.clone()
        }
    };

    let result = compare_scenarios(&cfg.well, &scenarios)?;
    let recommendation = match preset {
        Preset::Tubing => recommend_tubing(&result),
        Preset::GasLift => recommend_gas_lift(&cfg.well, &result),
        Preset::Config => None,
    };

    let mut w = CsvWriter::create(out_path)?;
    w.write_comparison(&result)?;
    w.flush()?;

    info!("comparison complete ({}, baseline '{}')", preset.name(), result.baseline);
    for row in &result.rows {
        match (row.operating_point, row.flow_improvement_pct) {
            (Some(p), pct) => info!(
                "  {:<14} q={:>8.2} STB/d  pwf={:>8.2} psi  drawdown={:>8.2} psi  {}",
                row.label,
                p.flow_rate,
                p.pressure,
                row.drawdown.unwrap_or_default(),
                pct.map_or_else(|| "N/A".to_string(), |v| format!("{:+.2}%", v))
            ),
            (None, _) => info!("  {:<14} N/A", row.label),
        }
    }
    if let Some(rec) = recommendation {
        info!("recommendation: {:?}", rec);
    }

    if json_output {
        let path = json_path(out_path, ".json");
        let output = ComparisonOutput {
            manifest: create_manifest(cfg, cfg_text),
            preset: preset.name(),
            recommendation,
            comparison: &result,
        };
        write_json(&path, &output)?;
        info!("JSON comparison: {}", path);
    }

    Ok(())
}

fn validate_config(cfg_path: &str) -> Result<()> {
    let (cfg, _) = Root::load(cfg_path)?;
    let well: &SystemParameters = &cfg.well;

    info!("config valid: {}", cfg_path);
    info!("  program: {} v{} {}", cfg.program.name, cfg.program.version, cfg.program.well_name);
    info!(
        "  reservoir: pr={} pb={} j={} qmax={}",
        well.reservoir_pressure, well.bubble_point_pressure, well.productivity_index, well.max_flow_rate
    );
    info!(
        "  tubing: pwh={} d={} gas_lift={} rate={}",
        well.wellhead_pressure, well.tubing_diameter, well.gas_lift_enabled, well.gas_lift_rate
    );

    if let Some(sweep) = &cfg.sweep {
        info!(
            "  sweep: diameter=[{},{}]x{}, gas_lift=[{},{}]x{}",
            sweep.diameter_min, sweep.diameter_max, sweep.diameter_n,
            sweep.gas_lift_min, sweep.gas_lift_max, sweep.gas_lift_n
        );
    }

    if !cfg.scenarios.is_empty() {
        let labels: Vec<&str> = cfg.scenarios.iter().map(|s| s.label.as_str()).collect();
        info!("  scenarios: {}", labels.join(", "));
    }

    Ok(())
}

fn print_version() {
    println!("NODAL - CSTNSystems Deterministic Well Nodal Analysis Solver");
    println!();
    println!("  Program ID:        {}", PROGRAM_ID);
    println!("  Solver Version:    {}", nodal::VERSION);
    println!("  Schema Version:    {}", SCHEMA_VERSION);
    println!("  Platform:          {}", std::env::consts::OS);
    println!("  Architecture:      {}", std::env::consts::ARCH);
    println!();
    println!("Inflow (IPR):");
    println!("  - Darcy line above bubble point, Vogel below");
    println!("  - Vogel over the full range for saturated reservoirs");
    println!();
    println!("Outflow (VLP):");
    println!("  - Tubing-diameter dependent U-shaped curve, 2-5 in");
    println!("  - Gas lift rescaling of hydrostatic, friction and slope terms");
    println!();
    println!("Operating point:");
    println!("  - {} point shared rate grid, first crossing by ascending rate", nodal::GRID_POINTS);
    println!();
    println!("Comparison presets:");
    println!("  - tubing:   2.5 in (baseline), current, 4.5 in");
    println!("  - gas-lift: none (baseline), 0.5, current, 1.5 MMscf/d");
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Commands::Version => {
            print_version();
            Ok(())
        }
        Commands::Validate => {
            let cfg_path = args.config.context("--config required for validate")?;
            validate_config(&cfg_path)
        }
        Commands::Run { json } => {
            let cfg_path = args.config.context("--config required")?;
            let out_path = args.out.unwrap_or_else(|| "results/curves.csv".to_string());
            let (cfg, cfg_text) = Root::load(&cfg_path)?;
            info!("{} v{} {}", cfg.program.name, cfg.program.version, cfg.program.well_name);
            run_single(&cfg, &cfg_text, &out_path, json)
        }
        Commands::Sweep { json } => {
            let cfg_path = args.config.context("--config required")?;
            let out_path = args.out.unwrap_or_else(|| "results/sweep.csv".to_string());
            let (cfg, cfg_text) = Root::load(&cfg_path)?;
            info!("{} v{} {}", cfg.program.name, cfg.program.version, cfg.program.well_name);
            run_sweep(&cfg, &cfg_text, &out_path, json)
        }
        Commands::Compare { preset, json } => {
            let cfg_path = args.config.context("--config required")?;
            let out_path = args.out.unwrap_or_else(|| "results/comparison.csv".to_string());
            let (cfg, cfg_text) = Root::load(&cfg_path)?;
            info!("{} v{} {}", cfg.program.name, cfg.program.version, cfg.program.well_name);
            run_compare(&cfg, &cfg_text, &out_path, preset, json)
        }
    }
}
