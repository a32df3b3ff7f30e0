use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::Level;
use vd_app::{AppResult, RunOptions, RunOverrides, RunRequest, run_service};
use vd_results::{ExportConfig, ExportFormat};
use vd_sim::IntegratorKind;
use vd_solver::ResidualNorm;

#[derive(Parser)]
#[command(name = "vd-cli")]
#[command(about = "vscdyn CLI - RMS simulation of a VSC-HVDC converter station", long_about = None)]
struct Cli {
    /// Log verbosity
    #[arg(long, value_enum, global = true, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate parameter and scenario files
    Validate {
        /// Parameter file (.yaml, .yml or .json)
        #[arg(long)]
        params: PathBuf,
        /// Scenario file (.yaml, .yml or .json)
        #[arg(long)]
        scenario: PathBuf,
    },
    /// Run a simulation
    Run(RunArgs),
}

#[derive(clap::Args)]
struct RunArgs {
    /// Parameter file (.yaml, .yml or .json)
    #[arg(long)]
    params: PathBuf,
    /// Scenario file (.yaml, .yml or .json)
    #[arg(long)]
    scenario: PathBuf,
    /// Time step in seconds
    #[arg(long)]
    dt: Option<f64>,
    /// End time in seconds
    #[arg(long)]
    t_end: Option<f64>,
    #[arg(long, value_enum)]
    integrator: Option<IntegratorArg>,
    /// Newton residual tolerance
    #[arg(long)]
    nr_tol: Option<f64>,
    /// Newton iteration budget
    #[arg(long)]
    nr_max_iter: Option<usize>,
    #[arg(long, value_enum)]
    nr_norm: Option<NormArg>,
    /// Export format for the timeseries
    #[arg(long, value_enum, requires = "output")]
    export: Option<ExportArg>,
    /// Export destination
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Replace an existing export file
    #[arg(long)]
    overwrite: bool,
    /// Run store directory used as a cache
    #[arg(long)]
    store: Option<PathBuf>,
    /// Skip cache and force re-run
    #[arg(long)]
    no_cache: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum IntegratorArg {
    Euler,
    Rk2,
    Rk4,
}

impl From<IntegratorArg> for IntegratorKind {
    fn from(a: IntegratorArg) -> Self {
        match a {
            IntegratorArg::Euler => IntegratorKind::Euler,
            IntegratorArg::Rk2 => IntegratorKind::Rk2,
            IntegratorArg::Rk4 => IntegratorKind::Rk4,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum NormArg {
    Max,
    L2,
}

impl From<NormArg> for ResidualNorm {
    fn from(a: NormArg) -> Self {
        match a {
            NormArg::Max => ResidualNorm::Max,
            NormArg::L2 => ResidualNorm::L2,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportArg {
    Csv,
    Jsonl,
    Parquet,
}

impl From<ExportArg> for ExportFormat {
    fn from(a: ExportArg) -> Self {
        match a {
            ExportArg::Csv => ExportFormat::Csv,
            ExportArg::Jsonl => ExportFormat::Jsonl,
            ExportArg::Parquet => ExportFormat::Parquet,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(Level::from(cli.log_level))
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Validate { params, scenario } => cmd_validate(&params, &scenario),
        Commands::Run(args) => cmd_run(args),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}

fn cmd_validate(params: &Path, scenario: &Path) -> AppResult<ExitCode> {
    println!("Validating {} and {}", params.display(), scenario.display());
    vd_project::load_params(params)?;
    let file = vd_project::load_scenario(scenario)?;
    println!(
        "✓ Inputs are valid (scenario '{}', mode {})",
        file.scenario.name,
        file.scenario.control.label()
    );
    Ok(ExitCode::SUCCESS)
}

fn cmd_run(args: RunArgs) -> AppResult<ExitCode> {
    let request = RunRequest {
        params_path: &args.params,
        scenario_path: &args.scenario,
        overrides: RunOverrides {
            dt: args.dt,
            t_end: args.t_end,
            integrator: args.integrator.map(Into::into),
            nr_tolerance: args.nr_tol,
            nr_max_iterations: args.nr_max_iter,
            nr_norm: args.nr_norm.map(Into::into),
        },
        options: RunOptions {
            use_cache: !args.no_cache,
            store_dir: args.store.clone(),
            ..RunOptions::default()
        },
    };

    let prepared = run_service::prepare(&request)?;
    let opts = prepared.sim_options;
    println!(
        "Running '{}' ({}): dt = {} s, t_end = {} s, integrator = {}",
        prepared.scenario.scenario.name,
        prepared.scenario.scenario.control.label(),
        opts.dt,
        opts.t_end,
        opts.integrator.as_str()
    );

    let response = run_service::execute_prepared(&prepared, &request.options)?;

    if response.loaded_from_cache {
        println!("✓ Loaded from cache: {}", response.run_id);
    }

    if let (Some(format), Some(output)) = (args.export, args.output.as_deref()) {
        let config = ExportConfig {
            overwrite: args.overwrite,
        };
        vd_results::export(output, format.into(), &response.records, &config)?;
        println!("  Exported {} records to {}", response.records.len(), output.display());
    }

    match &response.failure {
        None => {
            if let Some(last) = response.records.last() {
                println!("✓ Simulation completed: {}", response.run_id);
                println!("  Records: {}", response.records.len());
                println!(
                    "  Final state: id = {:.6}, iq = {:.6}, Vdc = {:.6}",
                    last.id, last.iq, last.vdc
                );
                let clipped = response
                    .records
                    .iter()
                    .filter(|r| r.controls.is_some_and(|c| c.saturated))
                    .count();
                println!("  Saturated steps: {clipped}");
            }
            Ok(ExitCode::SUCCESS)
        }
        Some(failure) => {
            eprintln!("✗ Simulation failed: {} ({})", failure.kind, failure.message);
            eprintln!("  Accepted records: {}", response.records.len());
            Ok(ExitCode::FAILURE)
        }
    }
}
