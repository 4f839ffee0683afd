use anyhow::{Context, Result};
use clap::Parser;
use recovery_sim::config::{PhysicalConfig, SolverSettings};
use recovery_sim::integrators::TrajectoryIntegrator;
use recovery_sim::report::Reporter;
use recovery_sim::sweep::WindDispersion;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "recovery_sim")]
#[command(about = "Descent of a rocket payload under a staged parachute recovery system")]
#[command(version)]
struct Args {
    /// Physical configuration (JSON); missing fields use the reference values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Solver settings (JSON)
    #[arg(long)]
    solver: Option<PathBuf>,

    #[arg(short, long, default_value = "Results")]
    output: PathBuf,

    #[arg(long)]
    rtol: Option<f64>,

    #[arg(long)]
    atol: Option<f64>,

    /// Integration horizon [s]
    #[arg(long)]
    max_time: Option<f64>,

    /// Uniform output spacing [s]
    #[arg(long, conflicts_with = "native_steps")]
    output_step: Option<f64>,

    /// Record the solver's accepted steps instead of a uniform grid
    #[arg(long)]
    native_steps: bool,

    // ── Dispersion ──────────────────────────────────────────
    /// Number of wind-dispersion trials to run after the nominal descent
    #[arg(long)]
    dispersion: Option<usize>,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    #[arg(long, default_value_t = 2.0)]
    horizontal_spread: f64,

    #[arg(long, default_value_t = 0.0)]
    vertical_spread: f64,
}

impl Args {
    fn solver_settings(&self) -> Result<SolverSettings> {
        let mut settings = match &self.solver {
            Some(path) => SolverSettings::from_json_file(path)
                .with_context(|| format!("loading solver settings from {}", path.display()))?,
            None => SolverSettings::default(),
        };

        if let Some(rtol) = self.rtol {
            settings.rtol = rtol;
        }
        if let Some(atol) = self.atol {
            settings.atol = atol;
        }
        if let Some(max_time) = self.max_time {
            settings.max_time = max_time;
        }
        if self.native_steps {
            settings.output_step = None;
        } else if let Some(dt) = self.output_step {
            settings.output_step = Some(dt);
        }

        settings.validate()?;
        Ok(settings)
    }

    fn physical_config(&self) -> Result<PhysicalConfig> {
        match &self.config {
            Some(path) => PhysicalConfig::from_json_file(path)
                .with_context(|| format!("loading configuration from {}", path.display())),
            None => Ok(PhysicalConfig::default()),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = args.physical_config()?;
    let settings = args.solver_settings()?;

    println!("Recovery Descent Simulator");
    println!("==========================\n");

    let result = TrajectoryIntegrator::new(&config, &settings)?.run()?;

    let mut reporter = Reporter::new();
    reporter.load_solution(&config, result);
    println!("{}\n", reporter.summary()?);

    for path in reporter.write_all(&args.output)? {
        println!("Wrote {}", path.display());
    }

    if let Some(trials) = args.dispersion {
        let dispersion = WindDispersion {
            trials,
            horizontal_spread: args.horizontal_spread,
            vertical_spread: args.vertical_spread,
            seed: args.seed,
        };
        let report = dispersion.run(&config, &settings)?;

        println!("\nWind dispersion ({trials} trials, seed {})", args.seed);
        for (i, landing) in report.landings.iter().enumerate() {
            println!(
                "  #{:<3} wind ({:6.2}, {:5.2}) m/s  drift {:9.2} m  t {:7.2} s{}",
                i + 1,
                landing.wind_horizontal,
                landing.wind_vertical,
                landing.drift,
                landing.flight_time,
                if landing.landed { "" } else { "  (unfinished)" }
            );
        }
        println!(
            "  drift mean {:.2} m, min {:.2} m, max {:.2} m (landed trials only)",
            report.mean_drift, report.min_drift, report.max_drift
        );
        if report.unfinished > 0 {
            println!(
                "  WARNING: {} of {trials} trials reached the horizon without ground contact",
                report.unfinished
            );
        }
    }

    info!("done");
    Ok(())
}
