pub mod export;
pub mod report_errors;
pub mod summary;

pub use report_errors::ReportError;
pub use summary::{DeploymentEvent, FlightSummary};

use crate::config::PhysicalConfig;
use crate::models::SimulationResult;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

pub const TRAJECTORY_FILE: &str = "trajectory.csv";
pub const REPORT_FILE: &str = "report.md";

#[derive(Debug)]
struct Loaded {
    config: PhysicalConfig,
    result: SimulationResult,
}

/// Consumer of a finished run. Every output fails until a run is loaded.
#[derive(Debug, Default)]
pub struct Reporter {
    loaded: Option<Loaded>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_solution(&mut self, config: &PhysicalConfig, result: SimulationResult) {
        self.loaded = Some(Loaded {
            config: config.clone(),
            result,
        });
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    fn loaded(&self) -> Result<&Loaded, ReportError> {
        self.loaded.as_ref().ok_or(ReportError::NoSolutionLoaded)
    }

    pub fn result(&self) -> Result<&SimulationResult, ReportError> {
        Ok(&self.loaded()?.result)
    }

    pub fn summary(&self) -> Result<FlightSummary, ReportError> {
        FlightSummary::from_result(self.result()?)
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ReportError> {
        export::write_csv(self.result()?, writer)
    }

    pub fn write_markdown<W: Write>(&self, writer: W) -> Result<(), ReportError> {
        let loaded = self.loaded()?;
        let summary = FlightSummary::from_result(&loaded.result)?;
        export::write_markdown(&loaded.config, &summary, writer)
    }

    /// Writes the trajectory table and the report into `dir`, creating it.
    pub fn write_all(&self, dir: &Path) -> Result<Vec<PathBuf>, ReportError> {
        self.loaded()?;
        fs::create_dir_all(dir)?;

        let csv_path = dir.join(TRAJECTORY_FILE);
        self.write_csv(BufWriter::new(File::create(&csv_path)?))?;
        info!(path = %csv_path.display(), "trajectory written");

        let report_path = dir.join(REPORT_FILE);
        self.write_markdown(BufWriter::new(File::create(&report_path)?))?;
        info!(path = %report_path.display(), "report written");

        Ok(vec![csv_path, report_path])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverSettings;
    use crate::integrators::{IntegrationStats, TrajectoryIntegrator};
    use crate::models::{RecoveryStage, Sample, State, Termination};
    use approx::assert_abs_diff_eq;

    fn synthetic(termination: Termination) -> SimulationResult {
        let samples = vec![
            Sample { t: 0.0, state: State::new(2_000.0, 0.0, 0.0, 0.0) },
            Sample { t: 10.0, state: State::new(1_200.0, -60.0, 5.0, 1.0) },
            Sample { t: 20.0, state: State::new(900.0, -20.0, 12.0, 3.0) },
            Sample { t: 30.0, state: State::new(450.0, -12.0, 30.0, 3.5) },
            Sample { t: 80.0, state: State::new(0.0, -4.0, 200.0, 3.0) },
        ];
        SimulationResult::new(
            samples,
            termination,
            2_000.0,
            [10_000.0, 1_000.0, 500.0],
            IntegrationStats::default(),
        )
    }

    #[test]
    fn outputs_fail_before_loading() {
        let reporter = Reporter::new();
        assert!(!reporter.is_loaded());
        assert!(matches!(reporter.summary(), Err(ReportError::NoSolutionLoaded)));
        assert!(matches!(
            reporter.write_csv(Vec::new()),
            Err(ReportError::NoSolutionLoaded)
        ));
        assert!(matches!(
            reporter.write_markdown(Vec::new()),
            Err(ReportError::NoSolutionLoaded)
        ));
    }

    #[test]
    fn summary_derives_impact_and_deployments() {
        let summary =
            FlightSummary::from_result(&synthetic(Termination::GroundContact { t: 80.0 })).unwrap();

        assert!(summary.landed);
        assert_eq!(summary.flight_time, 80.0);
        assert_eq!(summary.max_altitude, 2_000.0);
        assert_abs_diff_eq!(summary.max_speed, 3601.0f64.sqrt(), epsilon = 1e-12);
        assert_eq!(summary.horizontal_displacement, 200.0);
        assert_eq!(summary.impact_speed, 5.0);
        assert_abs_diff_eq!(summary.impact_angle, (-4.0f64).atan2(3.0).to_degrees());

        // drogue altitude is above the starting point
        let stages: Vec<_> = summary.deployments.iter().map(|e| e.stage).collect();
        assert_eq!(stages, vec![RecoveryStage::Reefing, RecoveryStage::Main]);
        assert_eq!(summary.deployments[0].t, 20.0);
        assert_eq!(summary.deployments[0].vertical_velocity, -20.0);
        assert_eq!(summary.deployments[1].t, 30.0);
    }

    #[test]
    fn unfinished_descent_is_marked() {
        let summary =
            FlightSummary::from_result(&synthetic(Termination::HorizonReached { t: 80.0 })).unwrap();

        assert!(!summary.landed);
        assert!(summary.to_string().starts_with("WARNING: descent unfinished"));
    }

    #[test]
    fn csv_has_header_and_one_row_per_sample() {
        let mut reporter = Reporter::new();
        reporter.load_solution(
            &PhysicalConfig::default(),
            synthetic(Termination::GroundContact { t: 80.0 }),
        );

        let mut buffer = Vec::new();
        reporter.write_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "t (s),y (m),vy (m/s),x (m),vx (m/s),speed (m/s)");
        assert_eq!(lines[5], "80.0,0.0,-4.0,200.0,3.0,5.0");
    }

    #[test]
    fn markdown_lists_deployments() {
        let mut reporter = Reporter::new();
        reporter.load_solution(
            &PhysicalConfig::default(),
            synthetic(Termination::GroundContact { t: 80.0 }),
        );

        let mut buffer = Vec::new();
        reporter.write_markdown(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.contains("- **Mass**: 5.00 kg"));
        assert!(text.contains("- Reefing: 20.00 s (vy = -20.00 m/s)"));
        assert!(!text.contains("Unfinished descent"));
    }

    #[test]
    fn writes_files_into_directory() {
        let config = PhysicalConfig::default();
        let settings = SolverSettings::default().with_output_step(Some(1.0));
        let result = TrajectoryIntegrator::new(&config, &settings)
            .unwrap()
            .run()
            .unwrap();
        let mut reporter = Reporter::new();
        reporter.load_solution(&config, result);

        let dir = std::env::temp_dir().join(format!("recovery_sim_report_{}", std::process::id()));
        let paths = reporter.write_all(&dir).unwrap();

        assert_eq!(paths, vec![dir.join(TRAJECTORY_FILE), dir.join(REPORT_FILE)]);
        assert!(paths.iter().all(|p| p.exists()));
        fs::remove_dir_all(&dir).unwrap();
    }
}
