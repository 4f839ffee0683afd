use approx::{assert_abs_diff_eq, assert_relative_eq};
use recovery_sim::config::{DragStage, PhysicalConfig, SolverSettings};
use recovery_sim::integrators::TrajectoryIntegrator;
use recovery_sim::models::{State, Termination};
use recovery_sim::physics::energy::mechanical_energy;
use recovery_sim::physics::DragModel;
use recovery_sim::report::{FlightSummary, ReportError, Reporter};
use std::fs;

fn drag_free() -> PhysicalConfig {
    let none = DragStage::new(0.0, 0.0);
    PhysicalConfig {
        body: none,
        drogue: none,
        reefing: none,
        main: none,
        wind_horizontal: 0.0,
        wind_vertical: 0.0,
        ..PhysicalConfig::default()
    }
}

#[test]
fn default_descent_lands_within_horizon() -> Result<(), Box<dyn std::error::Error>> {
    let config = PhysicalConfig::default();
    let result = recovery_sim::run(&config, &SolverSettings::default())?;

    assert!(result.landed());
    assert!(matches!(result.termination(), Termination::GroundContact { .. }));
    assert!(result.final_time() > 0.0 && result.final_time() < 1000.0);

    let times: Vec<f64> = result.times().collect();
    assert_eq!(times[0], 0.0);
    assert!(times.windows(2).all(|w| w[0] < w[1]));
    for (k, t) in times[..times.len() - 1].iter().enumerate().step_by(997) {
        assert_eq!(*t, k as f64 * 0.001);
    }
    assert_eq!(*times.last().unwrap(), result.final_time());

    let last = result.final_sample().unwrap();
    assert_abs_diff_eq!(last.state.y, 0.0, epsilon = 1e-6);
    assert_eq!(result.deployment_altitudes(), [10_000.0, 1_000.0, 500.0]);

    // Under the main canopy the descent is slow and drifts with the wind.
    assert!(last.state.y_dot < 0.0 && last.state.y_dot > -10.0);
    assert_abs_diff_eq!(last.state.x_dot, config.wind_horizontal, epsilon = 0.5);
    assert!(last.state.x > 0.0);
    Ok(())
}

#[test]
fn deployments_above_apogee_fall_on_body_drag_alone() -> Result<(), Box<dyn std::error::Error>> {
    let config = PhysicalConfig {
        drogue_altitude: 30_000.0,
        reefing_altitude: 25_000.0,
        main_altitude: 21_000.0,
        ..PhysicalConfig::default()
    };
    let settings = SolverSettings::default().with_output_step(Some(0.1));
    let result = recovery_sim::run(&config, &settings)?;

    assert!(result.landed());
    let summary = FlightSummary::from_result(&result)?;
    assert!(summary.deployments.is_empty());

    let drag = DragModel::new(&config);
    let rho = drag.atmosphere().density(0.0);
    let terminal = (2.0 * config.mass * config.gravity / (rho * 0.05)).sqrt();
    assert_relative_eq!(-summary.impact_vertical_velocity, terminal, max_relative = 0.05);

    let nominal = recovery_sim::run(&PhysicalConfig::default(), &settings)?;
    assert!(result.final_time() < nominal.final_time());
    Ok(())
}

#[test]
fn identical_inputs_give_identical_runs() -> Result<(), Box<dyn std::error::Error>> {
    let config = PhysicalConfig::default();
    let settings = SolverSettings::default();

    let first = recovery_sim::run(&config, &settings)?;
    let second = recovery_sim::run(&config, &settings)?;

    assert_eq!(first.len(), second.len());
    assert_eq!(first.samples(), second.samples());
    assert_eq!(first.stats(), second.stats());
    Ok(())
}

#[test]
fn drag_free_descent_matches_free_fall() -> Result<(), Box<dyn std::error::Error>> {
    let config = drag_free();
    let settings = SolverSettings::default().with_output_step(Some(0.25));
    let result = TrajectoryIntegrator::new(&config, &settings)?.run_from(State::new(
        config.apogee,
        0.0,
        0.0,
        2.0,
    ))?;

    let g = config.gravity;
    let t_impact = (2.0 * config.apogee / g).sqrt();
    assert_relative_eq!(result.final_time(), t_impact, max_relative = 1e-5);

    let e0 = mechanical_energy(&config, &result.samples()[0].state);
    for sample in result.samples() {
        let t = sample.t;
        assert_abs_diff_eq!(sample.state.y, config.apogee - 0.5 * g * t * t, epsilon = 0.1);
        assert_abs_diff_eq!(sample.state.y_dot, -g * t, epsilon = 1e-3);
        assert_abs_diff_eq!(sample.state.x, 2.0 * t, epsilon = 1e-3);
        assert_abs_diff_eq!(sample.state.x_dot, 2.0, epsilon = 1e-9);
        assert_relative_eq!(mechanical_energy(&config, &sample.state), e0, max_relative = 1e-5);
    }
    Ok(())
}

#[test]
fn drag_only_removes_energy_in_still_air() -> Result<(), Box<dyn std::error::Error>> {
    let config = PhysicalConfig {
        wind_horizontal: 0.0,
        ..PhysicalConfig::default()
    };
    let settings = SolverSettings::default().with_output_step(Some(1.0));
    let result = recovery_sim::run(&config, &settings)?;

    let energies: Vec<f64> = result
        .samples()
        .iter()
        .map(|s| mechanical_energy(&config, &s.state))
        .collect();
    let tolerance = 1e-4 * energies[0];
    assert!(energies.windows(2).all(|w| w[1] <= w[0] + tolerance));
    assert!(energies.last().unwrap() < &(0.01 * energies[0]));
    Ok(())
}

#[test]
fn short_horizon_is_flagged_as_unfinished() -> Result<(), Box<dyn std::error::Error>> {
    let config = PhysicalConfig::default();
    let settings = SolverSettings::default().with_max_time(60.0);
    let result = recovery_sim::run(&config, &settings)?;

    assert_eq!(result.termination(), Termination::HorizonReached { t: 60.0 });
    assert!(result.final_sample().unwrap().state.y > 0.0);

    let summary = FlightSummary::from_result(&result)?;
    assert!(!summary.landed);
    assert!(summary.to_string().contains("descent unfinished"));
    Ok(())
}

#[test]
fn reporter_requires_a_loaded_solution() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = Reporter::new();
    assert!(matches!(reporter.summary(), Err(ReportError::NoSolutionLoaded)));

    let config = PhysicalConfig::default();
    let settings = SolverSettings::default().with_output_step(None);
    let result = recovery_sim::run(&config, &settings)?;
    let samples = result.len();
    reporter.load_solution(&config, result);

    let mut csv = Vec::new();
    reporter.write_csv(&mut csv)?;
    let text = String::from_utf8(csv)?;
    assert_eq!(text.lines().count(), samples + 1);
    assert!(text.starts_with("t (s),y (m),vy (m/s),x (m),vx (m/s),speed (m/s)"));

    let summary = reporter.summary()?;
    assert!(summary.landed);
    assert_eq!(summary.deployments.len(), 3);
    assert!(summary.deployments.windows(2).all(|w| w[0].t < w[1].t));
    Ok(())
}

#[test]
fn configuration_loads_from_json_file() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::temp_dir().join(format!("recovery_sim_config_{}.json", std::process::id()));
    fs::write(
        &path,
        r#"{ "mass": 8.0, "apogee": 3000.0, "drogue_altitude": 2000.0 }"#,
    )?;

    let config = PhysicalConfig::from_json_file(&path)?;
    fs::remove_file(&path)?;
    assert_eq!(config.mass, 8.0);
    assert_eq!(config.main_altitude, 500.0);

    let result = recovery_sim::run(&config, &SolverSettings::default().with_output_step(Some(0.5)))?;
    assert!(result.landed());
    assert_eq!(result.apogee(), 3000.0);
    Ok(())
}
