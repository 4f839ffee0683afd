use crate::config::config_errors::non_negative;
use crate::config::{ConfigError, PhysicalConfig, SolverSettings};
use crate::errors::SimulationError;
use crate::integrators::TrajectoryIntegrator;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{info, warn};

/// Monte Carlo dispersion of the landing point under uncertain wind.
///
/// Every trial perturbs the base wind by offsets drawn uniformly from
/// `±horizontal_spread` and `±vertical_spread`. Offsets are drawn up front
/// from one seeded generator, so the outcome does not depend on how the
/// trials are scheduled across threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindDispersion {
    pub trials: usize,
    pub horizontal_spread: f64, // m/s
    pub vertical_spread: f64,   // m/s
    pub seed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandingPoint {
    pub wind_horizontal: f64,
    pub wind_vertical: f64,
    pub flight_time: f64,
    /// Horizontal position at the end of the run.
    pub drift: f64,
    pub landed: bool,
}

/// Drift statistics cover landed trials only; trials that reached the
/// horizon in the air are counted in `unfinished`. With no landed trial the
/// statistics are NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct DispersionReport {
    /// In trial order.
    pub landings: Vec<LandingPoint>,
    pub unfinished: usize,
    pub mean_drift: f64,
    pub min_drift: f64,
    pub max_drift: f64,
}

impl WindDispersion {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trials == 0 {
            return Err(ConfigError::NotPositive {
                field: "trials",
                value: 0.0,
            });
        }
        non_negative("horizontal_spread", self.horizontal_spread)?;
        non_negative("vertical_spread", self.vertical_spread)?;
        Ok(())
    }

    /// Wind components of every trial.
    pub fn sample_winds(&self, base: &PhysicalConfig) -> Vec<(f64, f64)> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        (0..self.trials)
            .map(|_| {
                let dh = rng.gen_range(-self.horizontal_spread..=self.horizontal_spread);
                let dv = rng.gen_range(-self.vertical_spread..=self.vertical_spread);
                (base.wind_horizontal + dh, base.wind_vertical + dv)
            })
            .collect()
    }

    pub fn run(
        &self,
        base: &PhysicalConfig,
        settings: &SolverSettings,
    ) -> Result<DispersionReport, SimulationError> {
        self.validate()?;
        base.validate()?;
        settings.validate()?;

        // Only the end point of each trial is kept.
        let settings = settings.with_output_step(None);
        info!(trials = self.trials, seed = self.seed, "running wind dispersion");

        let landings = self
            .sample_winds(base)
            .into_par_iter()
            .map(|(wind_horizontal, wind_vertical)| -> Result<LandingPoint, SimulationError> {
                let config = PhysicalConfig {
                    wind_horizontal,
                    wind_vertical,
                    ..base.clone()
                };
                let result = TrajectoryIntegrator::new(&config, &settings)?.run()?;
                let last = result.final_sample().map_or(0.0, |s| s.state.x);

                Ok(LandingPoint {
                    wind_horizontal,
                    wind_vertical,
                    flight_time: result.final_time(),
                    drift: last,
                    landed: result.landed(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let drifts: Vec<f64> = landings.iter().filter(|p| p.landed).map(|p| p.drift).collect();
        let unfinished = landings.len() - drifts.len();
        let (mean_drift, min_drift, max_drift) = if drifts.is_empty() {
            (f64::NAN, f64::NAN, f64::NAN)
        } else {
            (
                drifts.iter().sum::<f64>() / drifts.len() as f64,
                drifts.iter().copied().fold(f64::INFINITY, f64::min),
                drifts.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            )
        };

        if unfinished > 0 {
            warn!(unfinished, "trials reached the horizon before ground contact");
        }
        info!(mean_drift, min_drift, max_drift, "dispersion finished");

        Ok(DispersionReport {
            landings,
            unfinished,
            mean_drift,
            min_drift,
            max_drift,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn dispersion(seed: u64) -> WindDispersion {
        WindDispersion {
            trials: 4,
            horizontal_spread: 2.0,
            vertical_spread: 0.5,
            seed,
        }
    }

    #[test]
    fn winds_are_reproducible_and_bounded() {
        let base = PhysicalConfig::default();

        let first = dispersion(7).sample_winds(&base);
        let second = dispersion(7).sample_winds(&base);
        let other = dispersion(8).sample_winds(&base);

        assert_eq!(first, second);
        assert_ne!(first, other);
        for (h, v) in first {
            assert!((h - base.wind_horizontal).abs() <= 2.0);
            assert!(v.abs() <= 0.5);
        }
    }

    #[test]
    fn zero_spread_reproduces_base_wind() {
        let base = PhysicalConfig::default();
        let calm = WindDispersion {
            horizontal_spread: 0.0,
            vertical_spread: 0.0,
            ..dispersion(1)
        };

        assert!(calm
            .sample_winds(&base)
            .iter()
            .all(|&w| w == (base.wind_horizontal, base.wind_vertical)));
    }

    #[test]
    fn rejects_empty_or_negative_sweeps() {
        let empty = WindDispersion {
            trials: 0,
            ..dispersion(1)
        };
        let negative = WindDispersion {
            vertical_spread: -1.0,
            ..dispersion(1)
        };

        assert!(matches!(empty.validate(), Err(ConfigError::NotPositive { field: "trials", .. })));
        assert!(matches!(
            negative.validate(),
            Err(ConfigError::Negative { field: "vertical_spread", .. })
        ));
    }

    #[test]
    fn every_trial_lands_downwind() {
        let base = PhysicalConfig::default();
        let report = dispersion(42)
            .run(&base, &SolverSettings::default())
            .unwrap();

        assert_eq!(report.landings.len(), 4);
        assert_eq!(report.unfinished, 0);
        assert!(report.landings.iter().all(|p| p.landed && p.drift > 0.0));
        assert!(report.min_drift <= report.mean_drift && report.mean_drift <= report.max_drift);
    }

    #[test]
    fn airborne_trials_stay_out_of_the_drift_statistics() {
        let base = PhysicalConfig {
            wind_vertical: 4.0,
            ..PhysicalConfig::default()
        };
        let settings = SolverSettings::default();
        let sweep = WindDispersion {
            trials: 6,
            horizontal_spread: 2.0,
            vertical_spread: 3.0,
            seed: 3,
        };
        let report = sweep.run(&base, &settings).unwrap();

        // Strong updrafts hold the canopy aloft past the horizon.
        let landed: Vec<f64> = report
            .landings
            .iter()
            .filter(|p| p.landed)
            .map(|p| p.drift)
            .collect();
        assert_eq!(report.unfinished, report.landings.len() - landed.len());
        assert!(report.unfinished > 0);

        if landed.is_empty() {
            assert!(report.mean_drift.is_nan() && report.max_drift.is_nan());
        } else {
            let max = landed.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let mean = landed.iter().sum::<f64>() / landed.len() as f64;
            assert_eq!(report.max_drift, max);
            assert_abs_diff_eq!(report.mean_drift, mean, epsilon = 1e-9);
        }
    }
}
