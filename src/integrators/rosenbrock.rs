use super::events::{EventFunction, EventRecord, EventSpec};
use super::{IntegrationError, IntegrationStats, OutputGrid};
use crate::config::SolverSettings;
use crate::models::StateVector;
use crate::numerics::brent;
use crate::physics::dynamics::EquationsOfMotion;
use nalgebra as na;
use tracing::debug;

type Jacobian = na::Matrix4<f64>;

// Shampine & Reichelt coefficients
const D: f64 = 1.0 / (2.0 + std::f64::consts::SQRT_2);
const E32: f64 = 6.0 + std::f64::consts::SQRT_2;

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 5.0;

/// Continuous extension of one accepted step over `[t, t + h]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DenseStep {
    t: f64,
    h: f64,
    y: StateVector,
    k1: StateVector,
    k2: StateVector,
}

impl DenseStep {
    pub fn t_end(&self) -> f64 {
        self.t + self.h
    }

    pub fn eval(&self, t: f64) -> StateVector {
        let s = (t - self.t) / self.h;
        let p1 = s * (1.0 - s) / (1.0 - 2.0 * D);
        let p2 = s * (s - 2.0 * D) / (1.0 - 2.0 * D);
        self.y + (self.k1 * p1 + self.k2 * p2) * self.h
    }
}

struct Attempt {
    y_new: StateVector,
    f_new: StateVector,
    k1: StateVector,
    k2: StateVector,
    error: f64,
}

/// Output of [`Rosenbrock23::solve`].
#[derive(Debug, Clone, PartialEq)]
pub struct Solution<S> {
    /// Recorded `(t, state)` pairs, strictly increasing in `t`.
    pub samples: Vec<(f64, S)>,
    /// Every located crossing, in time order.
    pub events: Vec<EventRecord<S>>,
    /// True when a terminal event ended the run before `t_end`.
    pub terminated_by_event: bool,
    pub stats: IntegrationStats,
}

impl<S: Copy> Solution<S> {
    fn starting_at(t0: f64, state: S) -> Self {
        Self {
            samples: vec![(t0, state)],
            events: Vec::new(),
            terminated_by_event: false,
            stats: IntegrationStats::default(),
        }
    }

    fn push(&mut self, t: f64, state: S) {
        match self.samples.last_mut() {
            Some(last) if last.0 >= t => *last = (t, state),
            _ => self.samples.push((t, state)),
        }
    }

    pub fn final_time(&self) -> f64 {
        self.samples.last().map_or(f64::NAN, |(t, _)| *t)
    }
}

/// Linearly implicit Rosenbrock 2(3) pair with adaptive steps.
///
/// The method is L-stable and needs one Jacobian and one LU factorisation of
/// `W = I - h·d·J` per step, so it keeps large steps through the stiff
/// stretches where drag relaxes the velocity much faster than the position
/// changes. The Jacobian is taken by forward differences and reused across
/// rejected attempts from the same point.
pub struct Rosenbrock23<E> {
    eom: E,
    rtol: f64,
    atol: f64,
    max_step: f64,
    initial_step: Option<f64>,
    stats: IntegrationStats,
}

impl<E> Rosenbrock23<E>
where
    E: EquationsOfMotion,
    E::State: Copy + From<StateVector> + Into<StateVector>,
{
    pub fn new(eom: E, settings: &SolverSettings) -> Self {
        Self {
            eom,
            rtol: settings.rtol,
            atol: settings.atol,
            max_step: settings.max_step,
            initial_step: settings.initial_step,
            stats: IntegrationStats::default(),
        }
    }

    fn rhs(&mut self, y: &StateVector) -> StateVector {
        self.stats.rhs_evaluations += 1;
        self.eom.compute_derivative(&E::State::from(*y)).into()
    }

    fn jacobian(&mut self, t: f64, y: &StateVector, f0: &StateVector) -> Jacobian {
        self.stats.jacobians += 1;
        debug!(t, "refreshing Jacobian");

        let mut jac = Jacobian::zeros();
        for j in 0..4 {
            let delta = f64::EPSILON.sqrt() * y[j].abs().max(1.0);
            let mut perturbed = *y;
            perturbed[j] += delta;
            let column = (self.rhs(&perturbed) - f0) / delta;
            jac.set_column(j, &column);
        }
        jac
    }

    /// Weighted RMS norm of a local error estimate.
    fn error_norm(&self, error: &StateVector, y_old: &StateVector, y_new: &StateVector) -> f64 {
        let sum: f64 = (0..4)
            .map(|i| {
                let scale = self.atol + self.rtol * y_old[i].abs().max(y_new[i].abs());
                (error[i] / scale).powi(2)
            })
            .sum();
        (sum / 4.0).sqrt()
    }

    fn initial_step_size(&self, y0: &StateVector, f0: &StateVector, span: f64) -> f64 {
        let h0 = self.initial_step.unwrap_or_else(|| {
            let scale = y0.map(|v| self.atol + self.rtol * v.abs());
            let d0 = y0.component_div(&scale).norm() / 2.0;
            let d1 = f0.component_div(&scale).norm() / 2.0;
            if d0 < 1e-5 || d1 < 1e-5 {
                1e-6
            } else {
                0.01 * d0 / d1
            }
        });
        h0.min(self.max_step).min(span)
    }

    fn attempt(
        &mut self,
        t: f64,
        y: &StateVector,
        f0: &StateVector,
        jac: &Jacobian,
        h: f64,
    ) -> Result<Attempt, IntegrationError> {
        let lu = (Jacobian::identity() - jac * (h * D)).lu();
        let solve = |b: StateVector| {
            lu.solve(&b)
                .ok_or(IntegrationError::SingularIterationMatrix { t })
        };

        let k1 = solve(*f0)?;
        let f1 = self.rhs(&(y + k1 * (0.5 * h)));
        let k2 = solve(f1 - k1)? + k1;
        let y_new = y + k2 * h;
        let f_new = self.rhs(&y_new);
        let k3 = solve(f_new - (k2 - f1) * E32 - (k1 - f0) * 2.0)?;

        let error = (k1 - k2 * 2.0 + k3) * (h / 6.0);
        Ok(Attempt {
            error: self.error_norm(&error, y, &y_new),
            y_new,
            f_new,
            k1,
            k2,
        })
    }

    fn locate<G>(
        &self,
        event: &G,
        dense: &DenseStep,
        (t_a, g_a): (f64, f64),
        (t_b, g_b): (f64, f64),
        y_b: &StateVector,
    ) -> Result<EventRecord<E::State>, IntegrationError>
    where
        G: EventFunction<E::State>,
    {
        let tol = 4.0 * f64::EPSILON * t_b.abs().max(1.0);
        let t = brent(
            |t| event.eval(t, &E::State::from(dense.eval(t))),
            t_a,
            t_b,
            g_a,
            g_b,
            tol,
        )?;
        let y = if t == t_b { *y_b } else { dense.eval(t) };

        Ok(EventRecord {
            t,
            state: E::State::from(y),
        })
    }

    /// Integrates from `(t0, initial)` until `t_end` or a terminal event.
    pub fn solve<G>(
        &mut self,
        t0: f64,
        initial: E::State,
        t_end: f64,
        event: &G,
        spec: EventSpec,
        grid: OutputGrid,
    ) -> Result<Solution<E::State>, IntegrationError>
    where
        G: EventFunction<E::State>,
    {
        if !(t_end > t0) || !t_end.is_finite() {
            return Err(IntegrationError::InvalidSettings(format!(
                "integration span [{t0}, {t_end}] is empty"
            )));
        }
        if let OutputGrid::Uniform(dt) = grid {
            if !(dt > 0.0) || !dt.is_finite() {
                return Err(IntegrationError::InvalidSettings(format!(
                    "output step must be positive, got {dt}"
                )));
            }
        }

        let mut t = t0;
        let mut y: StateVector = initial.into();
        if y.iter().any(|v| !v.is_finite()) {
            return Err(IntegrationError::NonFiniteState { t });
        }

        self.stats = IntegrationStats::default();
        let mut solution = Solution::starting_at(t0, initial);
        let mut f0 = self.rhs(&y);
        let mut g_old = event.eval(t, &initial);
        let mut h = self.initial_step_size(&y, &f0, t_end - t0);
        let mut next_k: u64 = 1;

        while t < t_end {
            let h_min = 16.0 * f64::EPSILON * t.abs().max(1.0);
            let jac = self.jacobian(t, &y, &f0);
            let mut rejected = false;

            let (attempt, last) = loop {
                h = h.min(self.max_step);
                let last = 1.1 * h >= t_end - t;
                if last {
                    h = t_end - t;
                }

                let attempt = self.attempt(t, &y, &f0, &jac, h)?;
                if attempt.error <= 1.0 {
                    break (attempt, last);
                }

                self.stats.rejected += 1;
                rejected = true;
                let factor = if attempt.error.is_finite() {
                    (SAFETY * attempt.error.powf(-1.0 / 3.0)).max(MIN_FACTOR)
                } else {
                    MIN_FACTOR
                };
                debug!(t, h, error = attempt.error, "step rejected");

                h *= factor;
                if h < h_min {
                    let finite = attempt.y_new.iter().all(|v| v.is_finite());
                    return Err(if finite {
                        IntegrationError::StepSizeUnderflow { t, h }
                    } else {
                        IntegrationError::NonFiniteState { t }
                    });
                }
            };

            self.stats.accepted += 1;
            let t_new = if last { t_end } else { t + h };
            let dense = DenseStep {
                t,
                h,
                y,
                k1: attempt.k1,
                k2: attempt.k2,
            };
            let state_new = E::State::from(attempt.y_new);
            let g_new = event.eval(t_new, &state_new);

            let crossing = if spec.direction.crossed(g_old, g_new) {
                Some(self.locate(event, &dense, (t, g_old), (t_new, g_new), &attempt.y_new)?)
            } else {
                None
            };
            let t_stop = match crossing {
                Some(record) if spec.terminal => record.t,
                _ => t_new,
            };

            if let OutputGrid::Uniform(dt) = grid {
                loop {
                    let t_k = t0 + next_k as f64 * dt;
                    if t_k >= t_stop {
                        break;
                    }
                    solution.push(t_k, E::State::from(dense.eval(t_k)));
                    next_k += 1;
                }
            }

            if let Some(record) = crossing {
                debug!(t = record.t, "event located");
                solution.events.push(record);
                if spec.terminal {
                    solution.push(record.t, record.state);
                    solution.terminated_by_event = true;
                    solution.stats = self.stats;
                    return Ok(solution);
                }
            }

            if grid == OutputGrid::Native || last {
                solution.push(t_new, state_new);
            }

            t = t_new;
            y = attempt.y_new;
            f0 = attempt.f_new;
            g_old = g_new;

            let factor = if attempt.error == 0.0 {
                MAX_FACTOR
            } else {
                (SAFETY * attempt.error.powf(-1.0 / 3.0)).clamp(MIN_FACTOR, MAX_FACTOR)
            };
            h *= if rejected { factor.min(1.0) } else { factor };
        }

        solution.stats = self.stats;
        Ok(solution)
    }
}
