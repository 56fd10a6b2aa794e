use crate::dynamics::WardModel;
use crate::integrator::{linspace, solve_on_grid, SolverOptions, StateVector};
use log::{debug, warn};
use ode_solvers::System;
use ward_common::{Parameters, Result, Sample, State, Trajectory, WardError};

// The system is autonomous: time only indexes the samples.
impl System<f64, StateVector> for WardModel {
    fn system(&self, _t: f64, y: &StateVector, dy: &mut StateVector) {
        let (d_current, d_waiting) = self.derivative(State::new(y[0], y[1]));
        dy[0] = d_current;
        dy[1] = d_waiting;
    }
}

/// The sample times for a run of `days`: `days` points spanning `[0, days]`.
pub fn time_grid(days: usize) -> Result<Vec<f64>> {
    if days < 2 {
        return Err(WardError::Domain(format!(
            "days must be at least 2 to span a duration, got {}",
            days
        )));
    }
    Ok(linspace(0.0, days as f64, days))
}

/// Simulates the ward from `initial` with the default solver options.
///
/// Each call is self-contained: identical inputs give bit-identical output.
pub fn simulate(initial: State, params: &Parameters, days: usize) -> Result<Trajectory> {
    simulate_with(initial, params, days, &SolverOptions::default())
}

/// Simulates the ward from `initial`, sampling `days` equally spaced points
/// over `[0, days]`.
///
/// # Errors
///
/// [`WardError::Domain`] for invalid parameters, a non-finite initial state or
/// `days < 2`; [`WardError::Computation`] when the solver fails.
pub fn simulate_with(
    initial: State,
    params: &Parameters,
    days: usize,
    opts: &SolverOptions,
) -> Result<Trajectory> {
    let model = WardModel::new(*params)?;
    initial.validate()?;
    let grid = time_grid(days)?;

    if initial.current < 0.0 || initial.waiting < 0.0 {
        warn!(
            "Negative initial state (P={}, W={}); the model does not clamp it.",
            initial.current, initial.waiting
        );
    }
    debug!("Simulating {} days from {:?} with {:?}", days, initial, params);

    let y0 = StateVector::new(initial.current, initial.waiting);
    let solution = solve_on_grid(model, y0, &grid, opts)?;

    let samples = grid
        .iter()
        .zip(&solution.states)
        .map(|(&time, y)| Sample { time, current: y[0], waiting: y[1] })
        .collect();

    Ok(Trajectory::new(samples))
}
