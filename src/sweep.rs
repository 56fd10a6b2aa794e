//! Capacity sweeps: the same scenario simulated across several ward sizes.

use crate::integrator::SolverOptions;
use crate::simulation::simulate_with;
use log::{debug, info};
use rayon::prelude::*;
use ward_common::{Parameters, Result, State, TrajectorySummary, WardError};

/// Outcome of one capacity in a sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPoint {
    pub capacity: f64,
    pub outcome: Result<TrajectorySummary>,
}

/// Runs one independent simulation per capacity, in parallel. Results keep
/// the order of `capacities`; a failing capacity does not affect the others.
pub fn capacity_sweep(
    initial: State,
    params: &Parameters,
    days: usize,
    capacities: &[f64],
    opts: &SolverOptions,
) -> Vec<SweepPoint> {
    info!("Sweeping {} capacities over {} days", capacities.len(), days);

    capacities
        .par_iter()
        .map(|&capacity| {
            let run_params = Parameters { capacity, ..*params };
            let outcome = simulate_with(initial, &run_params, days, opts).and_then(|trajectory| {
                trajectory
                    .summary(capacity)
                    .ok_or_else(|| WardError::Computation("solver returned no samples".into()))
            });
            debug!("Capacity {} done: ok={}", capacity, outcome.is_ok());
            SweepPoint { capacity, outcome }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::simulate;

    #[test]
    fn preserves_input_order() {
        let capacities = [200.0, 50.0, 150.0, 100.0];
        let points = capacity_sweep(
            State::default(),
            &Parameters::default(),
            30,
            &capacities,
            &SolverOptions::default(),
        );
        let got: Vec<f64> = points.iter().map(|p| p.capacity).collect();
        assert_eq!(got, capacities.to_vec());
    }

    #[test]
    fn matches_individual_runs() {
        let params = Parameters::default();
        let points = capacity_sweep(State::default(), &params, 30, &[80.0], &SolverOptions::default());
        let direct = simulate(State::default(), &Parameters { capacity: 80.0, ..params }, 30)
            .unwrap()
            .summary(80.0)
            .unwrap();
        assert_eq!(points[0].outcome, Ok(direct));
    }

    #[test]
    fn bad_capacity_fails_alone() {
        let points = capacity_sweep(
            State::default(),
            &Parameters::default(),
            30,
            &[100.0, 0.0],
            &SolverOptions::default(),
        );
        assert!(points[0].outcome.is_ok());
        assert!(points[1].outcome.as_ref().unwrap_err().is_domain());
    }

    #[test]
    fn more_beds_never_lengthen_the_final_queue() {
        let points = capacity_sweep(
            State::default(),
            &Parameters::default(),
            50,
            &[50.0, 100.0, 200.0],
            &SolverOptions::default(),
        );
        let finals: Vec<f64> = points
            .iter()
            .map(|p| p.outcome.as_ref().unwrap().final_waiting)
            .collect();
        assert!(finals[0] >= finals[1] - 1e-9);
        assert!(finals[1] >= finals[2] - 1e-9);
    }
}
