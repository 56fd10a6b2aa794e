//! Adaptive Dormand–Prince integration reported on a fixed time grid.
//!
//! The stepping is done by `ode_solvers::Dopri5` with dense output at the grid
//! spacing; this module validates the inputs, drives the solver and maps its
//! failures into the crate's error taxonomy.

use log::{debug, trace};
use ode_solvers::dopri5::Dopri5;
use ode_solvers::{System, Vector2};
use ward_common::{Result, SolverConfig, WardError};

/// Two-variable state vector handed to the solver.
pub type StateVector = Vector2<f64>;

/// Tolerances for [`solve_on_grid`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverOptions {
    pub rtol: f64,
    pub atol: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        SolverOptions::from(&SolverConfig::default())
    }
}

impl From<&SolverConfig> for SolverOptions {
    fn from(config: &SolverConfig) -> Self {
        SolverOptions { rtol: config.rtol, atol: config.atol }
    }
}

impl SolverOptions {
    pub fn validate(&self) -> Result<()> {
        if !self.rtol.is_finite() || self.rtol <= 0.0 {
            return Err(WardError::Domain("rtol must be finite and > 0".into()));
        }
        if !self.atol.is_finite() || self.atol <= 0.0 {
            return Err(WardError::Domain("atol must be finite and > 0".into()));
        }
        Ok(())
    }
}

/// Counters collected over one solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverStats {
    pub accepted: u32,
    pub rejected: u32,
    pub rhs_evals: u32,
}

/// States at each grid point, in grid order. `states[0]` is the initial state.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSolution {
    pub states: Vec<StateVector>,
    pub stats: SolverStats,
}

/// Integrates `system` from `y0` at `grid[0]` and reports the state at every
/// point of an evenly spaced `grid`.
///
/// # Errors
///
/// Domain errors for invalid options, a grid that is not finite, evenly spaced
/// and strictly increasing, or a non-finite `y0`. Computation errors when the
/// solver gives up (step size underflow, step budget, stiffness) or the state
/// stops being finite.
pub fn solve_on_grid<F>(
    system: F,
    y0: StateVector,
    grid: &[f64],
    opts: &SolverOptions,
) -> Result<GridSolution>
where
    F: System<f64, StateVector>,
{
    opts.validate()?;
    if y0.iter().any(|v| !v.is_finite()) {
        return Err(WardError::Domain("initial state must be finite".into()));
    }
    let (t0, t_end) = match (grid.first(), grid.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return Err(WardError::Domain("time grid is empty".into())),
    };
    if grid.len() == 1 {
        return Ok(GridSolution { states: vec![y0], stats: SolverStats::default() });
    }
    if grid.iter().any(|t| !t.is_finite()) || grid.windows(2).any(|w| w[1] <= w[0]) {
        return Err(WardError::Domain("time grid must be finite and strictly increasing".into()));
    }

    let dx = (t_end - t0) / (grid.len() - 1) as f64;
    let tolerance = matching_tolerance(t0, t_end);
    if grid.iter().enumerate().any(|(i, t)| (t - (t0 + i as f64 * dx)).abs() > tolerance) {
        return Err(WardError::Domain("time grid must be evenly spaced".into()));
    }

    // Dense output times accumulate `dx` and can land a rounding error past
    // `t_end`; integrating marginally further keeps the last grid point.
    let x_end = t_end + tolerance;
    let mut stepper = Dopri5::new(system, t0, x_end, dx, y0, opts.rtol, opts.atol);
    let stats = match stepper.integrate() {
        Ok(stats) => SolverStats {
            accepted: stats.accepted_steps,
            rejected: stats.rejected_steps,
            rhs_evals: stats.num_eval,
        },
        Err(e) => {
            return Err(WardError::Computation(format!(
                "solver failed between t={} and t={}: {}",
                t0, t_end, e
            )))
        }
    };

    let states = collect_grid_states(grid, y0, stepper.x_out(), stepper.y_out(), tolerance)?;

    debug!(
        "Solver finished: {} accepted, {} rejected, {} rhs evaluations",
        stats.accepted, stats.rejected, stats.rhs_evals
    );

    Ok(GridSolution { states, stats })
}

// Largest distance at which a dense output time still counts as a grid point
fn matching_tolerance(t0: f64, t_end: f64) -> f64 {
    1e-9 * t0.abs().max(t_end.abs()).max(1.0)
}

/// Picks the dense output sample for every grid time after the first.
/// The first state is `y0` itself, never an interpolated value.
fn collect_grid_states(
    grid: &[f64],
    y0: StateVector,
    x_out: &[f64],
    y_out: &[StateVector],
    tolerance: f64,
) -> Result<Vec<StateVector>> {
    let mut states = Vec::with_capacity(grid.len());
    states.push(y0);

    let mut outputs = x_out.iter().zip(y_out).peekable();
    for &t in &grid[1..] {
        // Skip output before `t`, including any repeated initial point.
        while let Some((&x, _)) = outputs.peek() {
            if x < t - tolerance {
                outputs.next();
            } else {
                break;
            }
        }
        match outputs.next() {
            Some((&x, y)) if (x - t).abs() <= tolerance => {
                if y.iter().any(|v| !v.is_finite()) {
                    return Err(WardError::Computation(format!(
                        "state became non-finite at t={:.6}",
                        t
                    )));
                }
                trace!("grid point t={:.6} from dense output at x={:.6}", t, x);
                states.push(*y);
            }
            _ => {
                return Err(WardError::Computation(format!(
                    "solver produced no output at t={:.6}",
                    t
                )))
            }
        }
    }
    Ok(states)
}

/// `num` evenly spaced points over `[start, stop]`, both ends included.
/// The last point is exactly `stop`.
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            let mut points: Vec<f64> = (0..num).map(|i| start + i as f64 * step).collect();
            points[num - 1] = stop;
            points
        }
    }
}
