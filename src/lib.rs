//! Hospital ward strain simulator.
//!
//! Models the coupled evolution of admitted patients (P) and patients waiting
//! for a bed (W) under a fixed capacity, staffing, admission and discharge
//! policy, and integrates it into a time series.

pub mod dynamics;
pub mod integrator;
pub mod simulation;
pub mod sweep;

pub use dynamics::{ward_rates, WardModel, WardRates, MIN_DISCHARGE_RATE};
pub use integrator::{solve_on_grid, GridSolution, SolverOptions, SolverStats, StateVector};
pub use simulation::{simulate, simulate_with, time_grid};
pub use sweep::{capacity_sweep, SweepPoint};
pub use ward_common::{Parameters, Sample, State, Trajectory, TrajectorySummary, WardError};
