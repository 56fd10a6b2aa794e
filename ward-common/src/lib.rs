pub mod config;
pub mod error;
pub mod params;
pub mod trajectory;

// Re-export key types for easier use by dependent crates
pub use config::{ScenarioConfig, WardConfig, PopulationConfig, InitialConditions, TimingConfig, SolverConfig, OutputConfig, OutputFormat, SweepConfig};
pub use error::{Result, WardError};
pub use params::{Parameters, State};
pub use trajectory::{Sample, Trajectory, TrajectorySummary};
