use serde::{Deserialize, Serialize};
use anyhow::Result;
use crate::params::{Parameters, State};
use std::path::Path;

// Configuration for the ward itself
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct WardConfig {
    pub capacity: f64,
    pub admission_rate: f64,
    pub discharge_rate: f64,
    #[serde(default = "default_staff_availability")]
    pub staff_availability: f64,
}

// Configuration for the population feeding the waiting list
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PopulationConfig {
    pub illness_probability: f64,
    pub size: f64,
}

// Initial conditions for the simulation, loaded from config.toml
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct InitialConditions {
    pub current_patients: f64,
    pub waiting_patients: f64,
}

// Configuration for timing
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TimingConfig {
    /// Number of samples on the [0, days] grid.
    pub days: usize,
}

// Tolerances for the adaptive solver
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SolverConfig {
    #[serde(default = "default_tolerance")]
    pub rtol: f64,
    #[serde(default = "default_tolerance")]
    pub atol: f64,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

// Configuration for output settings. Output always goes to stdout.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_output_format")]
    pub format: OutputFormat,
}

// Capacities to compare when running a sweep
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct SweepConfig {
    #[serde(default)]
    pub capacities: Vec<f64>,
}

// Main scenario structure, loaded from config.toml.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub ward: WardConfig,
    pub population: PopulationConfig,
    pub initial_conditions: InitialConditions,
    pub timing: TimingConfig,
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub sweep: SweepConfig,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            rtol: default_tolerance(),
            atol: default_tolerance(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig { format: default_output_format() }
    }
}

impl ScenarioConfig {
    /// Loads a scenario from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e))?;
        let config = Self::from_toml_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Invalid scenario in '{}': {}", path_ref.display(), e))?;

        Ok(config)
    }

    /// Parses and validates a scenario from TOML text.
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: ScenarioConfig = toml::from_str(config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// The scenario used by the reference deployment on start-up.
    pub fn reference() -> Self {
        let params = Parameters::default();
        let initial = State::default();
        ScenarioConfig {
            ward: WardConfig {
                capacity: params.capacity,
                admission_rate: params.admission_rate,
                discharge_rate: params.discharge_rate,
                staff_availability: params.staff_availability,
            },
            population: PopulationConfig {
                illness_probability: params.illness_prob,
                size: params.population,
            },
            initial_conditions: InitialConditions {
                current_patients: initial.current,
                waiting_patients: initial.waiting,
            },
            timing: TimingConfig { days: 50 },
            solver: SolverConfig::default(),
            output: OutputConfig::default(),
            sweep: SweepConfig::default(),
        }
    }

    fn validate(&self) -> Result<()> {
        self.parameters().validate()?;
        self.initial_state().validate()?;
        if self.timing.days < 2 {
            anyhow::bail!("timing.days must be at least 2, got {}.", self.timing.days);
        }
        if let Some(c) = self.sweep.capacities.iter().find(|c| !(**c > 0.0)) {
            anyhow::bail!("sweep capacities must be positive, got {}.", c);
        }
        Ok(())
    }

    /// Converts the configuration into the model parameters used at runtime.
    pub fn parameters(&self) -> Parameters {
        Parameters {
            capacity: self.ward.capacity,
            admission_rate: self.ward.admission_rate,
            discharge_rate: self.ward.discharge_rate,
            staff_availability: self.ward.staff_availability,
            illness_prob: self.population.illness_probability,
            population: self.population.size,
        }
    }

    pub fn initial_state(&self) -> State {
        State::new(
            self.initial_conditions.current_patients,
            self.initial_conditions.waiting_patients,
        )
    }
}

fn default_staff_availability() -> f64 {
    1.0
}

// Matches the usual LSODA-style default tolerance (sqrt of machine epsilon)
fn default_tolerance() -> f64 {
    1.49012e-8
}

fn default_output_format() -> OutputFormat {
    OutputFormat::Table
}
