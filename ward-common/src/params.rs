use crate::error::{Result, WardError};
use serde::{Deserialize, Serialize};

/// Ward and population parameters, fixed for the whole of one simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    /// Ward capacity in beds (C).
    pub capacity: f64,
    /// Fraction of waiting patients admitted per unit time (alpha).
    pub admission_rate: f64,
    /// Baseline discharge/recovery rate (gamma).
    pub discharge_rate: f64,
    /// Staff availability multiplier (S).
    pub staff_availability: f64,
    /// Per-capita probability of an illness requiring hospitalization.
    pub illness_prob: f64,
    /// Population generating new illnesses.
    pub population: f64,
}

impl Parameters {
    /// Checks the structural preconditions of the model.
    ///
    /// Capacity and population must be strictly positive, the rates must be
    /// non-negative. NaN and infinities are rejected everywhere.
    pub fn validate(&self) -> Result<()> {
        if !(self.capacity > 0.0 && self.capacity.is_finite()) {
            return Err(WardError::Domain(format!(
                "capacity must be a positive finite number, got {}",
                self.capacity
            )));
        }
        if !(self.population > 0.0 && self.population.is_finite()) {
            return Err(WardError::Domain(format!(
                "population must be a positive finite number, got {}",
                self.population
            )));
        }
        let rates = [
            ("admission_rate", self.admission_rate),
            ("discharge_rate", self.discharge_rate),
            ("staff_availability", self.staff_availability),
            ("illness_prob", self.illness_prob),
        ];
        for (name, value) in rates {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(WardError::Domain(format!(
                    "{} must be a non-negative finite number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            capacity: 100.0,
            admission_rate: 0.1,
            discharge_rate: 0.1,
            staff_availability: 1.0,
            illness_prob: 0.005,
            population: 5000.0,
        }
    }
}

/// Ward state: patients currently admitted and patients waiting for a bed.
///
/// Neither count is clamped to be non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub current: f64,
    pub waiting: f64,
}

impl State {
    pub fn new(current: f64, waiting: f64) -> Self {
        State { current, waiting }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.current.is_finite() || !self.waiting.is_finite() {
            return Err(WardError::Domain(format!(
                "initial state must be finite, got P={} W={}",
                self.current, self.waiting
            )));
        }
        Ok(())
    }
}

impl Default for State {
    fn default() -> Self {
        State::new(50.0, 25.0)
    }
}
