//! Ward-pressure dynamics: the right-hand side of the (P, W) system.

use ward_common::{Parameters, Result, State};

/// Lower bound on the adjusted discharge rate. The ward never stops discharging,
/// however overloaded it is.
pub const MIN_DISCHARGE_RATE: f64 = 0.01;

/// Every intermediate quantity of one derivative evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WardRates {
    /// New patients entering the waiting pool per unit time.
    pub new_illnesses: f64,
    /// Normalized occupancy overshoot, zero at or under capacity.
    pub ward_pressure: f64,
    /// Discharge rate after pressure and staffing adjustment.
    pub adjusted_discharge_rate: f64,
    /// Flow from the waiting pool into the ward.
    pub admitted: f64,
    /// dP/dt
    pub d_current: f64,
    /// dW/dt
    pub d_waiting: f64,
}

/// Ward model bound to a validated parameter set.
#[derive(Debug, Clone, Copy)]
pub struct WardModel {
    params: Parameters,
}

impl WardModel {
    /// Validates `params` and binds them to a model. Fails with a domain error
    /// for non-positive capacity or population.
    pub fn new(params: Parameters) -> Result<Self> {
        params.validate()?;
        Ok(WardModel { params })
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// Evaluates the model at `state` and returns the full breakdown.
    pub fn rates(&self, state: State) -> WardRates {
        let p = &self.params;
        let State { current, waiting } = state;

        let new_illnesses = p.illness_prob * p.population;

        let ward_pressure = (current / p.capacity - 1.0).max(0.0);
        let adjusted_discharge_rate =
            (p.discharge_rate * (1.0 - ward_pressure) * p.staff_availability).max(MIN_DISCHARGE_RATE);

        // No admissions at or over capacity.
        let admitted = if current < p.capacity {
            waiting
                .min(p.admission_rate * waiting)
                .min(p.capacity - current)
        } else {
            0.0
        };

        WardRates {
            new_illnesses,
            ward_pressure,
            adjusted_discharge_rate,
            admitted,
            d_current: admitted - adjusted_discharge_rate * current,
            d_waiting: new_illnesses - admitted,
        }
    }

    /// (dP/dt, dW/dt) at `state`.
    pub fn derivative(&self, state: State) -> (f64, f64) {
        let r = self.rates(state);
        (r.d_current, r.d_waiting)
    }
}

/// Checked one-shot evaluation: validates `params` before computing the rates.
pub fn ward_rates(state: State, params: &Parameters) -> Result<WardRates> {
    Ok(WardModel::new(*params)?.rates(state))
}
