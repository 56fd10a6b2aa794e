use serde::{Deserialize, Serialize};

/// The ward state at one requested time point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Simulation time in days.
    pub time: f64,
    /// Patients currently occupying ward capacity (P).
    pub current: f64,
    /// Patients waiting for admission (W).
    pub waiting: f64,
}

/// The ordered, time-indexed output of one integration run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    samples: Vec<Sample>,
}

/// Headline figures of a trajectory, used by reports and sweeps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySummary {
    pub peak_current: f64,
    pub peak_waiting: f64,
    /// Time of the first sample where the waiting list peaks.
    pub peak_waiting_time: f64,
    pub final_current: f64,
    pub final_waiting: f64,
    /// Number of samples where occupancy is at or over capacity.
    pub samples_at_capacity: usize,
}

impl Trajectory {
    pub fn new(samples: Vec<Sample>) -> Self {
        Trajectory { samples }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn times(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.time).collect()
    }

    pub fn current(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.current).collect()
    }

    pub fn waiting(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.waiting).collect()
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Summarizes the trajectory against a ward capacity.
    /// Returns `None` for an empty trajectory.
    pub fn summary(&self, capacity: f64) -> Option<TrajectorySummary> {
        let last = self.samples.last()?;
        let mut peak_current = f64::NEG_INFINITY;
        let mut peak_waiting = f64::NEG_INFINITY;
        let mut peak_waiting_time = 0.0;
        let mut samples_at_capacity = 0;

        for s in &self.samples {
            peak_current = peak_current.max(s.current);
            if s.waiting > peak_waiting {
                peak_waiting = s.waiting;
                peak_waiting_time = s.time;
            }
            if s.current >= capacity {
                samples_at_capacity += 1;
            }
        }

        Some(TrajectorySummary {
            peak_current,
            peak_waiting,
            peak_waiting_time,
            final_current: last.current,
            final_waiting: last.waiting,
            samples_at_capacity,
        })
    }
}

impl IntoIterator for Trajectory {
    type Item = Sample;
    type IntoIter = std::vec::IntoIter<Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.into_iter()
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
