// Reservoir sampling retention (Vitter's Algorithm R).

use super::RetentionPolicy;
use crate::error::{MemoryError, Result};
use crate::units::ObservableUnit;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform random sample of the stream, at most `budget` units.
///
/// After `n` updates every unit seen so far has probability
/// `budget / n` of sitting in the reservoir.
#[derive(Debug, Clone)]
pub struct ReservoirSamplingPolicy {
    budget: usize,
    data: Vec<ObservableUnit>,
    seen: u64,
    rng: StdRng,
}

impl ReservoirSamplingPolicy {
    pub fn new(budget: usize) -> Result<Self> {
        Self::with_rng(budget, StdRng::from_os_rng())
    }

    /// Fixed-seed variant for reproducible sampling.
    pub fn with_seed(budget: usize, seed: u64) -> Result<Self> {
        Self::with_rng(budget, StdRng::seed_from_u64(seed))
    }

    fn with_rng(budget: usize, rng: StdRng) -> Result<Self> {
        if budget == 0 {
            return Err(MemoryError::Configuration(
                "budget must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            budget,
            data: Vec::with_capacity(budget),
            seen: 0,
            rng,
        })
    }

    pub fn budget(&self) -> usize {
        self.budget
    }
}

impl RetentionPolicy for ReservoirSamplingPolicy {
    fn update(&mut self, unit: ObservableUnit) {
        self.seen += 1;
        if self.data.len() < self.budget {
            self.data.push(unit);
        } else {
            let j = self.rng.random_range(0..self.seen);
            if (j as usize) < self.budget {
                self.data[j as usize] = unit;
            }
        }
    }

    fn get_data(&self) -> Vec<ObservableUnit> {
        self.data.clone()
    }

    fn remove_elements(&mut self, units: &[ObservableUnit]) {
        self.data
            .retain(|u| !units.iter().any(|rem| u == rem && u.case_id() == rem.case_id()));
    }

    fn get_mergeable_elements(&self, case_id: &str) -> Vec<ObservableUnit> {
        self.data
            .iter()
            .filter(|u| u.is_mergeable() && u.case_id() == Some(case_id))
            .cloned()
            .collect()
    }

    fn distinct_keys(&self) -> usize {
        self.data.len()
    }

    fn name(&self) -> &'static str {
        "RESERVOIR"
    }

    fn clone_policy(&self) -> Box<dyn RetentionPolicy> {
        Box::new(self.clone())
    }
}
