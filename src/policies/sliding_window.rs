// Sliding window retention: FIFO over the most recent units.

use super::RetentionPolicy;
use crate::error::{MemoryError, Result};
use crate::units::ObservableUnit;
use std::collections::VecDeque;

/// Keeps the last `window_size` units in arrival order.
///
/// Units are stored raw, without per-entry case-id bookkeeping; equal
/// units from different cases occupy separate slots.
#[derive(Debug, Clone)]
pub struct SlidingWindowPolicy {
    window_size: usize,
    data: VecDeque<ObservableUnit>,
}

impl SlidingWindowPolicy {
    pub fn new(window_size: usize) -> Result<Self> {
        if window_size == 0 {
            return Err(MemoryError::Configuration(
                "window_size must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            window_size,
            data: VecDeque::with_capacity(window_size),
        })
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }
}

impl RetentionPolicy for SlidingWindowPolicy {
    fn update(&mut self, unit: ObservableUnit) {
        self.data.push_back(unit);
        while self.data.len() > self.window_size {
            self.data.pop_front();
        }
    }

    fn get_data(&self) -> Vec<ObservableUnit> {
        self.data.iter().cloned().collect()
    }

    /// Removes every stored unit matching some requested unit in both
    /// equality and case id.
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
        "SLIDING"
    }

    fn clone_policy(&self) -> Box<dyn RetentionPolicy> {
        Box::new(self.clone())
    }
}
