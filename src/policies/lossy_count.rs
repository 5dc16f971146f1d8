// Lossy counting retention (Manku-Motwani).
//
// Storage is keyed by unit equality; each entry holds the list of stored
// occurrences plus the bucket error term recorded at insertion. Entries
// whose occurrence count cannot exceed the error bound are dropped at
// every bucket boundary, giving the standard epsilon-deficient frequency
// guarantee with at most ~1/epsilon retained entries.

use super::RetentionPolicy;
use crate::error::{MemoryError, Result};
use crate::units::ObservableUnit;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct LossyEntry {
    occurrences: Vec<ObservableUnit>,
    delta: i64,
}

/// Approximate frequency retention with error bound `epsilon`.
#[derive(Debug, Clone)]
pub struct LossyCountPolicy {
    bucket_width: u64,
    data: HashMap<ObservableUnit, LossyEntry>,
    seen: u64,
}

impl LossyCountPolicy {
    pub fn new(epsilon: f64) -> Result<Self> {
        if !(epsilon > 0.0 && epsilon < 1.0) {
            return Err(MemoryError::Configuration(format!(
                "epsilon must be in (0, 1), got {epsilon}"
            )));
        }
        Ok(Self {
            bucket_width: (1.0 / epsilon).ceil() as u64,
            data: HashMap::new(),
            seen: 0,
        })
    }

    pub fn bucket_width(&self) -> u64 {
        self.bucket_width
    }

    fn bucket_id(&self) -> i64 {
        (self.seen / self.bucket_width) as i64
    }

    fn trim(&mut self) {
        let bucket_id = self.bucket_id();
        let before = self.data.len();
        self.data
            .retain(|_, entry| entry.occurrences.len() as i64 + entry.delta > bucket_id);
        let dropped = before - self.data.len();
        if dropped > 0 {
            tracing::debug!("Lossy trim dropped {} entries at bucket {}", dropped, bucket_id);
        }
    }
}

impl RetentionPolicy for LossyCountPolicy {
    fn update(&mut self, unit: ObservableUnit) {
        self.seen += 1;
        let delta = self.bucket_id() - 1;
        if let Some(entry) = self.data.get_mut(&unit) {
            entry.occurrences.push(unit);
        } else {
            self.data.insert(
                unit.clone(),
                LossyEntry {
                    occurrences: vec![unit],
                    delta,
                },
            );
        }

        if self.seen % self.bucket_width == 0 {
            self.trim();
        }
    }

    fn get_data(&self) -> Vec<ObservableUnit> {
        self.data
            .values()
            .flat_map(|entry| entry.occurrences.iter().cloned())
            .collect()
    }

    /// An occurrence survives only if it differs from the removed unit in
    /// both unit equality and case id.
    fn remove_elements(&mut self, units: &[ObservableUnit]) {
        for rem in units {
            let emptied = if let Some(entry) = self.data.get_mut(rem) {
                entry
                    .occurrences
                    .retain(|u| u != rem && u.case_id() != rem.case_id());
                entry.occurrences.is_empty()
            } else {
                false
            };
            if emptied {
                self.data.remove(rem);
            }
        }
    }

    fn get_mergeable_elements(&self, case_id: &str) -> Vec<ObservableUnit> {
        self.data
            .values()
            .flat_map(|entry| entry.occurrences.iter())
            .filter(|u| u.is_mergeable() && u.case_id() == Some(case_id))
            .cloned()
            .collect()
    }

    fn distinct_keys(&self) -> usize {
        self.data.len()
    }

    fn name(&self) -> &'static str {
        "LOSSY"
    }

    fn clone_policy(&self) -> Box<dyn RetentionPolicy> {
        Box::new(self.clone())
    }
}
