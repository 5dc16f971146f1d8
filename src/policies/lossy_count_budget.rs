// Budget-capped lossy counting.
//
// Keeps at most `budget` distinct unit-equality classes. Each entry
// records the case ids it stands in for (capped to the most recent
// `budget`) and the update counter at its last touch. When the cap is
// exceeded, the entry minimizing
//
//     0.6 * |case_ids| + 0.4 * (N - last_updated)
//
// is evicted, preferring entries older than a minimum lifetime of
// `(budget / 3) * 2` updates.

use super::RetentionPolicy;
use crate::error::{MemoryError, Result};
use crate::units::ObservableUnit;
use std::collections::HashMap;

const TRIM_ALPHA: f64 = 0.6;

#[derive(Debug, Clone)]
struct BudgetEntry {
    case_ids: Vec<String>,
    last_updated: u64,
}

impl BudgetEntry {
    fn score(&self, seen: u64) -> f64 {
        self.case_ids.len() as f64 * TRIM_ALPHA
            + (seen - self.last_updated) as f64 * (1.0 - TRIM_ALPHA)
    }
}

/// Frequency/recency-weighted retention with a hard key budget.
#[derive(Debug, Clone)]
pub struct LossyCountWithBudgetPolicy {
    budget: usize,
    data: HashMap<ObservableUnit, BudgetEntry>,
    seen: u64,
}

impl LossyCountWithBudgetPolicy {
    pub fn new(budget: usize) -> Result<Self> {
        if budget == 0 {
            return Err(MemoryError::Configuration(
                "budget must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            budget,
            data: HashMap::new(),
            seen: 0,
        })
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    fn trim(&mut self) {
        let min_lifetime = (self.budget as u64 / 3) * 2;
        let seen = self.seen;

        let mut candidates: Vec<(&ObservableUnit, &BudgetEntry)> = self
            .data
            .iter()
            .filter(|(_, entry)| seen - entry.last_updated > min_lifetime)
            .collect();
        if candidates.is_empty() {
            candidates = self.data.iter().collect();
        }

        let victim = candidates
            .into_iter()
            .min_by(|a, b| {
                a.1.score(seen)
                    .partial_cmp(&b.1.score(seen))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(unit, _)| unit.clone());

        if let Some(unit) = victim {
            tracing::debug!("Budget trim evicted an entry at N={}", seen);
            self.data.remove(&unit);
        }
    }
}

impl RetentionPolicy for LossyCountWithBudgetPolicy {
    fn update(&mut self, unit: ObservableUnit) {
        self.seen += 1;

        debug_assert!(unit.case_id().is_some(), "stored units must carry a case id");
        let Some(case_id) = unit.case_id().map(str::to_string) else {
            return;
        };

        if let Some(entry) = self.data.get_mut(&unit) {
            entry.case_ids.push(case_id);
            if entry.case_ids.len() > self.budget {
                let excess = entry.case_ids.len() - self.budget;
                entry.case_ids.drain(..excess);
            }
            entry.last_updated = self.seen;
        } else {
            self.data.insert(
                unit,
                BudgetEntry {
                    case_ids: vec![case_id],
                    last_updated: self.seen,
                },
            );
        }

        if self.data.len() > self.budget {
            self.trim();
        }
    }

    fn get_data(&self) -> Vec<ObservableUnit> {
        let mut units = Vec::new();
        for (unit, entry) in &self.data {
            for case_id in &entry.case_ids {
                let mut u = unit.clone();
                u.set_case_id(case_id);
                units.push(u);
            }
        }
        units
    }

    fn remove_elements(&mut self, units: &[ObservableUnit]) {
        for rem in units {
            let emptied = if let Some(entry) = self.data.get_mut(rem) {
                if let Some(case_id) = rem.case_id() {
                    if let Some(pos) = entry.case_ids.iter().position(|c| c == case_id) {
                        entry.case_ids.remove(pos);
                    }
                }
                entry.case_ids.is_empty()
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
            .iter()
            .filter(|(unit, entry)| {
                unit.is_mergeable() && entry.case_ids.iter().any(|c| c == case_id)
            })
            .map(|(unit, _)| {
                let mut u = unit.clone();
                u.set_case_id(case_id);
                u
            })
            .collect()
    }

    fn distinct_keys(&self) -> usize {
        self.data.len()
    }

    fn name(&self) -> &'static str {
        "LOSSY-BUDGET"
    }

    fn clone_policy(&self) -> Box<dyn RetentionPolicy> {
        Box::new(self.clone())
    }
}
