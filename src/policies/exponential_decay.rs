// Exponentially decayed counting.
//
// Every entry carries a weight that ages as exp(-decay * dt) between
// touches. An update first runs one decay pass over all entries (only the
// matched entry's timestamp advances in that pass), then increments the
// matched entry in place. Over budget, the entry with the lowest effective
// weight is evicted. Negative clock deltas are clamped to zero.

use super::RetentionPolicy;
use crate::clock::{Clock, SystemClock};
use crate::error::{MemoryError, Result};
use crate::units::ObservableUnit;
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_DECAY: f64 = 0.9;

#[derive(Debug, Clone)]
struct DecayEntry {
    case_ids: Vec<String>,
    weight: f64,
    last_updated: Duration,
}

impl DecayEntry {
    fn effective_weight(&self, now: Duration, decay: f64) -> f64 {
        let dt = now.saturating_sub(self.last_updated);
        self.weight * (-decay * dt.as_secs_f64()).exp()
    }
}

/// Recency-weighted retention with a hard key budget.
pub struct ExponentialDecayCountingPolicy {
    budget: usize,
    decay: f64,
    clock: Box<dyn Clock>,
    data: HashMap<ObservableUnit, DecayEntry>,
}

impl ExponentialDecayCountingPolicy {
    pub fn new(budget: usize, decay: f64) -> Result<Self> {
        Self::with_clock(budget, decay, Box::new(SystemClock))
    }

    /// Injectable time source for deterministic tests.
    pub fn with_clock(budget: usize, decay: f64, clock: Box<dyn Clock>) -> Result<Self> {
        if budget == 0 {
            return Err(MemoryError::Configuration(
                "budget must be greater than 0".to_string(),
            ));
        }
        if decay <= 0.0 {
            return Err(MemoryError::Configuration(format!(
                "decay must be greater than 0, got {decay}"
            )));
        }
        Ok(Self {
            budget,
            decay,
            clock,
            data: HashMap::new(),
        })
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    pub fn decay(&self) -> f64 {
        self.decay
    }

    fn trim(&mut self) {
        let now = self.clock.now();
        let decay = self.decay;

        let victim = self
            .data
            .iter()
            .min_by(|a, b| {
                a.1.effective_weight(now, decay)
                    .partial_cmp(&b.1.effective_weight(now, decay))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(unit, _)| unit.clone());

        if let Some(unit) = victim {
            tracing::debug!("Decay trim evicted the lightest entry");
            self.data.remove(&unit);
        }
    }
}

impl RetentionPolicy for ExponentialDecayCountingPolicy {
    fn update(&mut self, unit: ObservableUnit) {
        let now = self.clock.now();

        // Decay pass: weights age in place; only the matched entry's
        // timestamp advances here.
        for (key, entry) in self.data.iter_mut() {
            let dt = now.saturating_sub(entry.last_updated);
            entry.weight *= (-self.decay * dt.as_secs_f64()).exp();
            if *key == unit {
                entry.last_updated = now;
            }
        }

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
            entry.weight += 1.0;
            entry.last_updated = now;
        } else {
            self.data.insert(
                unit,
                DecayEntry {
                    case_ids: vec![case_id],
                    weight: 1.0,
                    last_updated: now,
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
        "DECAY"
    }

    fn clone_policy(&self) -> Box<dyn RetentionPolicy> {
        Box::new(Self {
            budget: self.budget,
            decay: self.decay,
            clock: self.clock.clone_clock(),
            data: self.data.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::event::BEvent;
    use std::time::{Duration, UNIX_EPOCH};

    fn event_unit(name: &str, case: &str, secs: u64) -> ObservableUnit {
        ObservableUnit::Event {
            event: BEvent::new(name, case, "p", UNIX_EPOCH + Duration::from_secs(secs)),
        }
    }

    fn policy_with_clock(budget: usize) -> (ExponentialDecayCountingPolicy, ManualClock) {
        let clock = ManualClock::new();
        let policy =
            ExponentialDecayCountingPolicy::with_clock(budget, DEFAULT_DECAY, Box::new(clock.clone()))
                .unwrap();
        (policy, clock)
    }

    #[test]
    fn test_rejects_bad_configuration() {
        assert!(ExponentialDecayCountingPolicy::new(0, 0.9).is_err());
        assert!(ExponentialDecayCountingPolicy::new(10, 0.0).is_err());
        assert!(ExponentialDecayCountingPolicy::new(10, -1.0).is_err());
    }

    #[test]
    fn test_trim_evicts_lightest_entry() {
        let (mut policy, clock) = policy_with_clock(2);

        policy.update(event_unit("a", "t1", 1));
        clock.advance(Duration::from_secs(1));
        policy.update(event_unit("b", "t2", 2));
        policy.update(event_unit("c", "t3", 3));

        // "a" has decayed the longest; it goes.
        assert_eq!(policy.distinct_keys(), 2);
        let data = policy.get_data();
        assert!(!data.contains(&event_unit("a", "t1", 1)));
        assert!(data.contains(&event_unit("b", "t2", 2)));
        assert!(data.contains(&event_unit("c", "t3", 3)));
    }

    #[test]
    fn test_reinforcement_outweighs_decay() {
        let (mut policy, clock) = policy_with_clock(2);

        policy.update(event_unit("a", "t1", 1));
        clock.advance(Duration::from_secs(1));
        policy.update(event_unit("a", "t1", 1));
        policy.update(event_unit("b", "t2", 2));
        policy.update(event_unit("c", "t3", 3));

        // "a" was touched twice; "b" arrived later but carries less
        // weight than the reinforced entry.
        let data = policy.get_data();
        assert!(data.contains(&event_unit("a", "t1", 1)));
    }

    #[test]
    fn test_clock_rewind_is_clamped() {
        let (mut policy, clock) = policy_with_clock(5);

        clock.set(Duration::from_secs(100));
        policy.update(event_unit("a", "t1", 1));

        clock.set(Duration::from_secs(50));
        policy.update(event_unit("a", "t1", 1));

        // dt clamps to zero: no decay, one reinforcement.
        assert_eq!(policy.distinct_keys(), 1);
        assert_eq!(policy.get_data().len(), 2);
    }

    #[test]
    fn test_budget_holds_under_distinct_stream() {
        let (mut policy, clock) = policy_with_clock(4);
        for i in 0..40 {
            policy.update(event_unit(&format!("e{i}"), "t1", i));
            clock.advance(Duration::from_millis(100));
        }
        assert!(policy.distinct_keys() <= 4);
    }
}
