// Retention policies: bounded multisets of observable units.
//
// A policy decides which units survive as the stream outgrows memory.
// Window policies keep raw units in arrival order; the counting policies
// key storage by unit equality and track, per entry, the case ids the
// entry stands in for, expanding them back into per-case clones on read.

mod exponential_decay;
mod lossy_count;
mod lossy_count_budget;
mod reservoir;
mod sliding_window;
mod tumbling_window;

pub use exponential_decay::ExponentialDecayCountingPolicy;
pub use lossy_count::LossyCountPolicy;
pub use lossy_count_budget::LossyCountWithBudgetPolicy;
pub use reservoir::ReservoirSamplingPolicy;
pub use sliding_window::SlidingWindowPolicy;
pub use tumbling_window::TumblingWindowPolicy;

use crate::error::Result;
use crate::units::ObservableUnit;
use serde::{Deserialize, Serialize};

/// Bounded multiset of observable units.
pub trait RetentionPolicy: Send {
    /// Insert or reinforce a unit, then enforce the budget.
    fn update(&mut self, unit: ObservableUnit);

    /// Snapshot of the retained units. Map-backed policies emit one clone
    /// per stored case id, with that case id bound into the clone.
    fn get_data(&self) -> Vec<ObservableUnit>;

    /// Remove the given (unit, case id) occurrences.
    fn remove_elements(&mut self, units: &[ObservableUnit]);

    /// All retained mergeable units of a case, cloned, with the requested
    /// case id bound.
    fn get_mergeable_elements(&self, case_id: &str) -> Vec<ObservableUnit>;

    /// Number of distinct unit-equality classes currently retained.
    fn distinct_keys(&self) -> usize;

    /// Policy name for logs and reports.
    fn name(&self) -> &'static str;

    /// Deep copy, for drivers that reuse one configuration across runs.
    fn clone_policy(&self) -> Box<dyn RetentionPolicy>;
}

/// Retention policy configurations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RetentionPolicyKind {
    SlidingWindow { window_size: usize },
    TumblingWindow { window_size: usize },
    ReservoirSampling { budget: usize },
    LossyCount { epsilon: f64 },
    LossyCountWithBudget { budget: usize },
    ExponentialDecayCounting { budget: usize, decay: f64 },
}

/// Create a retention policy of the specified kind.
pub fn create_retention_policy(kind: RetentionPolicyKind) -> Result<Box<dyn RetentionPolicy>> {
    Ok(match kind {
        RetentionPolicyKind::SlidingWindow { window_size } => {
            Box::new(SlidingWindowPolicy::new(window_size)?)
        }
        RetentionPolicyKind::TumblingWindow { window_size } => {
            Box::new(TumblingWindowPolicy::new(window_size)?)
        }
        RetentionPolicyKind::ReservoirSampling { budget } => {
            Box::new(ReservoirSamplingPolicy::new(budget)?)
        }
        RetentionPolicyKind::LossyCount { epsilon } => Box::new(LossyCountPolicy::new(epsilon)?),
        RetentionPolicyKind::LossyCountWithBudget { budget } => {
            Box::new(LossyCountWithBudgetPolicy::new(budget)?)
        }
        RetentionPolicyKind::ExponentialDecayCounting { budget, decay } => {
            Box::new(ExponentialDecayCountingPolicy::new(budget, decay)?)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_factory() {
        let policy =
            create_retention_policy(RetentionPolicyKind::SlidingWindow { window_size: 10 }).unwrap();
        assert_eq!(policy.name(), "SLIDING");

        let policy =
            create_retention_policy(RetentionPolicyKind::TumblingWindow { window_size: 10 }).unwrap();
        assert_eq!(policy.name(), "TUMBLING");

        let policy =
            create_retention_policy(RetentionPolicyKind::ReservoirSampling { budget: 10 }).unwrap();
        assert_eq!(policy.name(), "RESERVOIR");

        let policy =
            create_retention_policy(RetentionPolicyKind::LossyCount { epsilon: 0.1 }).unwrap();
        assert_eq!(policy.name(), "LOSSY");

        let policy =
            create_retention_policy(RetentionPolicyKind::LossyCountWithBudget { budget: 10 })
                .unwrap();
        assert_eq!(policy.name(), "LOSSY-BUDGET");

        let policy = create_retention_policy(RetentionPolicyKind::ExponentialDecayCounting {
            budget: 10,
            decay: 0.9,
        })
        .unwrap();
        assert_eq!(policy.name(), "DECAY");
    }

    #[test]
    fn test_factory_rejects_bad_configuration() {
        assert!(
            create_retention_policy(RetentionPolicyKind::SlidingWindow { window_size: 0 }).is_err()
        );
        assert!(
            create_retention_policy(RetentionPolicyKind::TumblingWindow { window_size: 0 })
                .is_err()
        );
        assert!(
            create_retention_policy(RetentionPolicyKind::ReservoirSampling { budget: 0 }).is_err()
        );
        assert!(create_retention_policy(RetentionPolicyKind::LossyCount { epsilon: 0.0 }).is_err());
        assert!(create_retention_policy(RetentionPolicyKind::LossyCount { epsilon: 1.0 }).is_err());
        assert!(
            create_retention_policy(RetentionPolicyKind::LossyCountWithBudget { budget: 0 })
                .is_err()
        );
        assert!(create_retention_policy(RetentionPolicyKind::ExponentialDecayCounting {
            budget: 0,
            decay: 0.9,
        })
        .is_err());
        assert!(create_retention_policy(RetentionPolicyKind::ExponentialDecayCounting {
            budget: 10,
            decay: 0.0,
        })
        .is_err());
    }
}
