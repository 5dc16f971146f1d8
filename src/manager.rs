// Memory manager: the merge-or-insert coordinator.
//
// Every arriving event is lifted into a unit, matched against the
// retained mergeable units of its case, and either merged back in or
// inserted fresh. The read path projects the policy's snapshot back to a
// flat event list through the handler.

use crate::event::BEvent;
use crate::handlers::UnitHandler;
use crate::policies::RetentionPolicy;

/// Coordinates one retention policy with one unit handler.
pub struct MemoryManager {
    policy: Box<dyn RetentionPolicy>,
    handler: Box<dyn UnitHandler>,
}

impl MemoryManager {
    pub fn new(policy: Box<dyn RetentionPolicy>, handler: Box<dyn UnitHandler>) -> Self {
        Self { policy, handler }
    }

    /// Feed one event through the merge-or-insert protocol.
    pub fn add_event(&mut self, event: BEvent) {
        let unit = self.handler.convert(event);
        debug_assert_eq!(
            unit.kind(),
            self.handler.kind(),
            "handler produced a unit of the wrong kind"
        );

        let Some(case_id) = unit.case_id().map(str::to_string) else {
            self.policy.update(unit);
            return;
        };

        let mergeable = self.policy.get_mergeable_elements(&case_id);
        if mergeable.is_empty() {
            self.policy.update(unit);
            return;
        }

        // Remove-merge-reinsert runs to completion before any read can
        // observe the policy; an empty merge result means the removed
        // units are gone for good.
        self.policy.remove_elements(&mergeable);
        let mut units = mergeable;
        units.push(unit);
        let merged = self.handler.merge(units);
        tracing::trace!("Case {} merged into {} unit(s)", case_id, merged.len());
        for unit in merged {
            self.policy.update(unit);
        }
    }

    /// Snapshot of the current summary as a flat event list. The caller
    /// owns the result.
    pub fn get_data(&self) -> Vec<BEvent> {
        self.handler.convert_back(self.policy.get_data())
    }

    pub fn policy(&self) -> &dyn RetentionPolicy {
        self.policy.as_ref()
    }

    pub fn handler(&self) -> &dyn UnitHandler {
        self.handler.as_ref()
    }
}

impl Clone for MemoryManager {
    fn clone(&self) -> Self {
        Self {
            policy: self.policy.clone_policy(),
            handler: self.handler.clone_handler(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::{EventUnitHandler, TraceUnitHandler};
    use crate::policies::SlidingWindowPolicy;
    use std::time::{Duration, UNIX_EPOCH};

    fn ev(name: &str, case: &str, secs: u64) -> BEvent {
        BEvent::new(name, case, "p", UNIX_EPOCH + Duration::from_secs(secs))
    }

    #[test]
    fn test_events_insert_without_merging() {
        let mut manager = MemoryManager::new(
            Box::new(SlidingWindowPolicy::new(10).unwrap()),
            Box::new(EventUnitHandler),
        );
        manager.add_event(ev("a", "t1", 1));
        manager.add_event(ev("b", "t1", 2));

        assert_eq!(manager.get_data().len(), 2);
    }

    #[test]
    fn test_same_case_traces_merge_into_one_unit() {
        let mut manager = MemoryManager::new(
            Box::new(SlidingWindowPolicy::new(10).unwrap()),
            Box::new(TraceUnitHandler),
        );
        manager.add_event(ev("a", "t1", 1));
        manager.add_event(ev("b", "t1", 2));
        manager.add_event(ev("c", "t1", 3));

        assert_eq!(manager.policy().distinct_keys(), 1);
        let names: Vec<String> = manager
            .get_data()
            .iter()
            .map(|e| e.event_name().to_string())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_clone_is_a_deep_copy() {
        let mut manager = MemoryManager::new(
            Box::new(SlidingWindowPolicy::new(10).unwrap()),
            Box::new(EventUnitHandler),
        );
        manager.add_event(ev("a", "t1", 1));

        let mut cloned = manager.clone();
        cloned.add_event(ev("b", "t1", 2));

        assert_eq!(manager.get_data().len(), 1);
        assert_eq!(cloned.get_data().len(), 2);
    }
}
