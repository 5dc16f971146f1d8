// Per-case trace handler: one unit accumulates every event of a case.

use super::UnitHandler;
use crate::event::BEvent;
use crate::units::{ObservableUnit, UnitKind};

/// Handler for trace units.
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceUnitHandler;

impl UnitHandler for TraceUnitHandler {
    fn kind(&self) -> UnitKind {
        UnitKind::Trace
    }

    fn convert(&self, event: BEvent) -> ObservableUnit {
        ObservableUnit::Trace {
            events: vec![event],
        }
    }

    /// Defined only for exactly two units: appends the newer unit's events
    /// to the retained trace.
    fn merge(&self, mut units: Vec<ObservableUnit>) -> Vec<ObservableUnit> {
        if units.len() != 2 {
            return Vec::new();
        }
        let (Some(newer), Some(older)) = (units.pop(), units.pop()) else {
            return Vec::new();
        };

        match (older, newer) {
            (ObservableUnit::Trace { mut events }, ObservableUnit::Trace { events: tail }) => {
                events.extend(tail);
                vec![ObservableUnit::Trace { events }]
            }
            _ => Vec::new(),
        }
    }

    fn convert_back(&self, units: Vec<ObservableUnit>) -> Vec<BEvent> {
        let mut ret = Vec::new();
        for unit in units {
            if let ObservableUnit::Trace { events } = unit {
                ret.extend(events);
            }
        }
        ret
    }

    fn clone_handler(&self) -> Box<dyn UnitHandler> {
        Box::new(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    fn ev(name: &str, case: &str, secs: u64) -> BEvent {
        BEvent::new(name, case, "p", UNIX_EPOCH + Duration::from_secs(secs))
    }

    #[test]
    fn test_merge_concatenates_in_order() {
        let handler = TraceUnitHandler;
        let older = ObservableUnit::Trace {
            events: vec![ev("a", "t1", 1), ev("b", "t1", 2)],
        };
        let newer = handler.convert(ev("c", "t1", 3));

        let merged = handler.merge(vec![older, newer]);
        assert_eq!(merged.len(), 1);

        let events = handler.convert_back(merged);
        let names: Vec<&str> = events.iter().map(|e| e.event_name()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_merge_requires_exactly_two_units() {
        let handler = TraceUnitHandler;
        assert!(handler.merge(vec![handler.convert(ev("a", "t1", 1))]).is_empty());
    }
}
