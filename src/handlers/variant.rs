// Variant handler: a case summarized as its activity sequence.
//
// Structurally a trace, but unit identity collapses across cases with the
// same activity names, so map-backed policies count one entry per shape.

use super::UnitHandler;
use crate::event::BEvent;
use crate::units::{ObservableUnit, UnitKind};

/// Handler for variant units.
#[derive(Debug, Clone, Copy, Default)]
pub struct VariantUnitHandler;

impl UnitHandler for VariantUnitHandler {
    fn kind(&self) -> UnitKind {
        UnitKind::Variant
    }

    fn convert(&self, event: BEvent) -> ObservableUnit {
        ObservableUnit::Variant {
            events: vec![event],
        }
    }

    /// Defined only for exactly two units: appends the newer unit's events
    /// to the retained variant.
    fn merge(&self, mut units: Vec<ObservableUnit>) -> Vec<ObservableUnit> {
        if units.len() != 2 {
            return Vec::new();
        }
        let (Some(newer), Some(older)) = (units.pop(), units.pop()) else {
            return Vec::new();
        };

        match (older, newer) {
            (ObservableUnit::Variant { mut events }, ObservableUnit::Variant { events: tail }) => {
                events.extend(tail);
                vec![ObservableUnit::Variant { events }]
            }
            _ => Vec::new(),
        }
    }

    fn convert_back(&self, units: Vec<ObservableUnit>) -> Vec<BEvent> {
        let mut ret = Vec::new();
        for unit in units {
            if let ObservableUnit::Variant { events } = unit {
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
    fn test_merge_extends_activity_sequence() {
        let handler = VariantUnitHandler;
        let older = handler.convert(ev("a", "t1", 1));
        let newer = handler.convert(ev("b", "t1", 2));

        let merged = handler.merge(vec![older, newer]);
        assert_eq!(merged.len(), 1);

        let expected = ObservableUnit::Variant {
            events: vec![ev("a", "t9", 4), ev("b", "t9", 5)],
        };
        assert_eq!(merged[0], expected);
    }

    #[test]
    fn test_same_shape_different_cases_collapse() {
        let handler = VariantUnitHandler;
        let merged_t1 = handler.merge(vec![
            handler.convert(ev("a", "t1", 1)),
            handler.convert(ev("b", "t1", 2)),
        ]);
        let merged_t2 = handler.merge(vec![
            handler.convert(ev("a", "t2", 3)),
            handler.convert(ev("b", "t2", 4)),
        ]);

        assert_eq!(merged_t1[0], merged_t2[0]);
    }
}
