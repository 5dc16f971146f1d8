// Directly-follows-relation handler.
//
// Each case keeps one open pair awaiting its successor. Merging closes
// the pair with the incoming activity and leaves a fresh open pair behind,
// so consecutive events of a case chain into overlapping relations.

use super::UnitHandler;
use crate::event::BEvent;
use crate::units::{ObservableUnit, UnitKind};

/// Handler for directly-follows-relation units.
#[derive(Debug, Clone, Copy, Default)]
pub struct DfrUnitHandler;

impl UnitHandler for DfrUnitHandler {
    fn kind(&self) -> UnitKind {
        UnitKind::Dfr
    }

    fn convert(&self, event: BEvent) -> ObservableUnit {
        ObservableUnit::Dfr {
            first: Some(event),
            second: None,
        }
    }

    /// Defined only for exactly two units: the case's open pair and the
    /// newly converted one. The closed pair becomes immutable; the right
    /// unit stays open for the next event.
    fn merge(&self, mut units: Vec<ObservableUnit>) -> Vec<ObservableUnit> {
        if units.len() != 2 {
            return Vec::new();
        }
        let (Some(newer), Some(older)) = (units.pop(), units.pop()) else {
            return Vec::new();
        };

        match (older, newer) {
            (
                ObservableUnit::Dfr { first: left, .. },
                ObservableUnit::Dfr {
                    first: right,
                    second: tail,
                },
            ) => {
                let closed = ObservableUnit::Dfr {
                    first: left,
                    second: right.clone(),
                };
                let open = ObservableUnit::Dfr {
                    first: right,
                    second: tail,
                };
                vec![closed, open]
            }
            _ => Vec::new(),
        }
    }

    /// Flattens `first` then `second` of each unit, emitting each event at
    /// most once: the closing side of one relation is the opening side of
    /// the next.
    fn convert_back(&self, units: Vec<ObservableUnit>) -> Vec<BEvent> {
        let mut ret: Vec<BEvent> = Vec::new();
        for unit in units {
            if let ObservableUnit::Dfr { first, second } = unit {
                for event in [first, second].into_iter().flatten() {
                    if !ret.contains(&event) {
                        ret.push(event);
                    }
                }
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
    fn test_convert_opens_pair() {
        let handler = DfrUnitHandler;
        let unit = handler.convert(ev("a", "t1", 1));

        assert!(unit.is_mergeable());
        assert_eq!(unit.case_id(), Some("t1"));
    }

    #[test]
    fn test_merge_closes_pair_and_keeps_open_tail() {
        let handler = DfrUnitHandler;
        let open = handler.convert(ev("a", "t1", 1));
        let incoming = handler.convert(ev("b", "t1", 2));

        let merged = handler.merge(vec![open, incoming]);
        assert_eq!(merged.len(), 2);

        assert!(!merged[0].is_mergeable());
        assert!(merged[1].is_mergeable());

        if let ObservableUnit::Dfr { first, second } = &merged[0] {
            assert_eq!(first.as_ref().map(|e| e.event_name()), Some("a"));
            assert_eq!(second.as_ref().map(|e| e.event_name()), Some("b"));
        } else {
            panic!("closed pair changed variant");
        }
        if let ObservableUnit::Dfr { first, second } = &merged[1] {
            assert_eq!(first.as_ref().map(|e| e.event_name()), Some("b"));
            assert!(second.is_none());
        } else {
            panic!("open tail changed variant");
        }
    }

    #[test]
    fn test_merge_requires_exactly_two_units() {
        let handler = DfrUnitHandler;
        assert!(handler.merge(vec![handler.convert(ev("a", "t1", 1))]).is_empty());
        assert!(handler
            .merge(vec![
                handler.convert(ev("a", "t1", 1)),
                handler.convert(ev("b", "t1", 2)),
                handler.convert(ev("c", "t1", 3)),
            ])
            .is_empty());
    }

    #[test]
    fn test_convert_back_deduplicates_shared_events() {
        let handler = DfrUnitHandler;
        let a = ev("a", "t1", 1);
        let b = ev("b", "t1", 2);
        let c = ev("c", "t1", 3);

        let units = vec![
            ObservableUnit::Dfr {
                first: Some(a.clone()),
                second: Some(b.clone()),
            },
            ObservableUnit::Dfr {
                first: Some(b.clone()),
                second: Some(c.clone()),
            },
            ObservableUnit::Dfr {
                first: Some(c.clone()),
                second: None,
            },
        ];

        let events = handler.convert_back(units);
        assert_eq!(events, vec![a, b, c]);
    }
}
