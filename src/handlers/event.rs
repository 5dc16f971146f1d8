// Single-event handler: the summary is the retained events themselves.

use super::UnitHandler;
use crate::event::BEvent;
use crate::units::{ObservableUnit, UnitKind};

/// Handler for single-event units. Events never merge; the retention
/// policy alone decides what survives.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventUnitHandler;

impl UnitHandler for EventUnitHandler {
    fn kind(&self) -> UnitKind {
        UnitKind::Event
    }

    fn convert(&self, event: BEvent) -> ObservableUnit {
        ObservableUnit::Event { event }
    }

    fn merge(&self, _units: Vec<ObservableUnit>) -> Vec<ObservableUnit> {
        Vec::new()
    }

    fn convert_back(&self, units: Vec<ObservableUnit>) -> Vec<BEvent> {
        units
            .into_iter()
            .filter_map(|unit| match unit {
                ObservableUnit::Event { event } => Some(event),
                _ => None,
            })
            .collect()
    }

    fn clone_handler(&self) -> Box<dyn UnitHandler> {
        Box::new(*self)
    }
}
