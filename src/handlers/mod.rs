// Observable-unit handlers.
//
// A handler fixes the summary granularity: it lifts raw events into units
// of one kind, combines the retained units of a case with a newly arrived
// one, and projects units back to a flat event list for consumers.

mod dfr;
mod event;
mod trace;
mod variant;

pub use dfr::DfrUnitHandler;
pub use event::EventUnitHandler;
pub use trace::TraceUnitHandler;
pub use variant::VariantUnitHandler;

use crate::event::BEvent;
use crate::units::{ObservableUnit, UnitKind};

/// Conversion and merge behavior for one unit kind.
pub trait UnitHandler: Send {
    /// The unit kind this handler produces.
    fn kind(&self) -> UnitKind;

    /// Lift a raw event into a unit of this handler's kind.
    fn convert(&self, event: BEvent) -> ObservableUnit;

    /// Combine the retained mergeable units of a case with the newly
    /// converted unit, which the coordinator appends last. An empty
    /// result means nothing is re-inserted.
    fn merge(&self, units: Vec<ObservableUnit>) -> Vec<ObservableUnit>;

    /// Project units to a flat event list in insertion order.
    fn convert_back(&self, units: Vec<ObservableUnit>) -> Vec<BEvent>;

    fn clone_handler(&self) -> Box<dyn UnitHandler>;
}

/// Create the handler for a unit kind.
pub fn create_unit_handler(kind: UnitKind) -> Box<dyn UnitHandler> {
    match kind {
        UnitKind::Event => Box::new(EventUnitHandler),
        UnitKind::Dfr => Box::new(DfrUnitHandler),
        UnitKind::Trace => Box::new(TraceUnitHandler),
        UnitKind::Variant => Box::new(VariantUnitHandler),
    }
}
