// Observable units: the granularities at which the memory manager
// summarizes a stream.
//
// Identity (equality and hashing) is variant-specific:
//
// - **Event**: all four event fields.
// - **Dfr**: the pair of activity names; a DFR is the same relation no
//   matter which case produced it.
// - **Trace**: the case id alone.
// - **Variant**: the ordered activity names.
//
// Cross-variant comparisons are never equal.

use crate::event::BEvent;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::mem::discriminant;

/// Case id carried by empty trace and variant units.
pub const EMPTY_CASE_ID: &str = "none";

/// The granularity a handler lifts events into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    Event,
    Dfr,
    Trace,
    Variant,
}

/// One summarized piece of stream state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ObservableUnit {
    /// A single event.
    Event { event: BEvent },

    /// A directly-follows relation; sides fill in arrival order and the
    /// unit stays open (mergeable) until both are present.
    Dfr {
        first: Option<BEvent>,
        second: Option<BEvent>,
    },

    /// All events of one case, in arrival order.
    Trace { events: Vec<BEvent> },

    /// The activity sequence characterizing a case.
    Variant { events: Vec<BEvent> },
}

impl ObservableUnit {
    pub fn kind(&self) -> UnitKind {
        match self {
            ObservableUnit::Event { .. } => UnitKind::Event,
            ObservableUnit::Dfr { .. } => UnitKind::Dfr,
            ObservableUnit::Trace { .. } => UnitKind::Trace,
            ObservableUnit::Variant { .. } => UnitKind::Variant,
        }
    }

    /// Case this unit stands in for.
    ///
    /// `None` only for a DFR with both sides absent, which handlers never
    /// produce. Empty trace and variant units report [`EMPTY_CASE_ID`].
    pub fn case_id(&self) -> Option<&str> {
        match self {
            ObservableUnit::Event { event } => Some(event.trace_name()),
            ObservableUnit::Dfr { first, second } => first
                .as_ref()
                .or(second.as_ref())
                .map(|event| event.trace_name()),
            ObservableUnit::Trace { events } | ObservableUnit::Variant { events } => Some(
                events
                    .first()
                    .map(|event| event.trace_name())
                    .unwrap_or(EMPTY_CASE_ID),
            ),
        }
    }

    /// Whether this unit can still absorb events of its case.
    pub fn is_mergeable(&self) -> bool {
        match self {
            ObservableUnit::Event { .. } => false,
            ObservableUnit::Dfr { first, second } => first.is_none() || second.is_none(),
            ObservableUnit::Trace { .. } | ObservableUnit::Variant { .. } => true,
        }
    }

    /// Rebind every contained event to the given case.
    pub fn set_case_id(&mut self, case_id: &str) {
        match self {
            ObservableUnit::Event { event } => {
                *event = event.with_trace_name(case_id);
            }
            ObservableUnit::Dfr { first, second } => {
                if let Some(event) = first {
                    *event = event.with_trace_name(case_id);
                }
                if let Some(event) = second {
                    *event = event.with_trace_name(case_id);
                }
            }
            ObservableUnit::Trace { events } | ObservableUnit::Variant { events } => {
                for event in events.iter_mut() {
                    *event = event.with_trace_name(case_id);
                }
            }
        }
    }
}

fn event_names_equal(a: &Option<BEvent>, b: &Option<BEvent>) -> bool {
    a.as_ref().map(|e| e.event_name()) == b.as_ref().map(|e| e.event_name())
}

impl PartialEq for ObservableUnit {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ObservableUnit::Event { event: a }, ObservableUnit::Event { event: b }) => a == b,
            (
                ObservableUnit::Dfr {
                    first: f1,
                    second: s1,
                },
                ObservableUnit::Dfr {
                    first: f2,
                    second: s2,
                },
            ) => event_names_equal(f1, f2) && event_names_equal(s1, s2),
            (ObservableUnit::Trace { .. }, ObservableUnit::Trace { .. }) => {
                self.case_id() == other.case_id()
            }
            (ObservableUnit::Variant { events: a }, ObservableUnit::Variant { events: b }) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|(x, y)| x.event_name() == y.event_name())
            }
            _ => false,
        }
    }
}

impl Eq for ObservableUnit {}

impl Hash for ObservableUnit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        discriminant(self).hash(state);
        match self {
            ObservableUnit::Event { event } => {
                event.hash(state);
            }
            ObservableUnit::Dfr { first, second } => {
                first.as_ref().map(|e| e.event_name()).hash(state);
                second.as_ref().map(|e| e.event_name()).hash(state);
            }
            ObservableUnit::Trace { .. } => {
                self.case_id().hash(state);
            }
            ObservableUnit::Variant { events } => {
                events.len().hash(state);
                for event in events {
                    event.event_name().hash(state);
                }
            }
        }
    }
}
