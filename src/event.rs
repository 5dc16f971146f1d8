// Event records for process-mining streams.
//
// A BEvent is the single record type flowing into the memory manager:
// an activity observed for one case of one process at a point in time.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// One record in an event stream.
///
/// Events are immutable values; rebinding a case id produces a new event
/// via [`BEvent::with_trace_name`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BEvent {
    /// Activity name
    event_name: String,

    /// Case (trace) identifier
    trace_name: String,

    /// Process the event belongs to
    process_name: String,

    /// When the activity was observed
    event_time: SystemTime,
}

impl BEvent {
    pub fn new(
        event_name: impl Into<String>,
        trace_name: impl Into<String>,
        process_name: impl Into<String>,
        event_time: SystemTime,
    ) -> Self {
        Self {
            event_name: event_name.into(),
            trace_name: trace_name.into(),
            process_name: process_name.into(),
            event_time,
        }
    }

    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    pub fn trace_name(&self) -> &str {
        &self.trace_name
    }

    pub fn process_name(&self) -> &str {
        &self.process_name
    }

    pub fn event_time(&self) -> SystemTime {
        self.event_time
    }

    /// Copy of this event bound to a different case.
    pub fn with_trace_name(&self, trace_name: impl Into<String>) -> Self {
        Self {
            event_name: self.event_name.clone(),
            trace_name: trace_name.into(),
            process_name: self.process_name.clone(),
            event_time: self.event_time,
        }
    }
}
