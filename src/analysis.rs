// Summary-completeness projections.
//
// Helpers for comparing a retained summary against a reference log:
// project an event list into its traces, directly-follows relations,
// variants, and activities, and score the overlap with Jaccard
// similarity. Drift detectors and evaluation drivers build on these.

use crate::event::BEvent;
use std::collections::{BTreeMap, HashSet};
use std::hash::Hash;

/// Group events by case id, preserving per-case arrival order.
pub fn group_traces(events: &[BEvent]) -> BTreeMap<String, Vec<BEvent>> {
    let mut traces: BTreeMap<String, Vec<BEvent>> = BTreeMap::new();
    for event in events {
        traces
            .entry(event.trace_name().to_string())
            .or_default()
            .push(event.clone());
    }
    traces
}

/// Directly-follows relations observed across all traces.
pub fn extract_dfrs(traces: &BTreeMap<String, Vec<BEvent>>) -> HashSet<(String, String)> {
    let mut dfrs = HashSet::new();
    for trace in traces.values() {
        for pair in trace.windows(2) {
            dfrs.insert((
                pair[0].event_name().to_string(),
                pair[1].event_name().to_string(),
            ));
        }
    }
    dfrs
}

/// Distinct activity sequences across all traces.
pub fn extract_variants(traces: &BTreeMap<String, Vec<BEvent>>) -> HashSet<Vec<String>> {
    traces
        .values()
        .map(|trace| {
            trace
                .iter()
                .map(|event| event.event_name().to_string())
                .collect()
        })
        .collect()
}

/// Distinct activity names in an event list.
pub fn extract_activities(events: &[BEvent]) -> HashSet<String> {
    events
        .iter()
        .map(|event| event.event_name().to_string())
        .collect()
}

/// Jaccard similarity |A ∩ B| / |A ∪ B|; 1.0 when both sets are empty.
pub fn jaccard<T: Eq + Hash>(current: &HashSet<T>, base: &HashSet<T>) -> f64 {
    let union = base.union(current).count();
    if union == 0 {
        return 1.0;
    }
    let intersection = base.intersection(current).count();
    intersection as f64 / union as f64
}
