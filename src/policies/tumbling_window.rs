// Tumbling window retention: disjoint windows, cleared at the boundary.

use super::RetentionPolicy;
use crate::error::{MemoryError, Result};
use crate::units::ObservableUnit;

/// Keeps up to `window_size` units, then starts an empty window with the
/// unit that crossed the boundary. Windows never overlap.
#[derive(Debug, Clone)]
pub struct TumblingWindowPolicy {
    window_size: usize,
    data: Vec<ObservableUnit>,
}

impl TumblingWindowPolicy {
    pub fn new(window_size: usize) -> Result<Self> {
        if window_size == 0 {
            return Err(MemoryError::Configuration(
                "window_size must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            window_size,
            data: Vec::with_capacity(window_size),
        })
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }
}

impl RetentionPolicy for TumblingWindowPolicy {
    fn update(&mut self, unit: ObservableUnit) {
        if self.data.len() >= self.window_size {
            tracing::debug!("Tumbling window boundary reached, dropping {} units", self.data.len());
            self.data.clear();
        }
        self.data.push(unit);
    }

    fn get_data(&self) -> Vec<ObservableUnit> {
        self.data.clone()
    }

    fn remove_elements(&mut self, units: &[ObservableUnit]) {
        self.data
            .retain(|u| !units.iter().any(|rem| u == rem && u.case_id() == rem.case_id()));
    }

    fn get_mergeable_elements(&self, case_id: &str) -> Vec<ObservableUnit> {
        self.data
            .iter()
            .filter(|u| u.is_mergeable() && u.case_id() == Some(case_id))
            .cloned()
            .collect()
    }

    fn distinct_keys(&self) -> usize {
        self.data.len()
    }

    fn name(&self) -> &'static str {
        "TUMBLING"
    }

    fn clone_policy(&self) -> Box<dyn RetentionPolicy> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::BEvent;
    use std::time::{Duration, UNIX_EPOCH};

    fn event_unit(name: &str, case: &str, secs: u64) -> ObservableUnit {
        ObservableUnit::Event {
            event: BEvent::new(name, case, "p", UNIX_EPOCH + Duration::from_secs(secs)),
        }
    }

    #[test]
    fn test_rejects_zero_window() {
        assert!(TumblingWindowPolicy::new(0).is_err());
    }

    #[test]
    fn test_boundary_clears_window() {
        let mut policy = TumblingWindowPolicy::new(3).unwrap();
        for (i, name) in ["a", "b", "c"].iter().enumerate() {
            policy.update(event_unit(name, "t1", i as u64 + 1));
        }
        assert_eq!(policy.get_data().len(), 3);

        // The fourth update opens a fresh window.
        policy.update(event_unit("d", "t1", 4));
        let data = policy.get_data();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0], event_unit("d", "t1", 4));
    }

    #[test]
    fn test_windows_are_disjoint() {
        let mut policy = TumblingWindowPolicy::new(2).unwrap();
        for (i, name) in ["a", "b", "c", "d", "e"].iter().enumerate() {
            policy.update(event_unit(name, "t1", i as u64 + 1));
        }

        // Two boundaries crossed; only the fifth unit remains.
        let data = policy.get_data();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0], event_unit("e", "t1", 5));
    }
}
