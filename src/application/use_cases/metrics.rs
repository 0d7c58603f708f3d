use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Fire-and-forget counter port. The ingestion core only ever depends on
/// this trait, never on a concrete sink.
pub trait MetricsSink: Send + Sync {
    fn increment(&self, name: &str);
}

pub type SharedMetrics = Arc<dyn MetricsSink>;

/// In-process counter map used by the service and by tests.
pub struct CounterMetrics {
    counters: Mutex<HashMap<String, u64>>,
}

impl CounterMetrics {
    pub fn new() -> Self {
        Self {
            counters: Mutex::new(HashMap::new()),
        }
    }

    pub fn value(&self, name: &str) -> u64 {
        self.counters
            .lock()
            .map(|counters| counters.get(name).copied().unwrap_or(0))
            .unwrap_or(0)
    }
}

impl Default for CounterMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsSink for CounterMetrics {
    fn increment(&self, name: &str) {
        if let Ok(mut counters) = self.counters.lock() {
            *counters.entry(name.to_string()).or_insert(0) += 1;
        }
    }
}

pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {
    fn increment(&self, _name: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_metrics_increments() {
        let metrics = CounterMetrics::new();
        assert_eq!(metrics.value("ingest.accepted"), 0);
        metrics.increment("ingest.accepted");
        metrics.increment("ingest.accepted");
        assert_eq!(metrics.value("ingest.accepted"), 2);
        assert_eq!(metrics.value("ingest.duplicate"), 0);
    }
}
