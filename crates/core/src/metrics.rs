//! Prometheus metrics for the queue engine.
//!
//! Counters are process-wide; the server registers them in its registry
//! through [`all_metrics`].

use once_cell::sync::Lazy;
use prometheus::{IntCounter, IntCounterVec, Opts};

/// Tickets generated by class.
pub static TICKETS_GENERATED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("nextqueue_tickets_generated_total", "Total tickets generated"),
        &["class"], // "common", "priority"
    )
    .unwrap()
});

/// Tickets called to a workstation.
pub static TICKETS_CALLED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "nextqueue_tickets_called_total",
        "Total tickets called to a workstation",
    )
    .unwrap()
});

/// Tickets finished (dropped from active tracking).
pub static TICKETS_FINISHED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "nextqueue_tickets_finished_total",
        "Total tickets finished at a workstation",
    )
    .unwrap()
});

/// Tickets moved back to the lobby by stage removal.
pub static TICKETS_SALVAGED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "nextqueue_tickets_salvaged_total",
        "Tickets returned to the lobby when their stage was removed",
    )
    .unwrap()
});

/// Rejected operations by reason.
pub static OPERATIONS_REJECTED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "nextqueue_operations_rejected_total",
            "Engine operations rejected without changing state",
        ),
        &["operation", "reason"],
    )
    .unwrap()
});

/// All core metrics, for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(TICKETS_GENERATED.clone()),
        Box::new(TICKETS_CALLED.clone()),
        Box::new(TICKETS_FINISHED.clone()),
        Box::new(TICKETS_SALVAGED.clone()),
        Box::new(OPERATIONS_REJECTED.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_metrics_register_cleanly() {
        let registry = prometheus::Registry::new();
        for metric in all_metrics() {
            registry.register(metric).unwrap();
        }
        TICKETS_GENERATED.with_label_values(&["common"]).inc();
        let families = registry.gather();
        assert!(families
            .iter()
            .any(|f| f.get_name() == "nextqueue_tickets_generated_total"));
    }
}
