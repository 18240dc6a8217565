//! Prometheus metrics for observability.
//!
//! HTTP and WebSocket metrics live here; queue counters come from
//! `nextqueue_core::metrics` and queue depth gauges are refreshed on scrape.

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, IntGaugeVec,
    Opts, Registry, TextEncoder,
};
use tracing::error;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "nextqueue_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("nextqueue_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "nextqueue_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// WebSocket Metrics
// =============================================================================

pub static WS_CONNECTIONS_ACTIVE: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "nextqueue_ws_connections_active",
        "Number of active WebSocket connections",
    )
    .unwrap()
});

pub static WS_CONNECTIONS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "nextqueue_ws_connections_total",
        "Total WebSocket connections since startup",
    )
    .unwrap()
});

pub static WS_MESSAGES_SENT: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("nextqueue_ws_messages_sent_total", "WebSocket messages sent"),
        &["type"],
    )
    .unwrap()
});

pub static WS_LAG_EVENTS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "nextqueue_ws_lag_events_total",
        "WebSocket lag events (client fell behind)",
    )
    .unwrap()
});

// =============================================================================
// Queue Metrics (collected dynamically)
// =============================================================================

/// Tickets by location kind: lobby, waiting, serving.
pub static QUEUE_DEPTH: Lazy<IntGaugeVec> = Lazy::new(|| {
    IntGaugeVec::new(
        Opts::new("nextqueue_queue_depth", "Current ticket count by location"),
        &["location"],
    )
    .unwrap()
});

pub static STAGES: Lazy<IntGauge> =
    Lazy::new(|| IntGauge::new("nextqueue_stages", "Number of service stages").unwrap());

pub static WORKSTATIONS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("nextqueue_workstations", "Number of workstations across all stages").unwrap()
});

pub static STATE_VERSION: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "nextqueue_state_version",
        "Number of state changes since startup",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // WebSocket
    registry
        .register(Box::new(WS_CONNECTIONS_ACTIVE.clone()))
        .unwrap();
    registry
        .register(Box::new(WS_CONNECTIONS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(WS_MESSAGES_SENT.clone()))
        .unwrap();
    registry.register(Box::new(WS_LAG_EVENTS.clone())).unwrap();

    // Queue
    registry.register(Box::new(QUEUE_DEPTH.clone())).unwrap();
    registry.register(Box::new(STAGES.clone())).unwrap();
    registry.register(Box::new(WORKSTATIONS.clone())).unwrap();
    registry.register(Box::new(STATE_VERSION.clone())).unwrap();

    // Core counters (tickets issued, called, finished, rejections)
    for metric in nextqueue_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!("Failed to encode metrics: {}", e);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Refresh gauges from the current engine state before a scrape.
pub fn collect_dynamic_metrics(state: &crate::state::AppState) {
    let (depths, stages, workstations, version) = state.engine().read(|engine| {
        (
            engine.queue_depths(),
            engine.stages().len(),
            engine
                .stages()
                .iter()
                .map(|s| s.workstations.len())
                .sum::<usize>(),
            engine.version(),
        )
    });

    QUEUE_DEPTH
        .with_label_values(&["lobby"])
        .set(depths.lobby as i64);
    QUEUE_DEPTH
        .with_label_values(&["waiting"])
        .set(depths.waiting as i64);
    QUEUE_DEPTH
        .with_label_values(&["serving"])
        .set(depths.serving as i64);
    STAGES.set(stages as i64);
    WORKSTATIONS.set(workstations as i64);
    STATE_VERSION.set(version as i64);
}

/// Normalize a path for metric labels (replace IDs with placeholders).
pub fn normalize_path(path: &str) -> String {
    static UUID_REGEX: Lazy<regex_lite::Regex> = Lazy::new(|| {
        regex_lite::Regex::new(
            r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}",
        )
        .unwrap()
    });

    UUID_REGEX.replace_all(path, "{id}").into_owned()
}
