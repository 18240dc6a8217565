use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::middleware::metrics_middleware;
use super::{handlers, queue, stages, tickets, workstations, ws};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Queue views
        .route("/state", get(queue::get_state))
        .route("/history", get(queue::get_history))
        .route("/auto-forward", put(queue::set_auto_forward))
        .route("/auto-forward/toggle", post(queue::toggle_auto_forward))
        // Tickets
        .route("/tickets", post(tickets::create_ticket))
        .route("/tickets/{id}", get(tickets::locate_ticket))
        .route("/tickets/{id}/move", post(tickets::move_ticket))
        // Stages
        .route("/stages", post(stages::add_stage))
        .route("/stages/{id}", delete(stages::remove_stage))
        .route(
            "/stages/{id}/workstations",
            post(stages::increment_workstation).delete(stages::decrement_workstation),
        )
        .route(
            "/stages/{id}/workstations/{ws}/call",
            post(stages::call_next),
        )
        // Workstations
        .route("/workstations/{ws}/finish", post(workstations::finish_ticket))
        .route(
            "/workstations/{ws}/transfer",
            post(workstations::transfer_ticket),
        )
        .route("/workstations/{ws}/name", put(workstations::rename_workstation))
        // Real-time updates
        .route("/ws", get(ws::ws_handler));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
