//! Whole-queue views and switches.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use nextqueue_core::{CalledTicketInfo, EngineSnapshot};

use super::error::{rejection_response, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct AutoForwardBody {
    pub enabled: bool,
}

/// Full queue state (stages, lobby, history and version)
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<EngineSnapshot> {
    Json(state.engine().read(|engine| engine.snapshot()))
}

/// Recent calls, newest first
pub async fn get_history(State(state): State<Arc<AppState>>) -> Json<Vec<CalledTicketInfo>> {
    Json(state.engine().read(|engine| engine.history().to_vec()))
}

/// Flip auto-forward and report the new value
pub async fn toggle_auto_forward(State(state): State<Arc<AppState>>) -> Json<AutoForwardBody> {
    let enabled = state.engine().with(|engine| engine.toggle_auto_forward());
    info!(enabled, "Auto-forward toggled");
    Json(AutoForwardBody { enabled })
}

/// Set auto-forward explicitly; setting the current value is a conflict
pub async fn set_auto_forward(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AutoForwardBody>,
) -> ApiResult<Json<AutoForwardBody>> {
    state
        .engine()
        .with(|engine| engine.set_auto_forward(body.enabled))
        .map_err(rejection_response)?;

    info!(enabled = body.enabled, "Auto-forward set");
    Ok(Json(body))
}
