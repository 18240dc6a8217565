//! Stage and workstation-pool API handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use nextqueue_core::{
    announce_detached, render_announcement, CalledTicketInfo, Outcome, ServiceStage, StageId,
    TicketId, Workstation, WorkstationId,
};

use super::error::{not_found, rejection_response, ApiResult};
use crate::state::AppState;

/// Request body for creating a stage
#[derive(Debug, Deserialize)]
pub struct AddStageBody {
    pub name: String,
    /// Label prefix for the stage's workstations; blank uses the configured default
    #[serde(default)]
    pub workstation_type_name: String,
}

#[derive(Debug, Serialize)]
pub struct RemoveStageResponse {
    /// Tickets returned to the lobby
    pub salvaged: usize,
}

#[derive(Debug, Serialize)]
pub struct DecrementResponse {
    /// Ticket the removed workstation was serving, now back in the stage's waiting list
    pub returned_ticket: Option<TicketId>,
}

/// Create an empty stage at the end of the sequence
pub async fn add_stage(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AddStageBody>,
) -> ApiResult<(StatusCode, Json<ServiceStage>)> {
    let stage = state
        .engine()
        .with(|engine| -> Outcome<Option<ServiceStage>> {
            let id = engine.add_stage(&body.name, &body.workstation_type_name)?;
            Ok(engine.stage(id).cloned())
        })
        .map_err(rejection_response)?
        .ok_or_else(|| not_found("Stage vanished after creation", "unknown_stage"))?;

    info!(stage = %stage.name, id = %stage.id, "Stage added");

    Ok((StatusCode::CREATED, Json(stage)))
}

/// Remove a stage, returning its tickets to the lobby
pub async fn remove_stage(
    State(state): State<Arc<AppState>>,
    Path(stage_id): Path<StageId>,
) -> ApiResult<Json<RemoveStageResponse>> {
    let salvaged = state
        .engine()
        .with(|engine| engine.remove_stage(stage_id))
        .map_err(rejection_response)?;

    info!(stage = %stage_id, salvaged, "Stage removed");

    Ok(Json(RemoveStageResponse { salvaged }))
}

/// Add one workstation to a stage
pub async fn increment_workstation(
    State(state): State<Arc<AppState>>,
    Path(stage_id): Path<StageId>,
) -> ApiResult<(StatusCode, Json<Workstation>)> {
    let workstation = state
        .engine()
        .with(|engine| -> Outcome<Option<Workstation>> {
            let id = engine.increment_workstation(stage_id)?;
            Ok(engine
                .stage(stage_id)
                .and_then(|s| s.workstation(id))
                .cloned())
        })
        .map_err(rejection_response)?
        .ok_or_else(|| not_found("Workstation vanished after creation", "unknown_workstation"))?;

    Ok((StatusCode::CREATED, Json(workstation)))
}

/// Remove the highest-numbered workstation of a stage
pub async fn decrement_workstation(
    State(state): State<Arc<AppState>>,
    Path(stage_id): Path<StageId>,
) -> ApiResult<Json<DecrementResponse>> {
    let returned_ticket = state
        .engine()
        .with(|engine| engine.decrement_workstation(stage_id))
        .map_err(rejection_response)?;

    Ok(Json(DecrementResponse { returned_ticket }))
}

/// Call the next ticket of a stage to one of its workstations.
///
/// A successful call is pushed to display clients and announced in the
/// background; announcement failures never fail the call.
pub async fn call_next(
    State(state): State<Arc<AppState>>,
    Path((stage_id, workstation_id)): Path<(StageId, WorkstationId)>,
) -> ApiResult<Json<CalledTicketInfo>> {
    let call = state
        .engine()
        .with(|engine| engine.call_next_in_stage(stage_id, workstation_id))
        .map_err(rejection_response)?;

    info!(
        ticket = %call.ticket_number,
        workstation = %call.workstation_name,
        "Ticket called"
    );

    state.ws_broadcaster().ticket_called(&call);

    let announcer_config = &state.config().announcer;
    announce_detached(
        state.announcer(),
        render_announcement(&announcer_config.template, &call),
        announcer_config.locale.clone(),
    );

    Ok(Json(call))
}
