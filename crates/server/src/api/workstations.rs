//! Workstation API handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use nextqueue_core::{StageId, Ticket, TicketId, WorkstationId};

use super::error::{rejection_response, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TransferBody {
    pub ticket_id: TicketId,
    pub to_stage: StageId,
}

#[derive(Debug, Deserialize)]
pub struct RenameBody {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct FinishResponse {
    /// The ticket that was being served, if any
    pub finished: Option<Ticket>,
}

/// Finish the ticket a workstation is serving
pub async fn finish_ticket(
    State(state): State<Arc<AppState>>,
    Path(workstation_id): Path<WorkstationId>,
) -> ApiResult<Json<FinishResponse>> {
    let finished = state
        .engine()
        .with(|engine| engine.finish_ticket(workstation_id))
        .map_err(rejection_response)?;

    if let Some(ticket) = &finished {
        info!(ticket = %ticket.number, workstation = %workstation_id, "Ticket finished");
    }

    Ok(Json(FinishResponse { finished }))
}

/// Send the ticket at a workstation to another stage's waiting list
pub async fn transfer_ticket(
    State(state): State<Arc<AppState>>,
    Path(workstation_id): Path<WorkstationId>,
    Json(body): Json<TransferBody>,
) -> ApiResult<StatusCode> {
    state
        .engine()
        .with(|engine| {
            engine.move_ticket_from_workstation(workstation_id, body.ticket_id, body.to_stage)
        })
        .map_err(rejection_response)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Rename a workstation
pub async fn rename_workstation(
    State(state): State<Arc<AppState>>,
    Path(workstation_id): Path<WorkstationId>,
    Json(body): Json<RenameBody>,
) -> ApiResult<StatusCode> {
    state
        .engine()
        .with(|engine| engine.rename_workstation(workstation_id, &body.name))
        .map_err(rejection_response)?;

    Ok(StatusCode::NO_CONTENT)
}
