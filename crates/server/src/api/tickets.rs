//! Ticket API handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use nextqueue_core::{StageId, Ticket, TicketId, TicketLocation};

use super::error::{not_found, rejection_response, ApiResult};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for issuing a ticket
#[derive(Debug, Deserialize)]
pub struct CreateTicketBody {
    /// Priority tickets are served before common ones
    #[serde(default)]
    pub is_priority: bool,
}

/// Request body for moving a ticket between the lobby and stages.
///
/// `None` on either side means the lobby.
#[derive(Debug, Deserialize)]
pub struct MoveTicketBody {
    #[serde(default)]
    pub from_stage: Option<StageId>,
    #[serde(default)]
    pub to_stage: Option<StageId>,
}

#[derive(Debug, Serialize)]
pub struct TicketResponse {
    #[serde(flatten)]
    pub ticket: Ticket,
    pub location: TicketLocation,
}

#[derive(Debug, Serialize)]
pub struct LocateTicketResponse {
    pub id: TicketId,
    pub location: TicketLocation,
}

// ============================================================================
// Handlers
// ============================================================================

/// Issue a new ticket
pub async fn create_ticket(
    State(state): State<Arc<AppState>>,
    body: Option<Json<CreateTicketBody>>,
) -> ApiResult<(StatusCode, Json<TicketResponse>)> {
    let is_priority = body.map(|Json(b)| b.is_priority).unwrap_or(false);

    let response = state.engine().with(|engine| {
        let ticket = engine.generate_ticket(is_priority);
        let location = engine
            .locate_ticket(ticket.id)
            .unwrap_or(TicketLocation::Lobby);
        TicketResponse { ticket, location }
    });

    info!(
        ticket = %response.ticket.number,
        location = ?response.location,
        "Ticket issued"
    );

    Ok((StatusCode::CREATED, Json(response)))
}

/// Report where a ticket currently is
pub async fn locate_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TicketId>,
) -> ApiResult<Json<LocateTicketResponse>> {
    state
        .engine()
        .read(|engine| engine.locate_ticket(id))
        .map(|location| Json(LocateTicketResponse { id, location }))
        .ok_or_else(|| not_found(format!("Ticket not found: {}", id), "ticket_not_found"))
}

/// Move a ticket between the lobby and stage waiting lists
pub async fn move_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TicketId>,
    Json(body): Json<MoveTicketBody>,
) -> ApiResult<StatusCode> {
    state
        .engine()
        .with(|engine| engine.move_ticket(id, body.from_stage, body.to_stage))
        .map_err(rejection_response)?;

    Ok(StatusCode::NO_CONTENT)
}
