//! Outcome type for engine operations.

use thiserror::Error;

use super::types::{StageId, TicketId, WorkstationId};

/// Why an engine operation left the state untouched.
///
/// A rejected operation never mutates state and never notifies subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Stage not found: {0}")]
    UnknownStage(StageId),

    #[error("Workstation not found: {0}")]
    UnknownWorkstation(WorkstationId),

    #[error("Workstation {0} is already serving a ticket")]
    WorkstationOccupied(WorkstationId),

    #[error("No tickets waiting in stage {0}")]
    NoWaitingTickets(StageId),

    #[error("Stage name cannot be empty")]
    EmptyStageName,

    #[error("Workstation name cannot be empty")]
    EmptyWorkstationName,

    #[error("Stage {0} has no workstations")]
    NoWorkstations(StageId),

    #[error("Ticket {0} is not at the given location")]
    TicketNotFound(TicketId),

    #[error("Workstation {workstation_id} is not serving ticket {ticket_id}")]
    TicketNotAtWorkstation {
        workstation_id: WorkstationId,
        ticket_id: TicketId,
    },

    #[error("Nothing to change")]
    Unchanged,
}

impl Rejection {
    /// Stable snake_case tag for logs, metrics and API bodies.
    pub fn reason(&self) -> &'static str {
        match self {
            Rejection::UnknownStage(_) => "unknown_stage",
            Rejection::UnknownWorkstation(_) => "unknown_workstation",
            Rejection::WorkstationOccupied(_) => "workstation_occupied",
            Rejection::NoWaitingTickets(_) => "no_waiting_tickets",
            Rejection::EmptyStageName => "empty_stage_name",
            Rejection::EmptyWorkstationName => "empty_workstation_name",
            Rejection::NoWorkstations(_) => "no_workstations",
            Rejection::TicketNotFound(_) => "ticket_not_found",
            Rejection::TicketNotAtWorkstation { .. } => "ticket_not_at_workstation",
            Rejection::Unchanged => "unchanged",
        }
    }

    /// True when the call referenced something the engine does not know.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Rejection::UnknownStage(_)
                | Rejection::UnknownWorkstation(_)
                | Rejection::TicketNotFound(_)
        )
    }

    /// True when the call was well-formed but there was nothing to do.
    pub fn is_nothing_to_do(&self) -> bool {
        matches!(
            self,
            Rejection::NoWaitingTickets(_) | Rejection::NoWorkstations(_) | Rejection::Unchanged
        )
    }
}

/// Result of an engine operation.
pub type Outcome<T> = Result<T, Rejection>;
