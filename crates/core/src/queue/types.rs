//! Core queue data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random id.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

entity_id!(
    /// Unique identity of a ticket.
    TicketId
);
entity_id!(
    /// Unique identity of a workstation.
    WorkstationId
);
entity_id!(
    /// Unique identity of a service stage.
    StageId
);

// ============================================================================
// Tickets
// ============================================================================

/// Ticket class, which selects the number prefix and the counter used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketClass {
    Common,
    Priority,
}

impl TicketClass {
    pub fn from_priority(is_priority: bool) -> Self {
        if is_priority {
            Self::Priority
        } else {
            Self::Common
        }
    }

    /// Prefix printed in front of the sequence number.
    pub fn prefix(&self) -> char {
        match self {
            TicketClass::Common => 'C',
            TicketClass::Priority => 'P',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketClass::Common => "common",
            TicketClass::Priority => "priority",
        }
    }

    /// Format a sequence number for this class.
    ///
    /// Numbers are zero-padded to three digits and grow in width past 999
    /// (`C999` is followed by `C1000`).
    pub fn format_number(&self, sequence: u64) -> String {
        format!("{}{:03}", self.prefix(), sequence)
    }
}

/// A ticket handed out by the dispenser.
///
/// Tickets are immutable once generated; only their location in the queue
/// changes over their lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    /// Human-facing number, e.g. `P001`.
    pub number: String,
    pub is_priority: bool,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Stages and workstations
// ============================================================================

/// A single service point. Holds at most one ticket at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workstation {
    pub id: WorkstationId,
    /// Display name. Starts as the sequence number but may be renamed.
    pub name: String,
    /// Sequence number within the stage, independent of the display name.
    pub number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_ticket: Option<Ticket>,
}

impl Workstation {
    pub(crate) fn numbered(number: u32) -> Self {
        Self {
            id: WorkstationId::new(),
            name: number.to_string(),
            number,
            current_ticket: None,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.current_ticket.is_some()
    }
}

/// A sequential phase of service with its own workstations and waiting list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStage {
    pub id: StageId,
    pub name: String,
    /// Label used when announcing workstations, e.g. "Guichê" or "Room".
    pub workstation_type_name: String,
    pub workstations: Vec<Workstation>,
    pub waiting_tickets: Vec<Ticket>,
}

impl ServiceStage {
    pub(crate) fn new(name: String, workstation_type_name: String) -> Self {
        Self {
            id: StageId::new(),
            name,
            workstation_type_name,
            workstations: Vec::new(),
            waiting_tickets: Vec::new(),
        }
    }

    pub fn workstation(&self, id: WorkstationId) -> Option<&Workstation> {
        self.workstations.iter().find(|w| w.id == id)
    }

    /// Composed label such as "Guichê 2".
    pub fn workstation_label(&self, workstation: &Workstation) -> String {
        format!("{} {}", self.workstation_type_name, workstation.name)
    }

    /// Number to give the next workstation added to this stage.
    pub(crate) fn next_workstation_number(&self) -> u32 {
        self.workstations
            .iter()
            .map(|w| w.number)
            .max()
            .unwrap_or(0)
            + 1
    }

    /// Index of the waiting ticket that should be called next.
    ///
    /// Priority tickets come first; within a class the earliest `created_at`
    /// wins, and equal timestamps keep list order.
    pub(crate) fn next_waiting_index(&self) -> Option<usize> {
        self.waiting_tickets
            .iter()
            .enumerate()
            .min_by_key(|(_, t)| (!t.is_priority, t.created_at))
            .map(|(index, _)| index)
    }

    pub fn occupied_workstations(&self) -> usize {
        self.workstations.iter().filter(|w| w.is_occupied()).count()
    }
}

// ============================================================================
// History and read models
// ============================================================================

/// Snapshot of a single call event, kept in the capped history log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalledTicketInfo {
    pub ticket_number: String,
    pub stage_name: String,
    /// Composed label, e.g. "Guichê 1".
    pub workstation_name: String,
    pub called_at: DateTime<Utc>,
}

/// Where a ticket currently lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TicketLocation {
    /// Engine-level waiting queue, not yet assigned to a stage.
    Lobby,
    /// Waiting list of a stage.
    Stage { stage_id: StageId },
    /// Being served at a workstation.
    Workstation {
        stage_id: StageId,
        workstation_id: WorkstationId,
    },
}

/// Read-only copy of the whole engine state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub version: u64,
    pub auto_forward_enabled: bool,
    pub stages: Vec<ServiceStage>,
    pub waiting_queue: Vec<Ticket>,
    pub history: Vec<CalledTicketInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ticket(number: &str, is_priority: bool, created_at: DateTime<Utc>) -> Ticket {
        Ticket {
            id: TicketId::new(),
            number: number.to_string(),
            is_priority,
            created_at,
        }
    }

    #[test]
    fn test_format_number_pads_to_three_digits() {
        assert_eq!(TicketClass::Common.format_number(1), "C001");
        assert_eq!(TicketClass::Priority.format_number(42), "P042");
        assert_eq!(TicketClass::Common.format_number(999), "C999");
    }

    #[test]
    fn test_format_number_grows_past_999() {
        assert_eq!(TicketClass::Common.format_number(1000), "C1000");
        assert_eq!(TicketClass::Priority.format_number(12345), "P12345");
    }

    #[test]
    fn test_next_waiting_prefers_priority_then_oldest() {
        let t0 = Utc::now();
        let mut stage = ServiceStage::new("Triage".into(), "Room".into());
        stage.waiting_tickets = vec![
            ticket("C001", false, t0),
            ticket("P002", true, t0 + Duration::seconds(2)),
            ticket("P001", true, t0 + Duration::seconds(1)),
        ];

        let index = stage.next_waiting_index().unwrap();
        assert_eq!(stage.waiting_tickets[index].number, "P001");
    }

    #[test]
    fn test_next_waiting_equal_timestamps_keep_list_order() {
        let t0 = Utc::now();
        let mut stage = ServiceStage::new("Triage".into(), "Room".into());
        stage.waiting_tickets = vec![ticket("C002", false, t0), ticket("C001", false, t0)];

        assert_eq!(stage.next_waiting_index(), Some(0));
    }

    #[test]
    fn test_next_waiting_empty() {
        let stage = ServiceStage::new("Triage".into(), "Room".into());
        assert_eq!(stage.next_waiting_index(), None);
    }

    #[test]
    fn test_next_workstation_number_uses_typed_numbers() {
        let mut stage = ServiceStage::new("Triage".into(), "Room".into());
        assert_eq!(stage.next_workstation_number(), 1);

        stage.workstations.push(Workstation::numbered(1));
        let mut renamed = Workstation::numbered(2);
        renamed.name = "Front desk".to_string();
        stage.workstations.push(renamed);

        assert_eq!(stage.next_workstation_number(), 3);
    }

    #[test]
    fn test_workstation_label() {
        let stage = ServiceStage::new("Triage".into(), "Room".into());
        let ws = Workstation::numbered(4);
        assert_eq!(stage.workstation_label(&ws), "Room 4");
    }

    #[test]
    fn test_workstation_lookup_and_id_serialization() {
        let mut stage = ServiceStage::new("Reception".into(), "Guichê".into());
        let ws = Workstation::numbered(1);
        let id = ws.id;
        stage.workstations.push(ws);

        assert_eq!(stage.workstation(id).map(|w| w.number), Some(1));
        assert!(stage.workstation(WorkstationId::new()).is_none());

        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
    }

    #[test]
    fn test_ticket_location_serialization() {
        let loc = TicketLocation::Lobby;
        let json = serde_json::to_string(&loc).unwrap();
        assert_eq!(json, r#"{"type":"lobby"}"#);
    }
}
