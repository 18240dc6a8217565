//! Testing utilities and mock implementations.
//!
//! # Example
//!
//! ```rust,ignore
//! use nextqueue_core::testing::{fixtures, ManualClock, MockAnnouncer};
//!
//! let clock = Arc::new(ManualClock::default());
//! let (mut engine, stage, workstations) = fixtures::engine_with_stage("Reception", 2);
//! let engine = engine.with_clock(clock.clone());
//! ```

mod manual_clock;
mod mock_announcer;

pub use manual_clock::ManualClock;
pub use mock_announcer::MockAnnouncer;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::queue::{QueueEngine, StageId, TicketId, WorkstationId};

    /// Engine with one stage ("Guichê" workstations) and `workstations`
    /// workstations opened in it.
    pub fn engine_with_stage(
        name: &str,
        workstations: u32,
    ) -> (QueueEngine, StageId, Vec<WorkstationId>) {
        let mut engine = QueueEngine::new();
        let stage = add_stage(&mut engine, name, workstations);
        let ids = workstation_ids(&engine, stage);
        (engine, stage, ids)
    }

    /// Add a stage with `workstations` workstations to an existing engine.
    pub fn add_stage(engine: &mut QueueEngine, name: &str, workstations: u32) -> StageId {
        let stage = engine
            .add_stage(name, "Guichê")
            .expect("fixture stage name must not be blank");
        for _ in 0..workstations {
            engine
                .increment_workstation(stage)
                .expect("fixture stage exists");
        }
        stage
    }

    /// Ids of a stage's workstations, in order.
    pub fn workstation_ids(engine: &QueueEngine, stage: StageId) -> Vec<WorkstationId> {
        engine
            .stage(stage)
            .map(|s| s.workstations.iter().map(|w| w.id).collect())
            .unwrap_or_default()
    }

    /// Every ticket id currently tracked by the engine, in location order:
    /// lobby, then each stage's waiting list followed by its workstations.
    pub fn tracked_ticket_ids(engine: &QueueEngine) -> Vec<TicketId> {
        let mut ids: Vec<TicketId> = engine.waiting_queue().iter().map(|t| t.id).collect();
        for stage in engine.stages() {
            ids.extend(stage.waiting_tickets.iter().map(|t| t.id));
            ids.extend(
                stage
                    .workstations
                    .iter()
                    .filter_map(|w| w.current_ticket.as_ref().map(|t| t.id)),
            );
        }
        ids
    }
}
