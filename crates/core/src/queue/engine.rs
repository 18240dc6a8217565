//! The queue engine: single owner of stages, workstations, tickets and history.

use std::sync::Arc;

use tracing::{debug, info};

use super::clock::{Clock, SystemClock};
use super::config::{EngineConfig, MAX_HISTORY_CAPACITY};
use super::rejection::{Outcome, Rejection};
use super::subscription::{Subscribers, SubscriptionId};
use super::types::{
    CalledTicketInfo, EngineSnapshot, ServiceStage, StageId, Ticket, TicketClass, TicketId,
    TicketLocation, Workstation, WorkstationId,
};
use crate::metrics::{
    OPERATIONS_REJECTED, TICKETS_CALLED, TICKETS_FINISHED, TICKETS_GENERATED, TICKETS_SALVAGED,
};

/// Ticket counts per kind of location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueDepths {
    /// Tickets in the engine-level waiting queue.
    pub lobby: usize,
    /// Tickets in stage waiting lists.
    pub waiting: usize,
    /// Tickets currently held by workstations.
    pub serving: usize,
}

/// Multi-stage ticket queue.
///
/// Every successful mutation bumps [`version`](Self::version) and notifies
/// subscribers exactly once; a rejected call leaves everything untouched.
pub struct QueueEngine {
    stages: Vec<ServiceStage>,
    waiting_queue: Vec<Ticket>,
    history: Vec<CalledTicketInfo>,
    auto_forward_enabled: bool,
    common_counter: u64,
    priority_counter: u64,
    history_capacity: usize,
    default_workstation_type: String,
    version: u64,
    subscribers: Subscribers,
    clock: Arc<dyn Clock>,
}

impl QueueEngine {
    /// Create an empty engine with default settings.
    pub fn new() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    /// Create an engine from configuration, seeding the configured stages.
    ///
    /// History capacity is clamped to `1..=MAX_HISTORY_CAPACITY`.
    pub fn with_config(config: &EngineConfig) -> Self {
        let mut engine = Self {
            stages: Vec::new(),
            waiting_queue: Vec::new(),
            history: Vec::new(),
            auto_forward_enabled: config.auto_forward,
            common_counter: 1,
            priority_counter: 1,
            history_capacity: config.history_capacity.clamp(1, MAX_HISTORY_CAPACITY),
            default_workstation_type: config.default_workstation_type.clone(),
            version: 0,
            subscribers: Subscribers::default(),
            clock: Arc::new(SystemClock),
        };

        for seed in &config.stages {
            let label = seed.workstation_type_name.clone().unwrap_or_default();
            let Ok(stage_id) = engine.add_stage(&seed.name, &label) else {
                continue;
            };
            for _ in 0..seed.workstations {
                let _ = engine.increment_workstation(stage_id);
            }
        }

        // Seeded layout is the starting state, not a change
        engine.version = 0;
        engine
    }

    /// Replace the timestamp source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    /// Register a change listener. Listeners run synchronously, in
    /// subscription order, after each successful mutation.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.subscribers.subscribe(Box::new(listener))
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    // ========================================================================
    // Read accessors
    // ========================================================================

    pub fn stages(&self) -> &[ServiceStage] {
        &self.stages
    }

    pub fn stage(&self, id: StageId) -> Option<&ServiceStage> {
        self.stages.iter().find(|s| s.id == id)
    }

    /// Engine-level waiting queue (tickets not assigned to any stage).
    pub fn waiting_queue(&self) -> &[Ticket] {
        &self.waiting_queue
    }

    /// Call history, most recent first.
    pub fn history(&self) -> &[CalledTicketInfo] {
        &self.history
    }

    pub fn auto_forward_enabled(&self) -> bool {
        self.auto_forward_enabled
    }

    /// Number of successful mutations so far.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn history_capacity(&self) -> usize {
        self.history_capacity
    }

    /// Find where a ticket currently lives.
    pub fn locate_ticket(&self, id: TicketId) -> Option<TicketLocation> {
        if self.waiting_queue.iter().any(|t| t.id == id) {
            return Some(TicketLocation::Lobby);
        }

        for stage in &self.stages {
            if stage.waiting_tickets.iter().any(|t| t.id == id) {
                return Some(TicketLocation::Stage { stage_id: stage.id });
            }
            for ws in &stage.workstations {
                if ws.current_ticket.as_ref().is_some_and(|t| t.id == id) {
                    return Some(TicketLocation::Workstation {
                        stage_id: stage.id,
                        workstation_id: ws.id,
                    });
                }
            }
        }

        None
    }

    pub fn queue_depths(&self) -> QueueDepths {
        QueueDepths {
            lobby: self.waiting_queue.len(),
            waiting: self.stages.iter().map(|s| s.waiting_tickets.len()).sum(),
            serving: self.stages.iter().map(|s| s.occupied_workstations()).sum(),
        }
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            version: self.version,
            auto_forward_enabled: self.auto_forward_enabled,
            stages: self.stages.clone(),
            waiting_queue: self.waiting_queue.clone(),
            history: self.history.clone(),
        }
    }

    // ========================================================================
    // Tickets
    // ========================================================================

    /// Issue a new ticket.
    ///
    /// With auto-forward on and at least one stage, the ticket joins the
    /// first stage's waiting list; otherwise it joins the lobby.
    pub fn generate_ticket(&mut self, is_priority: bool) -> Ticket {
        let class = TicketClass::from_priority(is_priority);
        let counter = match class {
            TicketClass::Common => &mut self.common_counter,
            TicketClass::Priority => &mut self.priority_counter,
        };
        let sequence = *counter;
        *counter += 1;

        let ticket = Ticket {
            id: TicketId::new(),
            number: class.format_number(sequence),
            is_priority,
            created_at: self.clock.now(),
        };

        match self.stages.first_mut() {
            Some(first) if self.auto_forward_enabled => {
                first.waiting_tickets.push(ticket.clone());
            }
            _ => self.waiting_queue.push(ticket.clone()),
        }

        TICKETS_GENERATED.with_label_values(&[class.as_str()]).inc();
        debug!(ticket = %ticket.number, "Generated ticket");
        self.commit();
        ticket
    }

    /// Call the next waiting ticket of a stage to one of its workstations.
    pub fn call_next_in_stage(
        &mut self,
        stage_id: StageId,
        workstation_id: WorkstationId,
    ) -> Outcome<CalledTicketInfo> {
        const OP: &str = "call_next_in_stage";

        let stage_index = self.stage_index(OP, stage_id)?;
        let stage = &self.stages[stage_index];

        let Some(ws_index) = stage
            .workstations
            .iter()
            .position(|w| w.id == workstation_id)
        else {
            return self.reject(OP, Rejection::UnknownWorkstation(workstation_id));
        };
        if stage.workstations[ws_index].is_occupied() {
            return self.reject(OP, Rejection::WorkstationOccupied(workstation_id));
        }
        let Some(next_index) = stage.next_waiting_index() else {
            return self.reject(OP, Rejection::NoWaitingTickets(stage_id));
        };

        let called_at = self.clock.now();
        let stage = &mut self.stages[stage_index];
        let ticket = stage.waiting_tickets.remove(next_index);
        let info = CalledTicketInfo {
            ticket_number: ticket.number.clone(),
            stage_name: stage.name.clone(),
            workstation_name: stage.workstation_label(&stage.workstations[ws_index]),
            called_at,
        };
        stage.workstations[ws_index].current_ticket = Some(ticket);

        self.record_call(info.clone());
        TICKETS_CALLED.inc();
        debug!(
            ticket = %info.ticket_number,
            workstation = %info.workstation_name,
            "Called ticket"
        );
        self.commit();
        Ok(info)
    }

    /// Move a waiting ticket between the lobby and stage waiting lists.
    ///
    /// `None` means the lobby. The ticket must actually be at `from`; the
    /// engine does not search for it elsewhere.
    pub fn move_ticket(
        &mut self,
        ticket_id: TicketId,
        from: Option<StageId>,
        to: Option<StageId>,
    ) -> Outcome<()> {
        const OP: &str = "move_ticket";

        let from_index = self.optional_stage_index(OP, from)?;
        let to_index = self.optional_stage_index(OP, to)?;

        let source = self.queue_mut(from_index);
        let Some(position) = source.iter().position(|t| t.id == ticket_id) else {
            return self.reject(OP, Rejection::TicketNotFound(ticket_id));
        };
        let ticket = source.remove(position);
        self.queue_mut(to_index).push(ticket);

        debug!(ticket = %ticket_id, ?from, ?to, "Moved ticket");
        self.commit();
        Ok(())
    }

    /// Send the ticket held by a workstation back into a stage waiting list.
    ///
    /// The ticket is appended to the end of the list.
    pub fn move_ticket_from_workstation(
        &mut self,
        workstation_id: WorkstationId,
        ticket_id: TicketId,
        to_stage: StageId,
    ) -> Outcome<()> {
        const OP: &str = "move_ticket_from_workstation";

        let to_index = self.stage_index(OP, to_stage)?;
        let (stage_index, ws_index) = self.workstation_position(OP, workstation_id)?;

        let slot = &mut self.stages[stage_index].workstations[ws_index].current_ticket;
        if !slot.as_ref().is_some_and(|t| t.id == ticket_id) {
            return self.reject(
                OP,
                Rejection::TicketNotAtWorkstation {
                    workstation_id,
                    ticket_id,
                },
            );
        }
        let Some(ticket) = slot.take() else {
            return self.reject(OP, Rejection::TicketNotFound(ticket_id));
        };
        self.stages[to_index].waiting_tickets.push(ticket);

        debug!(ticket = %ticket_id, stage = %to_stage, "Transferred ticket from workstation");
        self.commit();
        Ok(())
    }

    /// Clear a workstation. The ticket it held, if any, is dropped and
    /// returned; it lives on only in the call history.
    pub fn finish_ticket(&mut self, workstation_id: WorkstationId) -> Outcome<Option<Ticket>> {
        const OP: &str = "finish_ticket";

        let (stage_index, ws_index) = self.workstation_position(OP, workstation_id)?;
        let finished = self.stages[stage_index].workstations[ws_index]
            .current_ticket
            .take();

        if let Some(ticket) = &finished {
            TICKETS_FINISHED.inc();
            debug!(ticket = %ticket.number, "Finished ticket");
        }
        self.commit();
        Ok(finished)
    }

    // ========================================================================
    // Stages
    // ========================================================================

    /// Append a new empty stage.
    ///
    /// A blank or whitespace-only `workstation_type_name` is not rejected: the
    /// stage silently takes the configured default workstation type instead.
    /// Only a blank stage `name` is refused.
    pub fn add_stage(&mut self, name: &str, workstation_type_name: &str) -> Outcome<StageId> {
        if name.trim().is_empty() {
            return self.reject("add_stage", Rejection::EmptyStageName);
        }

        let label = if workstation_type_name.trim().is_empty() {
            self.default_workstation_type.clone()
        } else {
            workstation_type_name.to_string()
        };
        let stage = ServiceStage::new(name.to_string(), label);
        let id = stage.id;
        self.stages.push(stage);

        info!(stage = %name, "Added stage");
        self.commit();
        Ok(id)
    }

    /// Remove a stage, returning its tickets to the lobby.
    ///
    /// Waiting tickets are salvaged first, then each workstation's ticket in
    /// workstation order. Returns the number of tickets salvaged.
    pub fn remove_stage(&mut self, stage_id: StageId) -> Outcome<usize> {
        let index = self.stage_index("remove_stage", stage_id)?;
        let stage = self.stages.remove(index);

        let before = self.waiting_queue.len();
        self.waiting_queue.extend(stage.waiting_tickets);
        self.waiting_queue.extend(
            stage
                .workstations
                .into_iter()
                .filter_map(|w| w.current_ticket),
        );
        let salvaged = self.waiting_queue.len() - before;

        TICKETS_SALVAGED.inc_by(salvaged as u64);
        info!(stage = %stage.name, salvaged, "Removed stage");
        self.commit();
        Ok(salvaged)
    }

    /// Open one more workstation in a stage.
    pub fn increment_workstation(&mut self, stage_id: StageId) -> Outcome<WorkstationId> {
        let index = self.stage_index("increment_workstation", stage_id)?;
        let stage = &mut self.stages[index];

        let workstation = Workstation::numbered(stage.next_workstation_number());
        let id = workstation.id;
        info!(stage = %stage.name, workstation = %workstation.name, "Opened workstation");
        stage.workstations.push(workstation);

        self.commit();
        Ok(id)
    }

    /// Close the highest-numbered workstation of a stage.
    ///
    /// A ticket it was serving goes back to the end of the same stage's
    /// waiting list; its id is returned.
    pub fn decrement_workstation(&mut self, stage_id: StageId) -> Outcome<Option<TicketId>> {
        const OP: &str = "decrement_workstation";

        let index = self.stage_index(OP, stage_id)?;
        let stage = &mut self.stages[index];

        let Some(ws_index) = stage
            .workstations
            .iter()
            .enumerate()
            .max_by(|(ia, a), (ib, b)| a.number.cmp(&b.number).then(ib.cmp(ia)))
            .map(|(i, _)| i)
        else {
            return self.reject(OP, Rejection::NoWorkstations(stage_id));
        };

        let workstation = stage.workstations.remove(ws_index);
        let returned = workstation.current_ticket.map(|ticket| {
            let id = ticket.id;
            stage.waiting_tickets.push(ticket);
            id
        });

        info!(stage = %stage.name, workstation = %workstation.name, "Closed workstation");
        self.commit();
        Ok(returned)
    }

    /// Change a workstation's display name. Numbering is unaffected.
    pub fn rename_workstation(&mut self, workstation_id: WorkstationId, name: &str) -> Outcome<()> {
        const OP: &str = "rename_workstation";

        if name.trim().is_empty() {
            return self.reject(OP, Rejection::EmptyWorkstationName);
        }
        let (stage_index, ws_index) = self.workstation_position(OP, workstation_id)?;
        self.stages[stage_index].workstations[ws_index].name = name.to_string();

        self.commit();
        Ok(())
    }

    // ========================================================================
    // Auto-forward
    // ========================================================================

    /// Flip auto-forward, returning the new value.
    pub fn toggle_auto_forward(&mut self) -> bool {
        self.auto_forward_enabled = !self.auto_forward_enabled;
        info!(enabled = self.auto_forward_enabled, "Toggled auto-forward");
        self.commit();
        self.auto_forward_enabled
    }

    /// Set auto-forward explicitly. Setting the current value is rejected.
    pub fn set_auto_forward(&mut self, enabled: bool) -> Outcome<()> {
        if self.auto_forward_enabled == enabled {
            return self.reject("set_auto_forward", Rejection::Unchanged);
        }
        self.toggle_auto_forward();
        Ok(())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn commit(&mut self) {
        self.version += 1;
        self.subscribers.notify();
    }

    fn reject<T>(&self, operation: &'static str, rejection: Rejection) -> Outcome<T> {
        debug!(operation, reason = rejection.reason(), "{}", rejection);
        OPERATIONS_REJECTED
            .with_label_values(&[operation, rejection.reason()])
            .inc();
        Err(rejection)
    }

    fn record_call(&mut self, info: CalledTicketInfo) {
        self.history.insert(0, info);
        self.history.truncate(self.history_capacity);
    }

    fn stage_index(&self, operation: &'static str, id: StageId) -> Outcome<usize> {
        match self.stages.iter().position(|s| s.id == id) {
            Some(index) => Ok(index),
            None => self.reject(operation, Rejection::UnknownStage(id)),
        }
    }

    fn optional_stage_index(
        &self,
        operation: &'static str,
        id: Option<StageId>,
    ) -> Outcome<Option<usize>> {
        id.map(|id| self.stage_index(operation, id)).transpose()
    }

    fn workstation_position(
        &self,
        operation: &'static str,
        id: WorkstationId,
    ) -> Outcome<(usize, usize)> {
        for (stage_index, stage) in self.stages.iter().enumerate() {
            if let Some(ws_index) = stage.workstations.iter().position(|w| w.id == id) {
                return Ok((stage_index, ws_index));
            }
        }
        self.reject(operation, Rejection::UnknownWorkstation(id))
    }

    fn queue_mut(&mut self, stage_index: Option<usize>) -> &mut Vec<Ticket> {
        match stage_index {
            Some(index) => &mut self.stages[index].waiting_tickets,
            None => &mut self.waiting_queue,
        }
    }
}

impl Default for QueueEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for QueueEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueEngine")
            .field("stages", &self.stages.len())
            .field("waiting_queue", &self.waiting_queue.len())
            .field("history", &self.history.len())
            .field("auto_forward_enabled", &self.auto_forward_enabled)
            .field("version", &self.version)
            .finish()
    }
}
