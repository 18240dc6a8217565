//! Multi-stage service counter queue.
//!
//! Tickets are generated into the lobby (or straight into the first stage
//! when auto-forward is on), moved between stage waiting lists, called to
//! workstations and finally finished. [`QueueEngine`] owns all of it and
//! notifies subscribers after every successful change.

mod clock;
mod config;
mod engine;
mod rejection;
mod shared;
mod subscription;
mod types;

pub use clock::{Clock, SystemClock};
pub use config::{EngineConfig, StageSeed, MAX_HISTORY_CAPACITY};
pub use engine::{QueueDepths, QueueEngine};
pub use rejection::{Outcome, Rejection};
pub use shared::SharedQueueEngine;
pub use subscription::{ChangeListener, SubscriptionId};
pub use types::{
    CalledTicketInfo, EngineSnapshot, ServiceStage, StageId, Ticket, TicketClass, TicketId,
    TicketLocation, Workstation, WorkstationId,
};
