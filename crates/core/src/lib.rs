pub mod announcer;
pub mod config;
pub mod metrics;
pub mod queue;
pub mod testing;

pub use announcer::{
    announce_detached, create_announcer, render_announcement, Announcer, AnnouncerBackend,
    AnnouncerConfig, AnnouncerError, CommandAnnouncer, CommandAnnouncerConfig, LogAnnouncer,
    NoneAnnouncer,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, ServerConfig,
};
pub use queue::{
    CalledTicketInfo, Clock, EngineConfig, EngineSnapshot, Outcome, QueueDepths, QueueEngine,
    Rejection, ServiceStage, SharedQueueEngine, StageId, StageSeed, SubscriptionId, SystemClock,
    Ticket, TicketClass, TicketId, TicketLocation, Workstation, WorkstationId,
    MAX_HISTORY_CAPACITY,
};
