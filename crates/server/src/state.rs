use std::sync::Arc;

use nextqueue_core::{Announcer, Config, SharedQueueEngine};

use crate::api::WsBroadcaster;

/// Shared application state
pub struct AppState {
    config: Config,
    engine: SharedQueueEngine,
    announcer: Arc<dyn Announcer>,
    ws_broadcaster: WsBroadcaster,
}

impl AppState {
    /// Build the state and forward every engine change to WebSocket clients.
    pub fn new(
        config: Config,
        engine: SharedQueueEngine,
        announcer: Arc<dyn Announcer>,
        ws_broadcaster: WsBroadcaster,
    ) -> Self {
        let broadcaster = ws_broadcaster.clone();
        engine.with(|e| e.subscribe(move || broadcaster.state_changed()));

        Self {
            config,
            engine,
            announcer,
            ws_broadcaster,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn engine(&self) -> &SharedQueueEngine {
        &self.engine
    }

    pub fn announcer(&self) -> Arc<dyn Announcer> {
        Arc::clone(&self.announcer)
    }

    pub fn ws_broadcaster(&self) -> &WsBroadcaster {
        &self.ws_broadcaster
    }
}
