use crate::library::logger::interface::Logger;
use crate::session::core::State;
use std::sync::Arc;

/// Narrates state changes. Drawing happens through effects, so the
/// session is only ever rendered into the log.
pub struct Render {
    logger: Arc<dyn Logger + Send + Sync>,
}

impl Render {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("state"),
        }
    }

    pub fn render(&self, state: &State) {
        let _ = self.logger.info(&state.to_display_string());
    }
}
