use crate::device_camera::interface::DeviceCamera;
use crate::device_display::interface::DeviceDisplay;
use crate::library::logger::interface::Logger;
use crate::library::state_machine::StateMachine;
use crate::session::core::{init, transition, Exit, State};
use crate::session::main::Session;
use crate::session::render::Render;
use crate::session::run_effect::RunEffect;
use std::sync::{Arc, Mutex};

/// Releases the camera and every display surface when dropped.
struct Release {
    logger: Arc<dyn Logger + Send + Sync>,
    device_camera: Arc<dyn DeviceCamera + Send + Sync>,
    device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
}

impl Drop for Release {
    fn drop(&mut self) {
        if let Err(e) = self.device_camera.stop() {
            let _ = self.logger.error(&format!("Failed to release camera: {}", e));
        }
        let mut display = match self.device_display.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = display.close() {
            let _ = self.logger.error(&format!("Failed to close display: {}", e));
        }
    }
}

impl Session {
    /// Runs until the session terminates and reports how it ended.
    pub fn run(&self) -> Exit {
        let _release = Release {
            logger: self.logger.clone(),
            device_camera: self.device_camera.clone(),
            device_display: self.device_display.clone(),
        };

        let render = Render::new(self.logger.clone());
        let run_effect = RunEffect::new(self);

        let machine = StateMachine::new(
            init(&self.ctx.mode),
            |state, event| transition(&self.ctx, state, event),
            |state| render.render(state),
            |effect| run_effect.run_effect(effect),
        );

        match machine.run() {
            State::Terminated { exit } => {
                let _ = self.logger.info(&format!("Session ended: {:?}", exit));
                exit
            }
            state => {
                let _ = self.logger.error(&format!(
                    "Session stalled in {}",
                    state.to_display_string()
                ));
                Exit::Stalled
            }
        }
    }
}
