use crate::device_camera::interface::DeviceCamera;
use crate::device_display::interface::{DeviceDisplay, Key, Window};
use crate::device_speaker::interface::DeviceSpeaker;
use crate::frame;
use crate::image_classifier::interface::ImageClassifier;
use crate::library::logger::interface::Logger;
use crate::result_renderer;
use crate::result_store::ResultStore;
use crate::session::core::{Effect, Event, SessionContext};
use crate::session::main::Session;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

pub struct RunEffect {
    ctx: SessionContext,
    logger: Arc<dyn Logger + Send + Sync>,
    device_camera: Arc<dyn DeviceCamera + Send + Sync>,
    device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
    device_speaker: Arc<dyn DeviceSpeaker + Send + Sync>,
    image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
    result_store: ResultStore,
}

impl RunEffect {
    pub fn new(session: &Session) -> Self {
        Self {
            ctx: session.ctx.clone(),
            logger: session.logger.with_namespace("effect"),
            device_camera: session.device_camera.clone(),
            device_display: session.device_display.clone(),
            device_speaker: session.device_speaker.clone(),
            image_classifier: session.image_classifier.clone(),
            result_store: session.result_store.clone(),
        }
    }

    fn display(&self) -> MutexGuard<'_, dyn DeviceDisplay + Send + Sync + 'static> {
        match self.device_display.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn run_effect(&self, effect: Effect) -> Option<Event> {
        let _ = self
            .logger
            .info(&format!("Running effect: {}", effect.to_display_string()));

        let event = match effect {
            Effect::OpenCamera => Some(Event::CameraOpenDone(self.device_camera.start())),
            Effect::CaptureFrame => Some(Event::FrameCaptured(self.device_camera.capture_frame())),
            Effect::LoadImage { path } => Some(Event::ImageLoadDone(frame::load(&path))),
            Effect::ShowPreview { frame } => {
                let overlay = result_renderer::live_overlay();
                let mut image = frame;
                overlay.paint(&mut image);
                if let Err(e) = self.display().show(Window::Live, &image, &overlay) {
                    let _ = self.logger.error(&format!("Failed to show preview: {}", e));
                }
                None
            }
            Effect::PollKey => {
                let key = self.display().wait_key(Some(self.ctx.config.poll_interval));
                Some(Event::KeyPolled(key))
            }
            Effect::Classify { frame } => Some(Event::ClassifyDone(
                self.image_classifier.classify(&frame, self.ctx.config.top_k),
            )),
            Effect::Announce { message } => {
                println!("{}", message);
                if let Err(e) = self.device_speaker.speak(&message) {
                    let _ = self.logger.error(&format!("Failed to speak: {}", e));
                }
                None
            }
            Effect::Notify { message } => {
                println!("{}", message);
                None
            }
            Effect::Log { message } => {
                let _ = self.logger.info(&message);
                None
            }
            Effect::SaveResult { image } => Some(Event::SaveDone(self.result_store.save(&image))),
            Effect::ShowResult { result } => {
                if let Err(e) = self
                    .display()
                    .show(Window::Result, &result.image, &result.overlay)
                {
                    let _ = self.logger.error(&format!("Failed to show result: {}", e));
                }
                None
            }
            Effect::HoldResult { duration } => Some(self.hold(duration)),
            Effect::WaitDismiss => {
                if let Err(e) = self.display().wait_key(None) {
                    let _ = self.logger.error(&format!("Display lost while waiting: {}", e));
                }
                Some(Event::Dismissed)
            }
        };

        if let Some(event) = &event {
            let _ = self
                .logger
                .info(&format!("Event: {}", event.to_display_string()));
        }
        event
    }

    /// Keeps the result on screen for `duration`. A quit pressed meanwhile is
    /// remembered and reported once the hold is over; a closed display ends
    /// the hold at once.
    fn hold(&self, duration: Duration) -> Event {
        let deadline = Instant::now() + duration;
        let mut quit_requested = false;

        loop {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            match self.display().wait_key(Some(deadline - now)) {
                Ok(Some(Key::Quit)) => quit_requested = true,
                Ok(Some(Key::Closed)) => {
                    quit_requested = true;
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    let _ = self.logger.error(&format!("Display lost during hold: {}", e));
                    quit_requested = true;
                    break;
                }
            }
        }

        Event::HoldDone { quit_requested }
    }
}
