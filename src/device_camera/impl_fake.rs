use crate::device_camera::interface::DeviceCamera;
use crate::frame::Frame;
use crate::library::logger::interface::Logger;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

pub struct DeviceCameraFake {
    logger: Arc<dyn Logger + Send + Sync>,
    frames: Vec<Frame>,
    next: AtomicUsize,
    unavailable: bool,
    started: AtomicBool,
    stops: AtomicUsize,
}

impl DeviceCameraFake {
    /// Cycles through `frames` forever.
    pub fn new(logger: Arc<dyn Logger + Send + Sync>, frames: Vec<Frame>) -> Self {
        Self {
            logger: logger.with_namespace("camera").with_namespace("fake"),
            frames,
            next: AtomicUsize::new(0),
            unavailable: false,
            started: AtomicBool::new(false),
            stops: AtomicUsize::new(0),
        }
    }

    pub fn unavailable(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            unavailable: true,
            ..Self::new(logger, vec![])
        }
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    pub fn frames_captured(&self) -> usize {
        self.next.load(Ordering::SeqCst)
    }
}

impl DeviceCamera for DeviceCameraFake {
    fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.unavailable {
            return Err("no capture device".into());
        }
        self.logger.info("Camera started")?;
        self.started.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        if self.started.swap(false, Ordering::SeqCst) {
            self.logger.info("Camera stopped")?;
        }
        Ok(())
    }

    fn capture_frame(&self) -> Result<Frame, Box<dyn std::error::Error + Send + Sync>> {
        if !self.is_started() {
            return Err("camera not started".into());
        }
        if self.frames.is_empty() {
            return Err("camera produced no frame".into());
        }
        let index = self.next.fetch_add(1, Ordering::SeqCst);
        Ok(self.frames[index % self.frames.len()].clone())
    }
}
