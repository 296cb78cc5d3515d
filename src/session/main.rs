use crate::device_camera::interface::DeviceCamera;
use crate::device_display::interface::DeviceDisplay;
use crate::device_speaker::interface::DeviceSpeaker;
use crate::image_classifier::interface::ImageClassifier;
use crate::library::logger::interface::Logger;
use crate::result_store::ResultStore;
use crate::session::core::SessionContext;
use std::sync::{Arc, Mutex};

/// One interactive session wired to its devices.
#[derive(Clone)]
pub struct Session {
    pub ctx: SessionContext,
    pub logger: Arc<dyn Logger + Send + Sync>,
    pub device_camera: Arc<dyn DeviceCamera + Send + Sync>,
    pub device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
    pub device_speaker: Arc<dyn DeviceSpeaker + Send + Sync>,
    pub image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
    pub result_store: ResultStore,
}

impl Session {
    pub fn new(
        ctx: SessionContext,
        logger: Arc<dyn Logger + Send + Sync>,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
        device_speaker: Arc<dyn DeviceSpeaker + Send + Sync>,
        image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
    ) -> Self {
        let result_store = ResultStore::new(ctx.config.detections_dir.clone());
        Self {
            logger: logger.with_namespace("session"),
            ctx,
            device_camera,
            device_display,
            device_speaker,
            image_classifier,
            result_store,
        }
    }
}
