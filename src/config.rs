use crate::device_camera::impl_ffmpeg::FfmpegCameraConfig;
use crate::image_classifier::models::model_config::ModelConfig;
use crate::leaf_gate::LeafGateConfig;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{key} must be one of {expected}, got {value:?}")]
    InvalidChoice {
        key: &'static str,
        expected: &'static str,
        value: String,
    },
    #[error("{key} must be a positive number, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayKind {
    Gui,
    Console,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierKind {
    Onnx,
    Fake,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub leaf_gate: LeafGateConfig,
    pub top_k: usize,
    pub poll_interval: Duration,
    pub result_hold: Duration,
    pub detections_dir: PathBuf,
    pub speech_rate: u32,
    pub model: ModelConfig,
    pub camera: FfmpegCameraConfig,
    pub display: DisplayKind,
    pub classifier: ClassifierKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            leaf_gate: LeafGateConfig::default(),
            top_k: 3,
            poll_interval: Duration::from_millis(10),
            result_hold: Duration::from_secs(3),
            detections_dir: PathBuf::from("detections"),
            speech_rate: 150,
            model: ModelConfig::default(),
            camera: FfmpegCameraConfig::default(),
            display: DisplayKind::Gui,
            classifier: ClassifierKind::Onnx,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for the `LEAF_*` keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(path) = lookup("LEAF_MODEL_PATH") {
            config.model.onnx_model_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("LEAF_LABELS_PATH") {
            config.model.labels_path = PathBuf::from(path);
        }
        if let Some(device) = lookup("LEAF_CAMERA_DEVICE") {
            config.camera.device = device;
        }
        if let Some(dir) = lookup("LEAF_DETECTIONS_DIR") {
            config.detections_dir = PathBuf::from(dir);
        }
        if let Some(value) = lookup("LEAF_DISPLAY") {
            config.display = match value.to_lowercase().as_str() {
                "gui" => DisplayKind::Gui,
                "console" => DisplayKind::Console,
                _ => {
                    return Err(ConfigError::InvalidChoice {
                        key: "LEAF_DISPLAY",
                        expected: "gui, console",
                        value,
                    })
                }
            };
        }
        if let Some(value) = lookup("LEAF_CLASSIFIER") {
            config.classifier = match value.to_lowercase().as_str() {
                "onnx" => ClassifierKind::Onnx,
                "fake" => ClassifierKind::Fake,
                _ => {
                    return Err(ConfigError::InvalidChoice {
                        key: "LEAF_CLASSIFIER",
                        expected: "onnx, fake",
                        value,
                    })
                }
            };
        }
        if let Some(value) = lookup("LEAF_SPEECH_RATE") {
            config.speech_rate = match value.trim().parse::<u32>() {
                Ok(rate) if rate > 0 => rate,
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        key: "LEAF_SPEECH_RATE",
                        value,
                    })
                }
            };
        }

        Ok(config)
    }
}
