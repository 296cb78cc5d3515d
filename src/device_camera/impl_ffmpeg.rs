use crate::device_camera::interface::DeviceCamera;
use crate::frame::{Frame, FRAME_HEIGHT, FRAME_WIDTH};
use crate::library::logger::interface::Logger;
use std::io::Read;
use std::process::{Child, ChildStdout, Command, Stdio};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CameraError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("camera {0} produced no frame")]
    NoFrame(String),
    #[error("camera not started")]
    NotStarted,
    #[error("camera stream ended: {0}")]
    StreamEnded(std::io::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FfmpegCameraConfig {
    pub program: String,
    /// ffmpeg input format: `v4l2`, `avfoundation` or `dshow`.
    pub input_format: String,
    pub device: String,
}

impl Default for FfmpegCameraConfig {
    fn default() -> Self {
        let input_format = if cfg!(target_os = "macos") {
            "avfoundation"
        } else if cfg!(target_os = "windows") {
            "dshow"
        } else {
            "v4l2"
        };
        let device = if cfg!(target_os = "macos") {
            "0"
        } else if cfg!(target_os = "windows") {
            "video=Integrated Camera"
        } else {
            "/dev/video0"
        };
        Self {
            program: "ffmpeg".to_string(),
            input_format: input_format.to_string(),
            device: device.to_string(),
        }
    }
}

struct Stream {
    child: Child,
    stdout: ChildStdout,
}

/// Live camera read through an `ffmpeg` child process emitting raw RGB24 frames.
pub struct DeviceCameraFfmpeg {
    config: FfmpegCameraConfig,
    logger: Arc<dyn Logger + Send + Sync>,
    stream: Mutex<Option<Stream>>,
}

impl DeviceCameraFfmpeg {
    pub fn new(config: FfmpegCameraConfig, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            config,
            logger: logger.with_namespace("camera").with_namespace("ffmpeg"),
            stream: Mutex::new(None),
        }
    }

    fn args(&self) -> Vec<String> {
        let size = format!("{}x{}", FRAME_WIDTH, FRAME_HEIGHT);
        vec![
            "-loglevel".to_string(),
            "error".to_string(),
            "-f".to_string(),
            self.config.input_format.clone(),
            "-i".to_string(),
            self.config.device.clone(),
            "-f".to_string(),
            "rawvideo".to_string(),
            "-pix_fmt".to_string(),
            "rgb24".to_string(),
            "-s".to_string(),
            size,
            "-".to_string(),
        ]
    }

    fn lock_stream(&self) -> MutexGuard<'_, Option<Stream>> {
        match self.stream.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn read_frame(stdout: &mut ChildStdout) -> Result<Frame, std::io::Error> {
    let mut buffer = vec![0u8; (FRAME_WIDTH * FRAME_HEIGHT * 3) as usize];
    stdout.read_exact(&mut buffer)?;
    Frame::from_raw(FRAME_WIDTH, FRAME_HEIGHT, buffer).ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidData, "frame buffer size mismatch")
    })
}

impl DeviceCamera for DeviceCameraFfmpeg {
    fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info(&format!(
            "Opening {} ({})",
            self.config.device, self.config.input_format
        ))?;

        let mut child = Command::new(&self.config.program)
            .args(self.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| CameraError::Spawn {
                program: self.config.program.clone(),
                source,
            })?;

        let Some(mut stdout) = child.stdout.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(Box::new(CameraError::NoFrame(self.config.device.clone())));
        };

        // The device counts as open once the first frame arrives.
        if read_frame(&mut stdout).is_err() {
            let _ = child.kill();
            let _ = child.wait();
            return Err(Box::new(CameraError::NoFrame(self.config.device.clone())));
        }

        *self.lock_stream() = Some(Stream { child, stdout });
        self.logger.info("Camera opened")?;
        Ok(())
    }

    fn stop(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if let Some(mut stream) = self.lock_stream().take() {
            self.logger.info("Releasing camera")?;
            drop(stream.stdout);
            let _ = stream.child.kill();
            stream.child.wait()?;
        }
        Ok(())
    }

    fn capture_frame(&self) -> Result<Frame, Box<dyn std::error::Error + Send + Sync>> {
        let mut guard = self.lock_stream();
        let stream = guard.as_mut().ok_or(CameraError::NotStarted)?;
        let frame = read_frame(&mut stream.stdout).map_err(CameraError::StreamEnded)?;
        Ok(frame)
    }
}

impl Drop for DeviceCameraFfmpeg {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            let _ = self
                .logger
                .error(&format!("Failed to stop camera during shutdown: {}", e));
        }
    }
}
