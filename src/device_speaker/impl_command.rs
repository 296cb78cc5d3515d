use crate::device_speaker::interface::DeviceSpeaker;
use crate::library::logger::interface::Logger;
use std::process::{Command, Stdio};
use std::sync::Arc;

/// Speech through the platform synthesizer: `say` on macOS, `espeak` elsewhere.
pub struct DeviceSpeakerCommand {
    program: String,
    rate_flag: &'static str,
    words_per_minute: u32,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DeviceSpeakerCommand {
    pub fn new(words_per_minute: u32, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        let (program, rate_flag) = if cfg!(target_os = "macos") {
            ("say", "-r")
        } else {
            ("espeak", "-s")
        };
        Self {
            program: program.to_string(),
            rate_flag,
            words_per_minute,
            logger: logger.with_namespace("speaker"),
        }
    }

    fn args(&self, message: &str) -> Vec<String> {
        vec![
            self.rate_flag.to_string(),
            self.words_per_minute.to_string(),
            message.to_string(),
        ]
    }
}

impl DeviceSpeaker for DeviceSpeakerCommand {
    fn speak(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info(&format!("Speaking: {}", message))?;

        let status = Command::new(&self.program)
            .args(self.args(message))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;

        if !status.success() {
            return Err(format!("{} exited with {}", self.program, status).into());
        }
        Ok(())
    }
}
