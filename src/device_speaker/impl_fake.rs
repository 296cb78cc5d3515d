use crate::device_speaker::interface::DeviceSpeaker;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct DeviceSpeakerFake {
    spoken: Mutex<Vec<String>>,
}

impl DeviceSpeakerFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spoken(&self) -> Vec<String> {
        match self.spoken.lock() {
            Ok(spoken) => spoken.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl DeviceSpeaker for DeviceSpeakerFake {
    fn speak(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        match self.spoken.lock() {
            Ok(mut spoken) => spoken.push(message.to_string()),
            Err(poisoned) => poisoned.into_inner().push(message.to_string()),
        }
        Ok(())
    }
}
