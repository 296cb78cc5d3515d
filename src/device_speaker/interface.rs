pub trait DeviceSpeaker {
    /// Speaks `message`, returning once playback has finished.
    fn speak(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
