use crate::frame::Frame;

pub trait DeviceCamera {
    /// Opens the capture device. Fails when the device cannot be opened.
    fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    /// Releases the device. Safe to call when not started.
    fn stop(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn capture_frame(&self) -> Result<Frame, Box<dyn std::error::Error + Send + Sync>>;
}
