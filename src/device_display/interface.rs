use crate::library::overlay::Overlay;
use image::RgbImage;
use std::error::Error;
use std::time::Duration;

/// A user trigger read from the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Analyze,
    Quit,
    /// Any other key; not a trigger while the live preview runs.
    Other,
    /// The display went away. Every later wait returns this at once.
    Closed,
}

impl Key {
    pub fn from_char(c: char) -> Key {
        match c {
            ' ' => Key::Analyze,
            'q' => Key::Quit,
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    Live,
    Result,
}

impl Window {
    pub fn title(&self) -> &'static str {
        match self {
            Window::Live => "Live",
            Window::Result => "Result",
        }
    }
}

/// On-screen surface for the live preview and the result view.
pub trait DeviceDisplay: Send + Sync {
    /// Shows `image`, already annotated with `overlay`, in `window`.
    fn show(
        &mut self,
        window: Window,
        image: &RgbImage,
        overlay: &Overlay,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Waits for a key press, at most `timeout` or forever when `None`.
    /// A closed display returns [`Key::Closed`] without waiting.
    fn wait_key(&mut self, timeout: Option<Duration>)
        -> Result<Option<Key>, Box<dyn Error + Send + Sync>>;

    /// Tears down every surface. Safe to call more than once.
    fn close(&mut self) -> Result<(), Box<dyn Error + Send + Sync>>;
}
