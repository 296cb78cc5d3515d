use crate::device_display::interface::{DeviceDisplay, Key, Window};
use crate::library::overlay::Overlay;
use image::RgbImage;
use std::collections::VecDeque;
use std::error::Error;
use std::time::Duration;

/// Display that replays scripted keys and records what it was asked to show.
///
/// Once the script runs out the display reads as closed.
#[derive(Debug, Default)]
pub struct DeviceDisplayFake {
    keys: VecDeque<Option<Key>>,
    pub shown: Vec<(Window, Vec<String>)>,
    pub waits: Vec<Option<Duration>>,
    pub closes: usize,
}

impl DeviceDisplayFake {
    pub fn new(keys: Vec<Option<Key>>) -> Self {
        Self {
            keys: keys.into(),
            ..Self::default()
        }
    }

    pub fn shown_in(&self, window: Window) -> Vec<&Vec<String>> {
        self.shown
            .iter()
            .filter(|(w, _)| *w == window)
            .map(|(_, texts)| texts)
            .collect()
    }
}

impl DeviceDisplay for DeviceDisplayFake {
    fn show(
        &mut self,
        window: Window,
        _image: &RgbImage,
        overlay: &Overlay,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let texts = overlay.texts().into_iter().map(String::from).collect();
        self.shown.push((window, texts));
        Ok(())
    }

    fn wait_key(
        &mut self,
        timeout: Option<Duration>,
    ) -> Result<Option<Key>, Box<dyn Error + Send + Sync>> {
        self.waits.push(timeout);
        Ok(self.keys.pop_front().unwrap_or(Some(Key::Closed)))
    }

    fn close(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.closes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result_renderer::live_overlay;

    #[test]
    fn test_replays_keys_then_reads_as_closed() {
        let mut display = DeviceDisplayFake::new(vec![Some(Key::Analyze), None]);

        assert_eq!(display.wait_key(None).unwrap(), Some(Key::Analyze));
        assert_eq!(display.wait_key(Some(Duration::ZERO)).unwrap(), None);
        assert_eq!(display.wait_key(Some(Duration::ZERO)).unwrap(), Some(Key::Closed));
        assert_eq!(display.waits, vec![None, Some(Duration::ZERO), Some(Duration::ZERO)]);
    }

    #[test]
    fn test_records_overlay_text_per_window() {
        let mut display = DeviceDisplayFake::default();
        display
            .show(Window::Live, &RgbImage::new(2, 2), &live_overlay())
            .unwrap();

        assert_eq!(
            display.shown_in(Window::Live),
            vec![&vec!["Press SPACE to analyze leaf".to_string()]]
        );
        assert!(display.shown_in(Window::Result).is_empty());
    }
}
