use crate::device_display::interface::{DeviceDisplay, Key, Window};
use crate::library::overlay::Overlay;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use image::RgbImage;
use std::error::Error;
use std::time::Duration;

/// Terminal stand-in for the windows: prints overlay text, reads keys raw.
pub struct DeviceDisplayConsole {
    last_shown: Option<(Window, Vec<String>)>,
}

impl DeviceDisplayConsole {
    pub fn new() -> Self {
        Self { last_shown: None }
    }

    fn render_display(window: Window, texts: &[String]) {
        println!("┌─ {} ─", window.title());
        for text in texts {
            println!("│ {}", text);
        }
        println!("└─");
    }
}

fn to_key(code: KeyCode, modifiers: KeyModifiers) -> Key {
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Key::Quit,
        KeyCode::Char(c) => Key::from_char(c),
        _ => Key::Other,
    }
}

fn read_key(timeout: Option<Duration>) -> Result<Option<Key>, std::io::Error> {
    loop {
        if let Some(timeout) = timeout {
            if !event::poll(timeout)? {
                return Ok(None);
            }
        }
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(Some(to_key(key.code, key.modifiers)));
            }
        }
        if timeout.is_some() {
            return Ok(None);
        }
    }
}

impl DeviceDisplay for DeviceDisplayConsole {
    fn show(
        &mut self,
        window: Window,
        _image: &RgbImage,
        overlay: &Overlay,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let texts: Vec<String> = overlay.texts().into_iter().map(String::from).collect();
        let shown = (window, texts);
        if self.last_shown.as_ref() != Some(&shown) {
            Self::render_display(shown.0, &shown.1);
            self.last_shown = Some(shown);
        }
        Ok(())
    }

    fn wait_key(
        &mut self,
        timeout: Option<Duration>,
    ) -> Result<Option<Key>, Box<dyn Error + Send + Sync>> {
        enable_raw_mode()?;
        let key = read_key(timeout);
        disable_raw_mode()?;
        Ok(key?)
    }

    fn close(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.last_shown = None;
        disable_raw_mode()?;
        Ok(())
    }
}
