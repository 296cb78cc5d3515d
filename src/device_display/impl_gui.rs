use crate::device_display::interface::{DeviceDisplay, Key, Window};
use crate::library::overlay::Overlay;
use eframe::egui;
use image::RgbImage;
use std::error::Error;
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

#[derive(Default)]
struct Screen {
    current: Option<(Window, egui::ColorImage)>,
    version: u64,
    closed: bool,
}

fn lock(screen: &Mutex<Screen>) -> MutexGuard<'_, Screen> {
    match screen.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// The eframe side of the GUI display. Must run on the main thread.
pub struct DisplayWindow {
    screen: Arc<Mutex<Screen>>,
    keys: Sender<Key>,
    texture: Option<egui::TextureHandle>,
    title: &'static str,
    seen_version: u64,
}

impl DisplayWindow {
    fn forward_keys(&self, ctx: &egui::Context) {
        let (pressed, close_requested) = ctx.input(|input| {
            let pressed: Vec<Key> = input
                .events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Key {
                        key,
                        pressed: true,
                        repeat: false,
                        ..
                    } => Some(match key {
                        egui::Key::Space => Key::Analyze,
                        egui::Key::Q => Key::Quit,
                        _ => Key::Other,
                    }),
                    _ => None,
                })
                .collect();
            (pressed, input.viewport().close_requested())
        });

        for key in pressed {
            let _ = self.keys.send(key);
        }
        if close_requested {
            lock(&self.screen).closed = true;
            let _ = self.keys.send(Key::Closed);
        }
    }
}

impl eframe::App for DisplayWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.forward_keys(ctx);

        {
            let mut screen = lock(&self.screen);
            if screen.closed {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
            if screen.version != self.seen_version {
                self.seen_version = screen.version;
                if let Some((window, image)) = screen.current.take() {
                    self.title = window.title();
                    match &mut self.texture {
                        Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
                        None => {
                            self.texture =
                                Some(ctx.load_texture("frame", image, egui::TextureOptions::LINEAR))
                        }
                    }
                }
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(self.title);
            match &self.texture {
                Some(texture) => {
                    ui.add(egui::Image::from_texture(
                        egui::load::SizedTexture::from_handle(texture),
                    ));
                }
                None => {
                    ui.label("Waiting for camera...");
                }
            }
        });

        ctx.request_repaint_after(Duration::from_millis(16));
    }
}

/// The session side of the GUI display.
pub struct DeviceDisplayGui {
    screen: Arc<Mutex<Screen>>,
    keys: Mutex<Receiver<Key>>,
}

impl DeviceDisplayGui {
    pub fn new() -> (Self, DisplayWindow) {
        let screen = Arc::new(Mutex::new(Screen::default()));
        let (key_sender, key_receiver) = channel();

        let display = Self {
            screen: screen.clone(),
            keys: Mutex::new(key_receiver),
        };
        let window = DisplayWindow {
            screen,
            keys: key_sender,
            texture: None,
            title: Window::Live.title(),
            seen_version: 0,
        };
        (display, window)
    }
}

/// Runs the window until it is closed by the user or by [`DeviceDisplay::close`].
pub fn run_window(window: DisplayWindow) -> Result<(), Box<dyn Error + Send + Sync>> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([660.0, 540.0])
            .with_resizable(false),
        ..Default::default()
    };

    eframe::run_native(
        "Leaf Disease Detector",
        options,
        Box::new(|_cc| Box::new(window)),
    )
    .map_err(|e| e.to_string().into())
}

impl DeviceDisplay for DeviceDisplayGui {
    fn show(
        &mut self,
        window: Window,
        image: &RgbImage,
        _overlay: &Overlay,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let size = [image.width() as usize, image.height() as usize];
        let color_image = egui::ColorImage::from_rgb(size, image.as_raw());

        let mut screen = lock(&self.screen);
        if screen.closed {
            return Err("display window closed".into());
        }
        screen.current = Some((window, color_image));
        screen.version += 1;
        Ok(())
    }

    fn wait_key(
        &mut self,
        timeout: Option<Duration>,
    ) -> Result<Option<Key>, Box<dyn Error + Send + Sync>> {
        if lock(&self.screen).closed {
            return Ok(Some(Key::Closed));
        }

        let keys = match self.keys.lock() {
            Ok(keys) => keys,
            Err(poisoned) => poisoned.into_inner(),
        };

        let key = match timeout {
            Some(timeout) => match keys.recv_timeout(timeout) {
                Ok(key) => Some(key),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => Some(Key::Closed),
            },
            None => Some(keys.recv().unwrap_or(Key::Closed)),
        };
        Ok(key)
    }

    fn close(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        lock(&self.screen).closed = true;
        Ok(())
    }
}
