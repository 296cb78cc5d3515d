use config::{ClassifierKind, Config, DisplayKind};
use device_camera::impl_ffmpeg::DeviceCameraFfmpeg;
use device_display::impl_console::DeviceDisplayConsole;
use device_display::impl_gui::{run_window, DeviceDisplayGui};
use device_display::interface::DeviceDisplay;
use device_speaker::impl_command::DeviceSpeakerCommand;
use image_classifier::impl_fake::ImageClassifierFake;
use image_classifier::impl_tract::ImageClassifierTract;
use image_classifier::interface::ImageClassifier;
use library::logger::{impl_console::LoggerConsole, interface::Logger};
use session::core::{Exit, SessionContext};
use session::main::Session;
use std::error::Error;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

mod cli;
mod config;
mod device_camera;
mod device_display;
mod device_speaker;
mod frame;
mod image_classifier;
mod leaf_gate;
mod library;
mod result_renderer;
mod result_store;
mod session;
mod verdict;

type BoxError = Box<dyn Error + Send + Sync>;

fn main() -> ExitCode {
    match run() {
        Ok(Some(exit)) if !exit.is_failure() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            println!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_classifier(
    config: &Config,
    logger: &Arc<dyn Logger + Send + Sync>,
) -> Result<Arc<dyn ImageClassifier + Send + Sync>, BoxError> {
    match config.classifier {
        ClassifierKind::Onnx => Ok(Arc::new(ImageClassifierTract::new(
            config.model.clone(),
            logger.clone(),
        )?)),
        ClassifierKind::Fake => Ok(Arc::new(ImageClassifierFake::random())),
    }
}

/// `None` when no session was started.
fn run() -> Result<Option<Exit>, BoxError> {
    let config = Config::from_env()?;
    let logger: Arc<dyn Logger + Send + Sync> = Arc::new(LoggerConsole::new());

    println!("Loading AI model... Please wait...");
    let image_classifier = load_classifier(&config, &logger)?;
    println!("Model loaded successfully!");

    let mode = {
        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        let mut output = std::io::stdout();
        cli::ask_mode(&mut input, &mut output)?
    };
    let Some(mode) = mode else {
        println!("{}", cli::INVALID_CHOICE);
        return Ok(None);
    };

    let device_camera = Arc::new(DeviceCameraFfmpeg::new(config.camera.clone(), logger.clone()));
    let device_speaker = Arc::new(DeviceSpeakerCommand::new(config.speech_rate, logger.clone()));
    let ctx = SessionContext::new(config.clone(), mode);

    let session = |device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>| {
        Session::new(
            ctx.clone(),
            logger.clone(),
            device_camera.clone(),
            device_display,
            device_speaker.clone(),
            image_classifier.clone(),
        )
    };

    match config.display {
        DisplayKind::Console => {
            let display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>> =
                Arc::new(Mutex::new(DeviceDisplayConsole::new()));
            Ok(Some(session(display).run()))
        }
        DisplayKind::Gui => {
            // The window owns the main thread; the session drives it from a worker.
            let (display, window) = DeviceDisplayGui::new();
            let display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>> =
                Arc::new(Mutex::new(display));
            let session = session(display);
            let worker = std::thread::spawn(move || session.run());

            let window_result = run_window(window);
            let exit = worker
                .join()
                .map_err(|_| -> BoxError { "session thread panicked".into() })?;
            window_result?;
            Ok(Some(exit))
        }
    }
}
