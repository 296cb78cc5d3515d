use crate::cli::Mode;
use crate::config::Config;
use crate::device_display::interface::Key;
use crate::frame::Frame;
use crate::image_classifier::interface::Prediction;
use crate::leaf_gate::LeafGate;
use crate::result_renderer::{self, AnnotatedResult};
use crate::result_store::ResultStoreError;
use crate::verdict::Verdict;
use std::path::PathBuf;
use std::time::Duration;

pub const LIVE_HELP: &str = "Press SPACE to analyze, q to quit";
pub const NO_LEAF_LIVE: &str = "No leaf detected. Please position a leaf in view.";
pub const NO_LEAF_IMAGE: &str = "No leaf detected in image.";
pub const CAMERA_UNAVAILABLE: &str = "Error: Cannot open camera";
pub const IMAGE_NOT_FOUND: &str = "Error: Image not found";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Everything a transition needs besides the state itself.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub config: Config,
    pub mode: Mode,
}

impl SessionContext {
    pub fn new(config: Config, mode: Mode) -> Self {
        Self { config, mode }
    }

    fn is_webcam(&self) -> bool {
        matches!(self.mode, Mode::Webcam)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Quit,
    Completed,
    NoLeaf,
    CameraUnavailable,
    CameraLost,
    ImageUnreadable,
    ClassificationFailed,
    DisplayLost,
    Stalled,
}

impl Exit {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Exit::CameraUnavailable
                | Exit::CameraLost
                | Exit::ImageUnreadable
                | Exit::ClassificationFailed
                | Exit::DisplayLost
                | Exit::Stalled
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum State {
    Idle,
    AwaitingInput { frame: Option<Frame> },
    Analyzing { frame: Frame },
    Displaying { verdict: Verdict },
    Terminated { exit: Exit },
}

impl State {
    pub fn to_display_string(&self) -> String {
        match self {
            State::Idle => "Idle".to_string(),
            State::AwaitingInput { frame } => {
                format!("AwaitingInput {{ frame: {} }}", frame.is_some())
            }
            State::Analyzing { .. } => "Analyzing".to_string(),
            State::Displaying { verdict } => format!("Displaying {{ verdict: {:?} }}", verdict),
            State::Terminated { exit } => format!("Terminated {{ exit: {:?} }}", exit),
        }
    }
}

#[derive(Debug)]
pub enum Event {
    CameraOpenDone(Result<(), BoxError>),
    FrameCaptured(Result<Frame, BoxError>),
    ImageLoadDone(Result<Frame, BoxError>),
    KeyPolled(Result<Option<Key>, BoxError>),
    ClassifyDone(Result<Vec<Prediction>, BoxError>),
    SaveDone(Result<PathBuf, ResultStoreError>),
    HoldDone { quit_requested: bool },
    Dismissed,
}

impl Event {
    pub fn to_display_string(&self) -> String {
        match self {
            Event::FrameCaptured(Ok(_)) => "FrameCaptured(Ok(..))".to_string(),
            Event::ImageLoadDone(Ok(_)) => "ImageLoadDone(Ok(..))".to_string(),
            event => format!("{:?}", event),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    OpenCamera,
    CaptureFrame,
    LoadImage { path: PathBuf },
    ShowPreview { frame: Frame },
    PollKey,
    Classify { frame: Frame },
    /// Printed and spoken.
    Announce { message: String },
    /// Printed only.
    Notify { message: String },
    Log { message: String },
    SaveResult { image: Frame },
    ShowResult { result: AnnotatedResult },
    HoldResult { duration: Duration },
    WaitDismiss,
}

impl Effect {
    pub fn to_display_string(&self) -> String {
        match self {
            Effect::ShowPreview { .. } => "ShowPreview".to_string(),
            Effect::Classify { .. } => "Classify".to_string(),
            Effect::SaveResult { .. } => "SaveResult".to_string(),
            Effect::ShowResult { result } => format!("ShowResult {:?}", result.overlay.texts()),
            effect => format!("{:?}", effect),
        }
    }
}

pub fn init(mode: &Mode) -> (State, Vec<Effect>) {
    match mode {
        Mode::Webcam => (State::Idle, vec![Effect::OpenCamera]),
        Mode::SingleImage { path } => (State::Idle, vec![Effect::LoadImage { path: path.clone() }]),
    }
}

fn terminate(exit: Exit, effects: Vec<Effect>) -> (State, Vec<Effect>) {
    (State::Terminated { exit }, effects)
}

/// Back to the live preview in webcam mode; otherwise the session ends with `exit`.
fn end_cycle(ctx: &SessionContext, exit: Exit, mut effects: Vec<Effect>) -> (State, Vec<Effect>) {
    if ctx.is_webcam() {
        effects.push(Effect::CaptureFrame);
        (State::AwaitingInput { frame: None }, effects)
    } else {
        terminate(exit, effects)
    }
}

/// Gate the frame; classify only when a leaf is plausibly present.
fn analyze(ctx: &SessionContext, frame: Frame) -> (State, Vec<Effect>) {
    let gate = LeafGate::new(ctx.config.leaf_gate.clone()).evaluate(&frame);
    let log = Effect::Log {
        message: format!("Leaf coverage {:.3}", gate.coverage_ratio),
    };

    if !gate.has_leaf {
        let message = if ctx.is_webcam() {
            NO_LEAF_LIVE
        } else {
            NO_LEAF_IMAGE
        };
        return end_cycle(
            ctx,
            Exit::NoLeaf,
            vec![
                log,
                Effect::Announce {
                    message: message.to_string(),
                },
            ],
        );
    }

    (
        State::Analyzing {
            frame: frame.clone(),
        },
        vec![log, Effect::Classify { frame }],
    )
}

fn report(ctx: &SessionContext, frame: &Frame, predictions: &[Prediction]) -> (State, Vec<Effect>) {
    let Some((result, verdict)) = result_renderer::render(frame, predictions) else {
        return end_cycle(
            ctx,
            Exit::ClassificationFailed,
            vec![Effect::Notify {
                message: "Error: Classifier returned no predictions".to_string(),
            }],
        );
    };

    let wait = if ctx.is_webcam() {
        Effect::HoldResult {
            duration: ctx.config.result_hold,
        }
    } else {
        Effect::WaitDismiss
    };

    (
        State::Displaying {
            verdict: verdict.clone(),
        },
        vec![
            Effect::Announce {
                message: verdict.message(),
            },
            Effect::SaveResult {
                image: result.image.clone(),
            },
            Effect::ShowResult { result },
            wait,
        ],
    )
}

pub fn transition(ctx: &SessionContext, state: State, event: Event) -> (State, Vec<Effect>) {
    match (state, event) {
        // Session setup
        (State::Idle, Event::CameraOpenDone(Ok(()))) => (
            State::AwaitingInput { frame: None },
            vec![
                Effect::Notify {
                    message: LIVE_HELP.to_string(),
                },
                Effect::CaptureFrame,
            ],
        ),
        (State::Idle, Event::CameraOpenDone(Err(e))) => terminate(
            Exit::CameraUnavailable,
            vec![
                Effect::Log {
                    message: format!("Camera open failed: {}", e),
                },
                Effect::Notify {
                    message: CAMERA_UNAVAILABLE.to_string(),
                },
            ],
        ),
        (State::Idle, Event::ImageLoadDone(Ok(frame))) => analyze(ctx, frame),
        (State::Idle, Event::ImageLoadDone(Err(e))) => terminate(
            Exit::ImageUnreadable,
            vec![
                Effect::Log {
                    message: format!("Image load failed: {}", e),
                },
                Effect::Notify {
                    message: IMAGE_NOT_FOUND.to_string(),
                },
            ],
        ),

        // Live preview
        (State::AwaitingInput { .. }, Event::FrameCaptured(Ok(frame))) => (
            State::AwaitingInput {
                frame: Some(frame.clone()),
            },
            vec![Effect::ShowPreview { frame }, Effect::PollKey],
        ),
        (State::AwaitingInput { .. }, Event::FrameCaptured(Err(e))) => terminate(
            Exit::CameraLost,
            vec![Effect::Notify {
                message: format!("Error: Cannot read frame from camera ({})", e),
            }],
        ),
        (State::AwaitingInput { frame }, Event::KeyPolled(Ok(key))) => match (key, frame) {
            (Some(Key::Quit | Key::Closed), _) => terminate(Exit::Quit, vec![]),
            (Some(Key::Analyze), Some(frame)) => analyze(ctx, frame),
            _ => (
                State::AwaitingInput { frame: None },
                vec![Effect::CaptureFrame],
            ),
        },
        (State::AwaitingInput { .. }, Event::KeyPolled(Err(e))) => terminate(
            Exit::DisplayLost,
            vec![Effect::Notify {
                message: format!("Error: Display unavailable ({})", e),
            }],
        ),

        // Classification
        (State::Analyzing { frame }, Event::ClassifyDone(Ok(predictions))) => {
            report(ctx, &frame, &predictions)
        }
        (State::Analyzing { .. }, Event::ClassifyDone(Err(e))) => end_cycle(
            ctx,
            Exit::ClassificationFailed,
            vec![Effect::Notify {
                message: format!("Error: Classification failed ({})", e),
            }],
        ),

        // Result view
        (State::Displaying { verdict }, Event::SaveDone(result)) => {
            let message = match result {
                Ok(path) => format!("Saved result: {}", path.display()),
                Err(e) => format!("Error: Could not save result ({})", e),
            };
            (
                State::Displaying { verdict },
                vec![Effect::Notify { message }],
            )
        }
        (State::Displaying { .. }, Event::HoldDone { quit_requested }) => {
            if quit_requested {
                terminate(Exit::Quit, vec![])
            } else {
                end_cycle(ctx, Exit::Completed, vec![])
            }
        }
        (State::Displaying { .. }, Event::Dismissed) => terminate(Exit::Completed, vec![]),

        (state, _) => (state, vec![]),
    }
}
