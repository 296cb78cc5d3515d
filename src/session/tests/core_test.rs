use crate::cli::Mode;
use crate::config::Config;
use crate::device_display::interface::Key;
use crate::image_classifier::interface::Prediction;
use crate::leaf_gate::tests::{frame_with_green_fraction, frame_with_green_pixels};
use crate::result_store::ResultStoreError;
use crate::session::core::{
    init, transition, Effect, Event, Exit, SessionContext, State, CAMERA_UNAVAILABLE,
    IMAGE_NOT_FOUND, LIVE_HELP, NO_LEAF_IMAGE, NO_LEAF_LIVE,
};
use std::path::PathBuf;
use std::time::Duration;

fn webcam() -> SessionContext {
    SessionContext::new(Config::default(), Mode::Webcam)
}

fn single_image() -> SessionContext {
    SessionContext::new(
        Config::default(),
        Mode::SingleImage {
            path: PathBuf::from("leaf.jpg"),
        },
    )
}

fn awaiting(frame: crate::frame::Frame) -> State {
    State::AwaitingInput { frame: Some(frame) }
}

fn has_classify(effects: &[Effect]) -> bool {
    effects.iter().any(|e| matches!(e, Effect::Classify { .. }))
}

#[test]
fn test_init() {
    assert_eq!(init(&Mode::Webcam), (State::Idle, vec![Effect::OpenCamera]));
    assert_eq!(
        init(&single_image().mode),
        (
            State::Idle,
            vec![Effect::LoadImage {
                path: PathBuf::from("leaf.jpg")
            }]
        )
    );
}

#[test]
fn test_camera_open_flow() {
    let ctx = webcam();

    let (state, effects) = transition(&ctx, State::Idle, Event::CameraOpenDone(Ok(())));
    assert_eq!(state, State::AwaitingInput { frame: None });
    assert_eq!(
        effects,
        vec![
            Effect::Notify {
                message: LIVE_HELP.to_string()
            },
            Effect::CaptureFrame
        ]
    );

    let frame = frame_with_green_fraction(0.5);
    let (state, effects) = transition(&ctx, state, Event::FrameCaptured(Ok(frame.clone())));
    assert_eq!(state, awaiting(frame.clone()));
    assert_eq!(effects, vec![Effect::ShowPreview { frame }, Effect::PollKey]);
}

#[test]
fn test_camera_open_failure() {
    let (state, effects) = transition(
        &webcam(),
        State::Idle,
        Event::CameraOpenDone(Err("busy".into())),
    );

    assert_eq!(
        state,
        State::Terminated {
            exit: Exit::CameraUnavailable
        }
    );
    assert!(effects.contains(&Effect::Notify {
        message: CAMERA_UNAVAILABLE.to_string()
    }));
}

#[test]
fn test_idle_keys_keep_the_preview_running() {
    let ctx = webcam();
    let frame = frame_with_green_fraction(0.5);

    for key in [None, Some(Key::Other)] {
        let (state, effects) = transition(&ctx, awaiting(frame.clone()), Event::KeyPolled(Ok(key)));
        assert_eq!(state, State::AwaitingInput { frame: None });
        assert_eq!(effects, vec![Effect::CaptureFrame]);
    }
}

#[test]
fn test_analyze_without_frame_captures_again() {
    let (state, effects) = transition(
        &webcam(),
        State::AwaitingInput { frame: None },
        Event::KeyPolled(Ok(Some(Key::Analyze))),
    );

    assert_eq!(state, State::AwaitingInput { frame: None });
    assert_eq!(effects, vec![Effect::CaptureFrame]);
}

#[test]
fn test_quit_or_closed_display_terminates() {
    for key in [Key::Quit, Key::Closed] {
        let (state, effects) = transition(
            &webcam(),
            awaiting(frame_with_green_pixels(0)),
            Event::KeyPolled(Ok(Some(key))),
        );

        assert_eq!(state, State::Terminated { exit: Exit::Quit });
        assert!(effects.is_empty());
    }
}

#[test]
fn test_key_read_failure_terminates() {
    let (state, _) = transition(
        &webcam(),
        awaiting(frame_with_green_pixels(0)),
        Event::KeyPolled(Err("window gone".into())),
    );

    assert_eq!(
        state,
        State::Terminated {
            exit: Exit::DisplayLost
        }
    );
}

#[test]
fn test_analyze_leaf_starts_classification() {
    let frame = frame_with_green_fraction(0.5);

    let (state, effects) = transition(
        &webcam(),
        awaiting(frame.clone()),
        Event::KeyPolled(Ok(Some(Key::Analyze))),
    );

    assert_eq!(state, State::Analyzing { frame: frame.clone() });
    assert_eq!(effects.last(), Some(&Effect::Classify { frame }));
}

#[test]
fn test_analyze_bare_frame_is_rejected() {
    let (state, effects) = transition(
        &webcam(),
        awaiting(frame_with_green_fraction(0.05)),
        Event::KeyPolled(Ok(Some(Key::Analyze))),
    );

    assert_eq!(state, State::AwaitingInput { frame: None });
    assert!(!has_classify(&effects));
    assert!(effects.contains(&Effect::Announce {
        message: NO_LEAF_LIVE.to_string()
    }));
    assert_eq!(effects.last(), Some(&Effect::CaptureFrame));
}

#[test]
fn test_gate_threshold_is_inclusive() {
    let ctx = webcam();
    // 20% of 640x480 is 61440 pixels.
    let (state, _) = transition(
        &ctx,
        awaiting(frame_with_green_pixels(61_440)),
        Event::KeyPolled(Ok(Some(Key::Analyze))),
    );
    assert!(matches!(state, State::Analyzing { .. }));

    let (state, effects) = transition(
        &ctx,
        awaiting(frame_with_green_pixels(61_439)),
        Event::KeyPolled(Ok(Some(Key::Analyze))),
    );
    assert_eq!(state, State::AwaitingInput { frame: None });
    assert!(!has_classify(&effects));
}

#[test]
fn test_classification_result_effects_in_order() {
    let frame = frame_with_green_fraction(0.5);
    let predictions = vec![
        Prediction::new("Potato___Early_blight", 0.7),
        Prediction::new("Potato___healthy", 0.2),
    ];

    let (state, effects) = transition(
        &webcam(),
        State::Analyzing { frame },
        Event::ClassifyDone(Ok(predictions)),
    );

    match state {
        State::Displaying { verdict } => {
            assert_eq!(verdict.label, "Potato___Early_blight");
            assert!(!verdict.is_healthy);
        }
        state => panic!("Unexpected state {:?}", state.to_display_string()),
    }
    assert_eq!(effects.len(), 4);
    assert_eq!(
        effects[0],
        Effect::Announce {
            message: "Disease: Potato___Early_blight, 70.0% confidence".to_string()
        }
    );
    assert!(matches!(effects[1], Effect::SaveResult { .. }));
    assert!(matches!(effects[2], Effect::ShowResult { .. }));
    assert_eq!(
        effects[3],
        Effect::HoldResult {
            duration: Duration::from_secs(3)
        }
    );
}

#[test]
fn test_single_image_result_waits_for_dismissal() {
    let (_, effects) = transition(
        &single_image(),
        State::Analyzing {
            frame: frame_with_green_fraction(0.5),
        },
        Event::ClassifyDone(Ok(vec![Prediction::new("Tomato___healthy", 0.9)])),
    );

    assert_eq!(effects.last(), Some(&Effect::WaitDismiss));
}

#[test]
fn test_empty_predictions_are_a_classification_failure() {
    let frame = frame_with_green_fraction(0.5);

    let (state, effects) = transition(
        &webcam(),
        State::Analyzing {
            frame: frame.clone(),
        },
        Event::ClassifyDone(Ok(vec![])),
    );
    assert_eq!(state, State::AwaitingInput { frame: None });
    assert_eq!(effects.last(), Some(&Effect::CaptureFrame));

    let (state, _) = transition(
        &single_image(),
        State::Analyzing { frame },
        Event::ClassifyDone(Err("tensor shape".into())),
    );
    assert_eq!(
        state,
        State::Terminated {
            exit: Exit::ClassificationFailed
        }
    );
}

#[test]
fn test_save_outcome_is_reported_only() {
    let displaying = State::Displaying {
        verdict: crate::verdict::Verdict {
            label: "Tomato___healthy".to_string(),
            confidence_percent: 90.0,
            is_healthy: true,
        },
    };

    let (state, effects) = transition(
        &webcam(),
        displaying.clone(),
        Event::SaveDone(Ok(PathBuf::from("detections/20240102_030405.png"))),
    );
    assert_eq!(state, displaying);
    assert_eq!(
        effects,
        vec![Effect::Notify {
            message: "Saved result: detections/20240102_030405.png".to_string()
        }]
    );

    let failure = ResultStoreError::CreateDir {
        path: PathBuf::from("/readonly"),
        source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
    };
    let (state, effects) = transition(&webcam(), displaying.clone(), Event::SaveDone(Err(failure)));
    assert_eq!(state, displaying);
    assert_eq!(effects.len(), 1);
}

#[test]
fn test_hold_done() {
    let displaying = State::Displaying {
        verdict: crate::verdict::Verdict {
            label: "Tomato___healthy".to_string(),
            confidence_percent: 90.0,
            is_healthy: true,
        },
    };

    let (state, effects) = transition(
        &webcam(),
        displaying.clone(),
        Event::HoldDone {
            quit_requested: false,
        },
    );
    assert_eq!(state, State::AwaitingInput { frame: None });
    assert_eq!(effects, vec![Effect::CaptureFrame]);

    let (state, effects) = transition(
        &webcam(),
        displaying,
        Event::HoldDone {
            quit_requested: true,
        },
    );
    assert_eq!(state, State::Terminated { exit: Exit::Quit });
    assert!(effects.is_empty());
}

#[test]
fn test_single_image_flow() {
    let ctx = single_image();

    let (state, effects) = transition(
        &ctx,
        State::Idle,
        Event::ImageLoadDone(Ok(frame_with_green_pixels(0))),
    );
    assert_eq!(state, State::Terminated { exit: Exit::NoLeaf });
    assert!(effects.contains(&Effect::Announce {
        message: NO_LEAF_IMAGE.to_string()
    }));

    let (state, effects) = transition(
        &ctx,
        State::Idle,
        Event::ImageLoadDone(Err("no such file".into())),
    );
    assert_eq!(
        state,
        State::Terminated {
            exit: Exit::ImageUnreadable
        }
    );
    assert!(effects.contains(&Effect::Notify {
        message: IMAGE_NOT_FOUND.to_string()
    }));

    let (state, _) = transition(
        &ctx,
        State::Displaying {
            verdict: crate::verdict::Verdict {
                label: "Tomato___healthy".to_string(),
                confidence_percent: 90.0,
                is_healthy: true,
            },
        },
        Event::Dismissed,
    );
    assert_eq!(
        state,
        State::Terminated {
            exit: Exit::Completed
        }
    );
}

#[test]
fn test_unexpected_events_are_ignored() {
    let (state, effects) = transition(&webcam(), State::Idle, Event::Dismissed);
    assert_eq!(state, State::Idle);
    assert!(effects.is_empty());

    let terminated = State::Terminated { exit: Exit::Quit };
    let (state, effects) = transition(
        &webcam(),
        terminated.clone(),
        Event::FrameCaptured(Ok(frame_with_green_pixels(0))),
    );
    assert_eq!(state, terminated);
    assert!(effects.is_empty());
}
