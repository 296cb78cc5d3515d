use crate::frame::Frame;
use crate::image_classifier::interface::Prediction;
use crate::library::overlay::{Overlay, TextLine, GREEN, RED, WHITE};
use crate::verdict::Verdict;

const LIVE_INSTRUCTION: &str = "Press SPACE to analyze leaf";
const RANKED_LINES: usize = 3;

/// A frame copy with the verdict painted on it. Lives for one cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedResult {
    pub image: Frame,
    pub overlay: Overlay,
}

/// Paints the verdict and ranked predictions onto a copy of `frame`.
///
/// Returns `None` for an empty prediction list; `frame` is never modified.
pub fn render(frame: &Frame, predictions: &[Prediction]) -> Option<(AnnotatedResult, Verdict)> {
    let verdict = Verdict::build(predictions)?;
    let overlay = result_overlay(&verdict, predictions);

    let mut image = frame.clone();
    overlay.paint(&mut image);

    Some((AnnotatedResult { image, overlay }, verdict))
}

pub fn result_overlay(verdict: &Verdict, predictions: &[Prediction]) -> Overlay {
    let color = if verdict.is_healthy { GREEN } else { RED };

    let mut lines = vec![
        TextLine {
            text: format!("Disease: {}", verdict.label),
            origin: (10, 30),
            scale: 0.7,
            color,
            thickness: 2,
        },
        TextLine {
            text: format!("Confidence: {:.1}%", verdict.confidence_percent),
            origin: (10, 60),
            scale: 0.6,
            color,
            thickness: 2,
        },
        TextLine {
            text: "Top 3 Predictions:".to_string(),
            origin: (10, 100),
            scale: 0.5,
            color: WHITE,
            thickness: 1,
        },
    ];

    let mut y = 100;
    for (rank, prediction) in predictions.iter().take(RANKED_LINES).enumerate() {
        y += 25;
        lines.push(TextLine {
            text: format!(
                "{}. {}: {:.1}%",
                rank + 1,
                prediction.label,
                prediction.score * 100.0
            ),
            origin: (10, y),
            scale: 0.4,
            color: WHITE,
            thickness: 1,
        });
    }

    Overlay { lines }
}

/// Static hint drawn over the live preview.
pub fn live_overlay() -> Overlay {
    Overlay {
        lines: vec![TextLine {
            text: LIVE_INSTRUCTION.to_string(),
            origin: (10, 30),
            scale: 0.7,
            color: GREEN,
            thickness: 2,
        }],
    }
}
