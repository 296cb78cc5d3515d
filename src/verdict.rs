use crate::image_classifier::interface::Prediction;

/// Outcome of one classification, derived from the top prediction only.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub label: String,
    pub confidence_percent: f32,
    pub is_healthy: bool,
}

impl Verdict {
    /// `None` when the classifier returned nothing to judge.
    pub fn build(predictions: &[Prediction]) -> Option<Verdict> {
        let top = predictions.first()?;
        Some(Verdict {
            label: top.label.clone(),
            confidence_percent: top.score * 100.0,
            is_healthy: top.label.to_lowercase().contains("healthy"),
        })
    }

    pub fn message(&self) -> String {
        if self.is_healthy {
            format!("Leaf healthy, {:.1}% confidence", self.confidence_percent)
        } else {
            format!(
                "Disease: {}, {:.1}% confidence",
                self.label, self.confidence_percent
            )
        }
    }
}
