use image::RgbImage;

/// One ranked classifier output. `score` lies in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub score: f32,
}

#[cfg(test)]
impl Prediction {
    pub fn new(label: &str, score: f32) -> Self {
        Self {
            label: label.to_string(),
            score,
        }
    }
}

pub trait ImageClassifier {
    /// Returns at most `top_k` predictions, highest score first.
    fn classify(
        &self,
        image: &RgbImage,
        top_k: usize,
    ) -> Result<Vec<Prediction>, Box<dyn std::error::Error + Send + Sync>>;
}
