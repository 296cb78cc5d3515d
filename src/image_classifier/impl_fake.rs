use crate::image_classifier::interface::{ImageClassifier, Prediction};
use image::RgbImage;
use rand::distr::{Distribution, Uniform};
use std::sync::atomic::{AtomicUsize, Ordering};

const PLANT_LABELS: [&str; 8] = [
    "Tomato___healthy",
    "Tomato___Early_blight",
    "Tomato___Late_blight",
    "Potato___healthy",
    "Potato___Early_blight",
    "Apple___Apple_scab",
    "Corn___Common_rust",
    "Grape___Black_rot",
];

enum Script {
    Random,
    #[cfg(test)]
    Fixed(Vec<Prediction>),
    #[cfg(test)]
    Failing(String),
}

pub struct ImageClassifierFake {
    script: Script,
    calls: AtomicUsize,
}

impl ImageClassifierFake {
    /// Random labels and scores, for running without a model.
    pub fn random() -> Self {
        Self::with_script(Script::Random)
    }

    #[cfg(test)]
    pub fn fixed(predictions: Vec<Prediction>) -> Self {
        Self::with_script(Script::Fixed(predictions))
    }

    #[cfg(test)]
    pub fn failing(message: &str) -> Self {
        Self::with_script(Script::Failing(message.to_string()))
    }

    fn with_script(script: Script) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
        }
    }

    #[cfg(test)]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn random_predictions(
        top_k: usize,
    ) -> Result<Vec<Prediction>, Box<dyn std::error::Error + Send + Sync>> {
        let mut rng = rand::rng();
        let index_dist = Uniform::new(0, PLANT_LABELS.len())?;
        let score_dist = Uniform::new(0.0f32, 1.0f32)?;

        let mut predictions: Vec<Prediction> = (0..top_k)
            .map(|_| Prediction {
                label: PLANT_LABELS[index_dist.sample(&mut rng)].to_string(),
                score: score_dist.sample(&mut rng),
            })
            .collect();
        predictions.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Ok(predictions)
    }
}

impl ImageClassifier for ImageClassifierFake {
    fn classify(
        &self,
        _image: &RgbImage,
        top_k: usize,
    ) -> Result<Vec<Prediction>, Box<dyn std::error::Error + Send + Sync>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.script {
            Script::Random => Self::random_predictions(top_k),
            #[cfg(test)]
            Script::Fixed(predictions) => Ok(predictions.iter().take(top_k).cloned().collect()),
            #[cfg(test)]
            Script::Failing(message) => Err(message.clone().into()),
        }
    }
}
