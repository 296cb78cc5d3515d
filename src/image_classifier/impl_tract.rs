use crate::image_classifier::interface::{ImageClassifier, Prediction};
use crate::image_classifier::models::model_config::ModelConfig;
use crate::image_classifier::tract::image::resize_image_to_tensor;
use crate::library::logger::interface::Logger;
use image::RgbImage;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tract_onnx::prelude::*;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("model file not found: {0}")]
    ModelMissing(PathBuf),
    #[error("labels file not found: {0}")]
    LabelsMissing(PathBuf),
    #[error("labels file {0} contains no labels")]
    LabelsEmpty(PathBuf),
    #[error("failed to read labels file {path}: {source}")]
    LabelsUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to load model {path}: {message}")]
    ModelLoad { path: PathBuf, message: String },
    #[error("model produced no scores")]
    EmptyOutput,
}

/// Plant disease classifier running an ONNX image-classification model with tract.
pub struct ImageClassifierTract {
    model: TypedRunnableModel<TypedModel>,
    labels: Vec<String>,
    config: ModelConfig,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageClassifierTract {
    pub fn new(
        config: ModelConfig,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self, ClassifierError> {
        let logger = logger.with_namespace("classifier").with_namespace("tract");

        if !config.onnx_model_path.exists() {
            return Err(ClassifierError::ModelMissing(config.onnx_model_path));
        }
        if !config.labels_path.exists() {
            return Err(ClassifierError::LabelsMissing(config.labels_path));
        }

        let labels = read_labels(&config.labels_path)?;

        let (width, height) = config.input_shape;
        let model = tract_onnx::onnx()
            .model_for_path(&config.onnx_model_path)
            .and_then(|model| {
                model.with_input_fact(
                    0,
                    f32::fact([1, 3, height as usize, width as usize]).into(),
                )
            })
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| ClassifierError::ModelLoad {
                path: config.onnx_model_path.clone(),
                message: e.to_string(),
            })?;

        let _ = logger.info(&format!(
            "Loaded {} with {} labels",
            config.onnx_model_path.display(),
            labels.len()
        ));

        Ok(Self {
            model,
            labels,
            config,
            logger,
        })
    }

    fn label_for(&self, index: usize) -> String {
        self.labels
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("class_{}", index))
    }
}

impl ImageClassifier for ImageClassifierTract {
    fn classify(
        &self,
        image: &RgbImage,
        top_k: usize,
    ) -> Result<Vec<Prediction>, Box<dyn std::error::Error + Send + Sync>> {
        let (width, height) = self.config.input_shape;
        let input = resize_image_to_tensor(
            image,
            self.config.resize_shortest_edge,
            width,
            height,
            self.config.mean,
            self.config.std,
        )?;

        let outputs = self.model.run(tvec!(input.into_tvalue()))?;
        let output = outputs[0].to_array_view::<f32>()?;
        let logits: Vec<f32> = output.iter().copied().collect();

        if logits.is_empty() {
            return Err(Box::new(ClassifierError::EmptyOutput));
        }

        let predictions = rank(&softmax(&logits), top_k)
            .into_iter()
            .map(|(index, score)| Prediction {
                label: self.label_for(index),
                score,
            })
            .collect::<Vec<_>>();

        let _ = self.logger.info(&format!("Predictions: {:?}", predictions));

        Ok(predictions)
    }
}

fn read_labels(path: &std::path::Path) -> Result<Vec<String>, ClassifierError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ClassifierError::LabelsUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let labels: Vec<String> = raw
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect();
    if labels.is_empty() {
        return Err(ClassifierError::LabelsEmpty(path.to_path_buf()));
    }
    Ok(labels)
}

fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum == 0.0 || !sum.is_finite() {
        return vec![0.0; logits.len()];
    }
    exps.into_iter().map(|x| x / sum).collect()
}

/// Indices and scores of the `top_k` highest scores, best first.
fn rank(scores: &[f32], top_k: usize) -> Vec<(usize, f32)> {
    let mut ranked: Vec<(usize, f32)> = scores.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(top_k);
    ranked
}
