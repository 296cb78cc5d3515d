use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub onnx_model_path: PathBuf,
    /// One label per line, in model output order.
    pub labels_path: PathBuf,
    /// Shorter image side before the center crop to `input_shape`.
    pub resize_shortest_edge: u32,
    pub input_shape: (u32, u32),
    pub mean: [f32; 3],
    pub std: [f32; 3],
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            onnx_model_path: PathBuf::from("models/plant_disease_mobilenet_v2.onnx"),
            labels_path: PathBuf::from("models/labels.txt"),
            resize_shortest_edge: 256,
            input_shape: (224, 224),
            mean: [0.5, 0.5, 0.5],
            std: [0.5, 0.5, 0.5],
        }
    }
}
