use image::{imageops, RgbImage};
use tract_onnx::prelude::*;

/// Scales the shorter side to `shortest_edge`, then center-crops to `width` x `height`.
pub fn resize_image(image: &RgbImage, shortest_edge: u32, width: u32, height: u32) -> RgbImage {
    let (w, h) = (image.width() as f32, image.height() as f32);
    let scale = (shortest_edge as f32 / w.min(h))
        .max(width as f32 / w)
        .max(height as f32 / h);
    let new_w = ((w * scale).round() as u32).max(width);
    let new_h = ((h * scale).round() as u32).max(height);

    let scaled = imageops::resize(image, new_w, new_h, imageops::FilterType::Triangle);

    let x_offset = (new_w - width) / 2;
    let y_offset = (new_h - height) / 2;

    imageops::crop_imm(&scaled, x_offset, y_offset, width, height).to_image()
}

fn image_to_tensor(image: &RgbImage, mean: [f32; 3], std: [f32; 3]) -> Tensor {
    let (width, height) = image.dimensions();
    tract_ndarray::Array4::from_shape_fn(
        (1, 3, height as usize, width as usize),
        |(_, c, y, x)| {
            let pixel = image.get_pixel(x as u32, y as u32);
            (pixel[c] as f32 / 255.0 - mean[c]) / std[c]
        },
    )
    .into_tensor()
}

pub fn resize_image_to_tensor(
    image: &RgbImage,
    shortest_edge: u32,
    width: u32,
    height: u32,
    mean: [f32; 3],
    std: [f32; 3],
) -> Result<Tensor, Box<dyn std::error::Error + Send + Sync>> {
    if image.width() == 0 || image.height() == 0 {
        return Err("cannot classify an empty image".into());
    }
    let resized = resize_image(image, shortest_edge, width, height);
    Ok(image_to_tensor(&resized, mean, std))
}
