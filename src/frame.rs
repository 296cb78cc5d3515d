use image::{imageops::FilterType, DynamicImage, RgbImage};

pub const FRAME_WIDTH: u32 = 640;
pub const FRAME_HEIGHT: u32 = 480;

/// A 640x480 RGB still owned by whichever step currently holds it.
pub type Frame = RgbImage;

/// Brings any captured or loaded image to the fixed frame size.
pub fn conform(image: DynamicImage) -> Frame {
    if image.width() == FRAME_WIDTH && image.height() == FRAME_HEIGHT {
        return image.into_rgb8();
    }
    image
        .resize_exact(FRAME_WIDTH, FRAME_HEIGHT, FilterType::Triangle)
        .into_rgb8()
}

pub fn load(path: &std::path::Path) -> Result<Frame, Box<dyn std::error::Error + Send + Sync>> {
    let image = image::open(path)?;
    Ok(conform(image))
}
