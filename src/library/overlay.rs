use crate::library::bitmap_font::{is_lit, GLYPH_ADVANCE, GLYPH_HEIGHT, GLYPH_WIDTH};
use image::{Rgb, RgbImage};

pub const GREEN: Rgb<u8> = Rgb([0, 255, 0]);
pub const RED: Rgb<u8> = Rgb([255, 0, 0]);
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// One line of text anchored at its baseline-left `origin`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub origin: (i32, i32),
    pub scale: f32,
    pub color: Rgb<u8>,
    pub thickness: u32,
}

impl TextLine {
    /// Side of one glyph cell in pixels.
    pub fn cell_size(&self) -> u32 {
        ((self.scale * 3.0).round() as u32).max(1)
    }

    pub fn paint(&self, image: &mut RgbImage) {
        let cell = self.cell_size() as i64;
        let stroke = self.thickness.saturating_sub(1) as i64;
        let (origin_x, origin_y) = (self.origin.0 as i64, self.origin.1 as i64);
        let top = origin_y - GLYPH_HEIGHT as i64 * cell;

        for (index, c) in self.text.chars().enumerate() {
            let left = origin_x + index as i64 * GLYPH_ADVANCE as i64 * cell;
            for row in 0..GLYPH_HEIGHT {
                for column in 0..GLYPH_WIDTH {
                    if !is_lit(c, column, row) {
                        continue;
                    }
                    let x0 = left + column as i64 * cell;
                    let y0 = top + row as i64 * cell;
                    fill_rect(image, x0, y0, cell + stroke, cell + stroke, self.color);
                }
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    pub lines: Vec<TextLine>,
}

impl Overlay {
    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|line| line.text.as_str()).collect()
    }

    pub fn paint(&self, image: &mut RgbImage) {
        for line in &self.lines {
            line.paint(image);
        }
    }
}

fn fill_rect(image: &mut RgbImage, x: i64, y: i64, width: i64, height: i64, color: Rgb<u8>) {
    let (image_width, image_height) = (image.width() as i64, image.height() as i64);
    let x_start = x.max(0);
    let y_start = y.max(0);
    let x_end = (x + width).min(image_width);
    let y_end = (y + height).min(image_height);

    for yy in y_start..y_end {
        for xx in x_start..x_end {
            image.put_pixel(xx as u32, yy as u32, color);
        }
    }
}
