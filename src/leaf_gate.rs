//! Cheap presence check run before any classification.

use crate::frame::Frame;
use image::Rgb;

#[derive(Debug, Clone, PartialEq)]
pub struct LeafGateConfig {
    /// Inclusive hue band on the 0-180 scale.
    pub hue_min: u8,
    pub hue_max: u8,
    pub saturation_min: u8,
    pub value_min: u8,
    pub min_coverage: f64,
}

impl Default for LeafGateConfig {
    fn default() -> Self {
        Self {
            hue_min: 35,
            hue_max: 85,
            saturation_min: 40,
            value_min: 40,
            min_coverage: 0.20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeafGateResult {
    /// Fraction of green-hued pixels, always within [0, 1].
    pub coverage_ratio: f64,
    pub has_leaf: bool,
}

#[derive(Debug, Clone, Default)]
pub struct LeafGate {
    config: LeafGateConfig,
}

impl LeafGate {
    pub fn new(config: LeafGateConfig) -> Self {
        Self { config }
    }

    pub fn evaluate(&self, frame: &Frame) -> LeafGateResult {
        let total = frame.width() as u64 * frame.height() as u64;
        if total == 0 {
            return LeafGateResult {
                coverage_ratio: 0.0,
                has_leaf: false,
            };
        }

        let green = frame.pixels().filter(|pixel| self.is_green(pixel)).count() as u64;
        let coverage_ratio = green as f64 / total as f64;

        LeafGateResult {
            coverage_ratio,
            has_leaf: coverage_ratio >= self.config.min_coverage,
        }
    }

    fn is_green(&self, pixel: &Rgb<u8>) -> bool {
        let (hue, saturation, value) = to_hsv(pixel);
        (self.config.hue_min..=self.config.hue_max).contains(&hue)
            && saturation >= self.config.saturation_min
            && value >= self.config.value_min
    }
}

/// 8-bit HSV with hue halved onto 0-180, matching the usual OpenCV layout.
pub fn to_hsv(pixel: &Rgb<u8>) -> (u8, u8, u8) {
    let [r, g, b] = pixel.0;
    let (r, g, b) = (r as f32, g as f32, b as f32);
    let value = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = value - min;

    let saturation = if value == 0.0 {
        0.0
    } else {
        255.0 * delta / value
    };

    let mut hue = if delta == 0.0 {
        0.0
    } else if value == r {
        60.0 * (g - b) / delta
    } else if value == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };
    if hue < 0.0 {
        hue += 360.0;
    }

    let hue = ((hue / 2.0).round() as u32 % 180) as u8;
    (hue, saturation.round() as u8, value as u8)
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::frame::{FRAME_HEIGHT, FRAME_WIDTH};
    use image::ImageBuffer;

    pub const LEAF_GREEN: Rgb<u8> = Rgb([34, 139, 34]);
    pub const SOIL_GRAY: Rgb<u8> = Rgb([128, 128, 128]);

    /// A full-size frame whose first `green_pixels` pixels (row-major) are leaf green.
    pub fn frame_with_green_pixels(green_pixels: u32) -> Frame {
        ImageBuffer::from_fn(FRAME_WIDTH, FRAME_HEIGHT, |x, y| {
            if y * FRAME_WIDTH + x < green_pixels {
                LEAF_GREEN
            } else {
                SOIL_GRAY
            }
        })
    }

    pub fn frame_with_green_fraction(fraction: f64) -> Frame {
        let total = (FRAME_WIDTH * FRAME_HEIGHT) as f64;
        frame_with_green_pixels((total * fraction).round() as u32)
    }

    #[test]
    fn test_hsv_of_primary_colors() {
        assert_eq!(to_hsv(&Rgb([0, 255, 0])), (60, 255, 255));
        assert_eq!(to_hsv(&Rgb([255, 0, 0])), (0, 255, 255));
        assert_eq!(to_hsv(&Rgb([0, 0, 255])), (120, 255, 255));
        assert_eq!(to_hsv(&Rgb([0, 0, 0])), (0, 0, 0));
        assert_eq!(to_hsv(&SOIL_GRAY), (0, 0, 128));
    }

    #[test]
    fn test_leaf_green_is_inside_the_band() {
        let (hue, saturation, value) = to_hsv(&LEAF_GREEN);
        assert_eq!(hue, 60);
        assert!(saturation >= 40);
        assert!(value >= 40);
    }

    #[test]
    fn test_quarter_green_frame_has_leaf() {
        let result = LeafGate::default().evaluate(&frame_with_green_fraction(0.25));
        assert!((result.coverage_ratio - 0.25).abs() < 1e-9);
        assert!(result.has_leaf);
    }

    #[test]
    fn test_tenth_green_frame_has_no_leaf() {
        let result = LeafGate::default().evaluate(&frame_with_green_fraction(0.10));
        assert!((result.coverage_ratio - 0.10).abs() < 1e-9);
        assert!(!result.has_leaf);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let gate = LeafGate::default();
        let exact = (FRAME_WIDTH * FRAME_HEIGHT) / 5;

        assert!(gate.evaluate(&frame_with_green_pixels(exact)).has_leaf);
        assert!(!gate.evaluate(&frame_with_green_pixels(exact - 1)).has_leaf);
    }

    #[test]
    fn test_black_frame_has_zero_coverage() {
        let result = LeafGate::default().evaluate(&Frame::new(FRAME_WIDTH, FRAME_HEIGHT));
        assert_eq!(result.coverage_ratio, 0.0);
        assert!(!result.has_leaf);
    }

    #[test]
    fn test_empty_frame_has_zero_coverage() {
        let result = LeafGate::default().evaluate(&Frame::new(0, 0));
        assert_eq!(result.coverage_ratio, 0.0);
        assert!(!result.has_leaf);
    }

    #[test]
    fn test_dim_or_washed_out_green_is_rejected() {
        let gate = LeafGate::default();
        let dark = ImageBuffer::from_pixel(10, 10, Rgb([0, 30, 0]));
        let pale = ImageBuffer::from_pixel(10, 10, Rgb([200, 220, 200]));

        assert_eq!(gate.evaluate(&dark).coverage_ratio, 0.0);
        assert_eq!(gate.evaluate(&pale).coverage_ratio, 0.0);
    }
}
