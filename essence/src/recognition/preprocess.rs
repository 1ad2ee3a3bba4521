//! Intensity preprocessing shared by template generation and recognition.
//!
//! A template only scores meaningfully against a region that went through the same
//! [`Preprocess`] mode, so both sides call [`preprocess`] and nothing else.

use image::{GrayImage, ImageBuffer, Luma, RgbImage};
use serde::{Deserialize, Serialize};

/// Global binarization threshold for stat text: pixel >= threshold -> text.
pub const BINARIZE_THRESHOLD: f32 = 0.53;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Preprocess {
    /// Luminance only.
    Gray,
    /// Luminance stretched to the full range.
    Stretch,
    /// Stretch, flip to light-on-dark, then threshold to pure black and white.
    Binarize { threshold: f32 },
}

impl Preprocess {
    pub fn binarize() -> Self {
        Preprocess::Binarize {
            threshold: BINARIZE_THRESHOLD,
        }
    }
}

type GrayF32 = ImageBuffer<Luma<f32>, Vec<f32>>;

/// convert rgb image to f32 gray image
pub fn to_gray(raw: &RgbImage) -> GrayF32 {
    let mut new_gray: GrayF32 = ImageBuffer::new(raw.width(), raw.height());
    for (x, y, rgb) in raw.enumerate_pixels() {
        let r = rgb[0] as f32 / 255.0;
        let g = rgb[1] as f32 / 255.0;
        let b = rgb[2] as f32 / 255.0;
        new_gray.get_pixel_mut(x, y)[0] = r * 0.2989 + g * 0.5870 + b * 0.1140;
    }
    new_gray
}

/// Min-max normalize in place. With `auto_inverse`, a light background (sampled near
/// the bottom-right corner) is flipped so content always ends up light on dark.
fn normalize(im: &mut GrayF32, auto_inverse: bool) -> bool {
    let (width, height) = im.dimensions();
    if width == 0 || height == 0 {
        return false;
    }
    let mut max: f32 = f32::MIN;
    let mut min: f32 = f32::MAX;
    for p in im.pixels() {
        max = max.max(p[0]);
        min = min.min(p[0]);
    }
    if max == min {
        return false;
    }
    let flag_pixel = if width >= 2 {
        im.get_pixel(width - 2, height - 1)[0]
    } else {
        im.get_pixel(width - 1, height - 1)[0]
    };
    let invert = auto_inverse && (flag_pixel - min) / (max - min) >= 0.5;
    for p in im.pixels_mut() {
        let v = (p[0] - min) / (max - min);
        p[0] = if invert { 1.0 - v } else { v };
    }
    true
}

fn binarize(im: &mut GrayF32, threshold: f32) {
    for p in im.pixels_mut() {
        p[0] = if p[0] >= threshold { 1.0 } else { 0.0 };
    }
}

fn to_u8(im: &GrayF32) -> GrayImage {
    ImageBuffer::from_fn(im.width(), im.height(), |x, y| {
        let v = im.get_pixel(x, y)[0].clamp(0.0, 1.0);
        Luma([(v * 255.0).round() as u8])
    })
}

/// Reduce `raw` to a single intensity channel according to `mode`.
///
/// Flat images skip stretching; under `Binarize` they become all-dark.
pub fn preprocess(raw: &RgbImage, mode: Preprocess) -> GrayImage {
    let mut im = to_gray(raw);
    match mode {
        Preprocess::Gray => {},
        Preprocess::Stretch => {
            normalize(&mut im, false);
        },
        Preprocess::Binarize { threshold } => {
            if normalize(&mut im, true) {
                binarize(&mut im, threshold);
            } else {
                binarize(&mut im, f32::INFINITY);
            }
        },
    }
    to_u8(&im)
}
