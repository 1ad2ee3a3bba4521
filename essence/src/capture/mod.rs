use image::{GenericImageView, RgbImage};
use thiserror::Error;

use crate::positioning::{Pos, Rect};

pub use image_capturer::ImageCapturer;
#[cfg(target_os = "windows")]
pub use screenshots_capturer::ScreenshotsCapturer;

mod image_capturer;
#[cfg(target_os = "windows")]
mod screenshots_capturer;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no game window to capture from")]
    WindowNotFound,
    #[error("capture region {rect:?} lies outside the {width}x{height} source")]
    OutOfBounds { rect: Rect<i32>, width: u32, height: u32 },
    #[error("capture backend failed: {0}")]
    Backend(String),
}

pub type CaptureResult<T> = std::result::Result<T, CaptureError>;

pub trait Capturer<ImageType> {
    /// Capture `rect` given in screen coordinates.
    fn capture_rect(&self, rect: Rect<i32>) -> CaptureResult<ImageType>;

    /// Capture `rect` given relative to `origin`, usually the client origin of the game window.
    fn capture_relative_to(&self, rect: Rect<i32>, origin: Pos<i32>) -> CaptureResult<ImageType> {
        self.capture_rect(rect.translate(origin))
    }
}

/// Capturer for platforms without a backend.
pub struct NoCapture;

impl<ImageType> Capturer<ImageType> for NoCapture {
    fn capture_rect(&self, _rect: Rect<i32>) -> CaptureResult<ImageType> {
        Err(CaptureError::WindowNotFound)
    }
}

/// Crop `rect` out of `source`, failing instead of clamping when the rect does not fit.
pub fn crop_checked(source: &RgbImage, rect: Rect<i32>) -> CaptureResult<RgbImage> {
    let out_of_bounds = || CaptureError::OutOfBounds {
        rect,
        width: source.width(),
        height: source.height(),
    };
    let r = rect.to_rect_u32().ok_or_else(out_of_bounds)?;
    if r.left.saturating_add(r.width) > source.width()
        || r.top.saturating_add(r.height) > source.height()
    {
        return Err(out_of_bounds());
    }
    Ok(source.view(r.left, r.top, r.width, r.height).to_image())
}
