use image::{DynamicImage, RgbImage};
use screenshots::Screen;

use super::{CaptureError, CaptureResult, Capturer};
use crate::positioning::Rect;

pub struct ScreenshotsCapturer;

impl ScreenshotsCapturer {
    pub fn new() -> Self {
        ScreenshotsCapturer
    }
}

impl Default for ScreenshotsCapturer {
    fn default() -> Self {
        Self::new()
    }
}

impl Capturer<RgbImage> for ScreenshotsCapturer {
    fn capture_rect(&self, rect: Rect<i32>) -> CaptureResult<RgbImage> {
        let screen = Screen::from_point(rect.left, rect.top)
            .map_err(|e| CaptureError::Backend(e.to_string()))?;
        let display = screen.display_info;
        let width = u32::try_from(rect.width).map_err(|_| CaptureError::OutOfBounds {
            rect,
            width: display.width,
            height: display.height,
        })?;
        let height = u32::try_from(rect.height).map_err(|_| CaptureError::OutOfBounds {
            rect,
            width: display.width,
            height: display.height,
        })?;

        let rgba = screen
            .capture_area(rect.left - display.x, rect.top - display.y, width, height)
            .map_err(|e| CaptureError::Backend(e.to_string()))?;
        Ok(DynamicImage::ImageRgba8(rgba).to_rgb8())
    }
}
