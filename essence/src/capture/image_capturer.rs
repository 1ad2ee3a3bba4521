use image::RgbImage;

use super::{crop_checked, CaptureResult, Capturer};
use crate::positioning::Rect;

/// Serves captures out of a still image, e.g. a full-window screenshot saved to disk.
pub struct ImageCapturer {
    image: RgbImage,
}

impl ImageCapturer {
    pub fn new(image: RgbImage) -> Self {
        ImageCapturer { image }
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }
}

impl Capturer<RgbImage> for ImageCapturer {
    fn capture_rect(&self, rect: Rect<i32>) -> CaptureResult<RgbImage> {
        crop_checked(&self.image, rect)
    }
}
