use image::{GrayImage, RgbImage};

use super::catalog::LabelCatalog;
use super::preprocess::preprocess;
use super::recognizer::{recognize, MatchResult, RecognizeError};

pub trait ImageToLabel<ImageType> {
    fn image_to_label(&self, image: &ImageType) -> Result<MatchResult, RecognizeError>;

    /// The image as the matcher sees it, for saving calibration snapshots.
    fn preprocessed(&self, image: &ImageType) -> GrayImage;

    fn name(&self) -> &str;
}

impl ImageToLabel<RgbImage> for LabelCatalog {
    fn image_to_label(&self, image: &RgbImage) -> Result<MatchResult, RecognizeError> {
        recognize(image, self)
    }

    fn preprocessed(&self, image: &RgbImage) -> GrayImage {
        preprocess(image, self.preprocess_mode())
    }

    fn name(&self) -> &str {
        LabelCatalog::name(self)
    }
}
