use std::fmt;

use image::{GrayImage, RgbImage};
use thiserror::Error;

use super::catalog::{intensity_stats, LabelCatalog, Template};
use super::label::Label;
use super::preprocess::preprocess;
use crate::positioning::Size;

/// Variances below this are treated as a flat image.
const FLAT_EPSILON: f64 = 1e-9;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecognizeError {
    #[error("region is {actual}, expected {expected}")]
    ShapeMismatch { expected: Size<u32>, actual: Size<u32> },
}

/// Best label for a region and its zero-mean normalized cross-correlation score.
///
/// `label` is `None` when recognition failed or the score fell under a confidence floor.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub label: Option<Label>,
    pub score: f32,
}

impl MatchResult {
    pub const MIN_SCORE: f32 = -1.0;
    pub const MAX_SCORE: f32 = 1.0;

    pub fn none() -> Self {
        MatchResult {
            label: None,
            score: Self::MIN_SCORE,
        }
    }

    /// Drop the label when the score is under `floor`.
    pub fn with_floor(self, floor: Option<f32>) -> Self {
        match floor {
            Some(f) if self.score < f => MatchResult {
                label: None,
                score: self.score,
            },
            _ => self,
        }
    }

    pub fn label_str(&self) -> Option<&str> {
        self.label.as_ref().map(|l| l.as_str())
    }

    pub fn is(&self, name: &str) -> bool {
        self.label_str() == Some(name)
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{} ({:.3})", label, self.score),
            None => write!(f, "None ({:.3})", self.score),
        }
    }
}

/// Classify `image` against every template of `catalog`.
///
/// Each template slides over the preprocessed region without scaling; a template as
/// large as the field has exactly one placement. The first label reaching the highest
/// score wins.
pub fn recognize(image: &RgbImage, catalog: &LabelCatalog) -> Result<MatchResult, RecognizeError> {
    let expected = catalog.field_size();
    let actual = Size::new(image.width(), image.height());
    if actual != expected {
        return Err(RecognizeError::ShapeMismatch { expected, actual });
    }

    let region = preprocess(image, catalog.preprocess_mode());
    Ok(best_match(&region, catalog))
}

/// Same as [`recognize`] for a region that is already preprocessed.
pub fn best_match(region: &GrayImage, catalog: &LabelCatalog) -> MatchResult {
    let mut best = MatchResult::none();
    for template in catalog.templates() {
        let score = template_score(region, template);
        if best.label.is_none() || score > best.score {
            best = MatchResult {
                label: Some(template.label().clone()),
                score,
            };
        }
    }
    best
}

/// Highest ZNCC of `template` over all placements inside `region`, in [-1, 1].
pub fn template_score(region: &GrayImage, template: &Template) -> f32 {
    let (rw, rh) = region.dimensions();
    let (tw, th) = template.image().dimensions();
    if tw > rw || th > rh || tw == 0 || th == 0 {
        return MatchResult::MIN_SCORE;
    }

    let mut best = f64::NEG_INFINITY;
    let mut window = Vec::with_capacity((tw * th) as usize);
    for oy in 0..=(rh - th) {
        for ox in 0..=(rw - tw) {
            window.clear();
            for y in 0..th {
                for x in 0..tw {
                    window.push(region.get_pixel(ox + x, oy + y)[0]);
                }
            }
            best = best.max(zncc(&window, template));
        }
    }
    (best as f32).clamp(MatchResult::MIN_SCORE, MatchResult::MAX_SCORE)
}

fn zncc(window: &[u8], template: &Template) -> f64 {
    let (w_mean, w_norm) = intensity_stats(window);
    let t_flat = template.norm() < FLAT_EPSILON;
    let w_flat = w_norm < FLAT_EPSILON;
    if t_flat || w_flat {
        return if t_flat && w_flat && (template.mean() - w_mean).abs() < 0.5 {
            1.0
        } else {
            0.0
        };
    }

    let dot: f64 = template
        .image()
        .as_raw()
        .iter()
        .zip(window.iter())
        .map(|(&t, &w)| (t as f64 - template.mean()) * (w as f64 - w_mean))
        .sum();
    dot / (template.norm() * w_norm)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognition::Preprocess;
    use image::{Luma, Rgb};

    fn pattern(seed: u32, w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| {
            let v = ((x * 31 + y * 17 + seed * 101).wrapping_mul(2654435761) >> 24) as u8;
            Rgb([v, v, v])
        })
    }

    fn catalog(names: &[&str], w: u32, h: u32) -> LabelCatalog {
        let templates = names
            .iter()
            .enumerate()
            .map(|(i, n)| Template::from_raw((*n).into(), &pattern(i as u32, w, h), Preprocess::Gray))
            .collect();
        LabelCatalog::new("test", Preprocess::Gray, Size::new(w, h), templates).unwrap()
    }

    #[test]
    fn template_recognizes_itself() {
        let names = ["敏捷提升", "力量提升", "意志提升"];
        let catalog = catalog(&names, 16, 8);
        for (i, name) in names.iter().enumerate() {
            let result = recognize(&pattern(i as u32, 16, 8), &catalog).unwrap();
            assert!(result.is(name), "{} -> {}", name, result);
            assert!((result.score - MatchResult::MAX_SCORE).abs() < 1e-5);
        }
    }

    #[test]
    fn repeated_recognition_is_identical() {
        let catalog = catalog(&["a", "b", "c"], 12, 6);
        let query = pattern(7, 12, 6);
        let first = recognize(&query, &catalog).unwrap();
        for _ in 0..5 {
            assert_eq!(recognize(&query, &catalog).unwrap(), first);
        }
    }

    #[test]
    fn score_stays_bounded() {
        let catalog = catalog(&["a", "b"], 10, 5);
        for seed in 0..20 {
            let result = recognize(&pattern(seed + 50, 10, 5), &catalog).unwrap();
            assert!(result.score >= MatchResult::MIN_SCORE && result.score <= MatchResult::MAX_SCORE);
        }
        let flat = RgbImage::from_pixel(10, 5, Rgb([9, 9, 9]));
        let result = recognize(&flat, &catalog).unwrap();
        assert!(result.score.is_finite());
        assert!(result.score >= MatchResult::MIN_SCORE && result.score <= MatchResult::MAX_SCORE);
    }

    #[test]
    fn identical_templates_resolve_to_first_label() {
        let image = pattern(3, 8, 8);
        let templates = vec![
            Template::from_raw("locked".into(), &image, Preprocess::Gray),
            Template::from_raw("not_locked".into(), &image, Preprocess::Gray),
        ];
        let catalog = LabelCatalog::new("icons", Preprocess::Gray, Size::new(8, 8), templates).unwrap();
        assert!(recognize(&image, &catalog).unwrap().is("locked"));
    }

    #[test]
    fn wrong_shape_is_rejected() {
        let catalog = catalog(&["a"], 10, 5);
        let err = recognize(&RgbImage::new(11, 5), &catalog).unwrap_err();
        assert_eq!(
            err,
            RecognizeError::ShapeMismatch {
                expected: Size::new(10, 5),
                actual: Size::new(11, 5),
            }
        );
    }

    #[test]
    fn smaller_template_is_found_anywhere_in_field() {
        let small = pattern(1, 6, 4);
        let other = pattern(2, 6, 4);
        let templates = vec![
            Template::from_raw("other".into(), &other, Preprocess::Gray),
            Template::from_raw("small".into(), &small, Preprocess::Gray),
        ];
        let catalog = LabelCatalog::new("text", Preprocess::Gray, Size::new(10, 6), templates).unwrap();

        let mut field = RgbImage::from_pixel(10, 6, Rgb([0, 0, 0]));
        image::imageops::replace(&mut field, &small, 3, 1);
        let result = recognize(&field, &catalog).unwrap();
        assert!(result.is("small"));
        assert!((result.score - 1.0).abs() < 1e-5);
    }

    #[test]
    fn flat_template_matches_equal_flat_region() {
        let templates = vec![
            Template::new("blank".into(), GrayImage::from_pixel(4, 4, Luma([0]))),
            Template::new("full".into(), GrayImage::from_pixel(4, 4, Luma([255]))),
        ];
        let catalog = LabelCatalog::new("flat", Preprocess::Gray, Size::new(4, 4), templates).unwrap();
        let white = RgbImage::from_pixel(4, 4, Rgb([255, 255, 255]));
        assert!(recognize(&white, &catalog).unwrap().is("full"));
    }

    #[test]
    fn floor_drops_weak_labels() {
        let weak = MatchResult { label: Some("强攻".into()), score: 0.2 };
        assert_eq!(weak.clone().with_floor(None), weak);
        assert!(weak.clone().with_floor(Some(0.5)).label.is_none());
        assert!(weak.with_floor(Some(0.1)).is("强攻"));
    }
}
