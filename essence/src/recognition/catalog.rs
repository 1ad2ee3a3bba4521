use std::collections::HashSet;
use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, RgbImage};
use log::debug;
use thiserror::Error;

use super::label::Label;
use super::preprocess::{preprocess, Preprocess};
use crate::positioning::Size;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("label catalog `{0}` has no templates")]
    Empty(String),
    #[error("label `{0}` appears twice")]
    DuplicateLabel(Label),
    #[error("template for `{label}` is {template}, larger than the {field} field")]
    TemplateTooLarge {
        label: Label,
        template: Size<u32>,
        field: Size<u32>,
    },
    #[error("failed to load template for `{label}` from {}", path.display())]
    Load {
        label: Label,
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// One preprocessed reference image together with the statistics the matcher needs.
#[derive(Debug, Clone)]
pub struct Template {
    label: Label,
    image: GrayImage,
    mean: f64,
    /// sqrt of the summed squared deviation from `mean`
    norm: f64,
}

impl Template {
    /// `image` must already be preprocessed with the catalog's mode.
    pub fn new(label: Label, image: GrayImage) -> Self {
        let (mean, norm) = intensity_stats(image.as_raw());
        Template {
            label,
            image,
            mean,
            norm,
        }
    }

    /// Build a template from a raw capture, running the shared preprocessing.
    pub fn from_raw(label: Label, raw: &RgbImage, mode: Preprocess) -> Self {
        Self::new(label, preprocess(raw, mode))
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn image(&self) -> &GrayImage {
        &self.image
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn norm(&self) -> f64 {
        self.norm
    }

    pub fn size(&self) -> Size<u32> {
        Size::new(self.image.width(), self.image.height())
    }
}

pub(crate) fn intensity_stats(pixels: &[u8]) -> (f64, f64) {
    if pixels.is_empty() {
        return (0.0, 0.0);
    }
    let n = pixels.len() as f64;
    let mean = pixels.iter().map(|&p| p as f64).sum::<f64>() / n;
    let var = pixels
        .iter()
        .map(|&p| {
            let d = p as f64 - mean;
            d * d
        })
        .sum::<f64>();
    (mean, var.sqrt())
}

/// Labels of one classification task with their templates, in a fixed order.
///
/// Iteration order is the construction order and decides ties.
#[derive(Debug, Clone)]
pub struct LabelCatalog {
    name: String,
    preprocess: Preprocess,
    field_size: Size<u32>,
    templates: Vec<Template>,
}

impl LabelCatalog {
    pub fn new(
        name: impl Into<String>,
        preprocess: Preprocess,
        field_size: Size<u32>,
        templates: Vec<Template>,
    ) -> Result<Self, CatalogError> {
        let name = name.into();
        if templates.is_empty() {
            return Err(CatalogError::Empty(name));
        }

        let mut seen = HashSet::new();
        for template in templates.iter() {
            if !seen.insert(template.label().clone()) {
                return Err(CatalogError::DuplicateLabel(template.label().clone()));
            }
            let size = template.size();
            if size.width > field_size.width || size.height > field_size.height {
                return Err(CatalogError::TemplateTooLarge {
                    label: template.label().clone(),
                    template: size,
                    field: field_size,
                });
            }
        }

        Ok(LabelCatalog {
            name,
            preprocess,
            field_size,
            templates,
        })
    }

    /// Load `<dir>/<label>.png` for every label, in the given order.
    ///
    /// Single-channel files are taken as template builder output and used as is. Color
    /// files are raw crops and go through `preprocess` like a captured region.
    pub fn load_dir<S: AsRef<str>>(
        name: impl Into<String>,
        dir: &Path,
        labels: &[S],
        mode: Preprocess,
        field_size: Size<u32>,
    ) -> Result<Self, CatalogError> {
        let mut templates = Vec::with_capacity(labels.len());
        for label in labels.iter() {
            let label = Label::from(label.as_ref());
            let path = dir.join(format!("{}.png", label));
            let image = match image::open(&path).map_err(|source| CatalogError::Load {
                label: label.clone(),
                path: path.clone(),
                source,
            })? {
                DynamicImage::ImageLuma8(gray) => gray,
                other => preprocess(&other.to_rgb8(), mode),
            };
            debug!("已加载模板 {} ({}x{})", label, image.width(), image.height());
            templates.push(Template::new(label, image));
        }
        Self::new(name, mode, field_size, templates)
    }

    /// The same templates matched against a field of another size.
    pub fn with_field_size(&self, field_size: Size<u32>) -> Result<Self, CatalogError> {
        Self::new(self.name.clone(), self.preprocess, field_size, self.templates.clone())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn preprocess_mode(&self) -> Preprocess {
        self.preprocess
    }

    pub fn field_size(&self) -> Size<u32> {
        self.field_size
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.templates.iter().map(|t| t.label())
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
