pub use catalog::{CatalogError, LabelCatalog, Template};
pub use label::Label;
pub use preprocess::{preprocess, to_gray, Preprocess, BINARIZE_THRESHOLD};
pub use recognizer::{best_match, recognize, template_score, MatchResult, RecognizeError};
pub use traits::ImageToLabel;

mod catalog;
mod label;
mod preprocess;
mod recognizer;
mod traits;
