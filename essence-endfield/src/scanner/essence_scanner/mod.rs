pub use control_loop::{ControlEvent, ControlLoop};
pub use essence_scanner_config::{EssenceScannerConfig, ScanSettings};
pub use essence_scanner_window_info::{EssenceScannerWindowInfo, GridCell, GRID_COLS, GRID_ROWS};
pub use field::{CatalogKind, Field, FieldReading, FieldSpec, ItemReading};
pub use inspect::inspect_current;
pub use scan_controller::{ScanController, ToggleOutcome};
pub use scan_event::{AbortReason, Decision, ScanEvent, ScanReport, ScanState, ScanSummary};
pub use scan_orchestrator::{capture_fields, classify_fields, decide, lock_toggle_needed, read_item, ScanOrchestrator};
pub use scan_resources::{icon_preprocess, text_preprocess, ScanBackend, ScanResources, SharedClassifier};

mod control_loop;
mod essence_scanner_config;
mod essence_scanner_window_info;
mod field;
mod inspect;
mod scan_controller;
mod scan_event;
mod scan_orchestrator;
mod scan_resources;
