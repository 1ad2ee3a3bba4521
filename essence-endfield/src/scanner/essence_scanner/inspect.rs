use std::path::Path;

use anyhow::{Context, Result};
use image::RgbImage;
use log::{debug, info, warn};

use super::essence_scanner_window_info::EssenceScannerWindowInfo;
use super::field::{CatalogKind, FieldSpec, ItemReading};
use super::scan_event::Decision;
use super::scan_orchestrator::{capture_fields, classify_fields, decide};
use super::scan_resources::{ScanBackend, ScanResources};

/// Classify the item currently open in the detail panel without clicking anything.
///
/// Returns `None` when the game window is not focused. When `snapshot_dir` is set the
/// stat regions that were classified are saved there, preprocessed, as `<field>_roi.png`.
pub fn inspect_current(
    window_info: &EssenceScannerWindowInfo,
    resources: &ScanResources,
    backend: &ScanBackend,
    min_confidence: Option<f32>,
    snapshot_dir: Option<&Path>,
) -> Result<Option<(ItemReading, Decision)>> {
    let Some(window) = backend.focus.active_game_window() else {
        debug!("终末地窗口不在前台，忽略单次识别");
        return Ok(None);
    };

    let fields = window_info.fields();
    let images = capture_fields(backend, &fields, &window).context("截取当前基质")?;
    let reading = classify_fields(resources, &fields, &images, min_confidence);

    if let Some(dir) = snapshot_dir {
        if let Err(e) = save_snapshots(resources, &fields, &images, dir) {
            warn!("保存识别区域失败: {:#}", e);
        }
    }

    for r in reading.0.iter() {
        info!("{}识别结果: {}", r.field.zh_cn(), r.result);
    }
    let decision = decide(&resources.targets, &reading);
    Ok(Some((reading, decision)))
}

fn save_snapshots(resources: &ScanResources, fields: &[FieldSpec], images: &[RgbImage], dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    for (spec, image) in fields.iter().zip(images.iter()) {
        if spec.catalog != CatalogKind::Text {
            continue;
        }
        let path = dir.join(format!("{}_roi.png", spec.field));
        resources
            .classifier(spec.catalog)
            .preprocessed(image)
            .save(&path)
            .with_context(|| format!("save {}", path.display()))?;
    }
    Ok(())
}
