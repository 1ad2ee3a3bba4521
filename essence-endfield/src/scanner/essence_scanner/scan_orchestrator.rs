use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;

use essence::capture::CaptureResult;
use essence::positioning::Pos;
use essence::recognition::MatchResult;
use essence::utils;
use essence::window_info::GameWindow;
use image::RgbImage;
use log::{debug, error, info, warn};

use super::essence_scanner_config::ScanSettings;
use super::essence_scanner_window_info::{EssenceScannerWindowInfo, GridCell};
use super::field::{Field, FieldReading, FieldSpec, ItemReading};
use super::scan_event::{AbortReason, Decision, ScanEvent, ScanReport, ScanState, ScanSummary};
use super::scan_resources::{ScanBackend, ScanResources};
use crate::game_data::{TargetCatalog, LABEL_DEPRECATED, LABEL_LOCKED, LABEL_NOT_LOCKED};

/// Capture every field region of the item currently shown in the detail panel, in field order.
pub fn capture_fields(
    backend: &ScanBackend,
    fields: &[FieldSpec],
    window: &GameWindow,
) -> CaptureResult<Vec<RgbImage>> {
    fields
        .iter()
        .map(|spec| backend.capturer.capture_relative_to(spec.rect, window.origin()))
        .collect()
}

/// Classify captured field regions. A field that fails to classify reads as `None`.
pub fn classify_fields(
    resources: &ScanResources,
    fields: &[FieldSpec],
    images: &[RgbImage],
    min_confidence: Option<f32>,
) -> ItemReading {
    let readings = fields
        .iter()
        .zip(images.iter())
        .map(|(spec, image)| {
            let result = match resources.classifier(spec.catalog).image_to_label(image) {
                Ok(r) => r.with_floor(min_confidence),
                Err(e) => {
                    warn!("{} 识别失败: {}", spec.field.zh_cn(), e);
                    MatchResult::none()
                },
            };
            FieldReading {
                field: spec.field,
                result,
            }
        })
        .collect();
    ItemReading(readings)
}

/// Capture and classify every field of the item currently shown in the detail panel.
///
/// A capture failure aborts the whole read.
pub fn read_item(
    backend: &ScanBackend,
    resources: &ScanResources,
    fields: &[FieldSpec],
    window: &GameWindow,
    min_confidence: Option<f32>,
) -> CaptureResult<ItemReading> {
    let images = capture_fields(backend, fields, window)?;
    Ok(classify_fields(resources, fields, &images, min_confidence))
}

/// Exact lookup of the three stat readings in the target catalog.
pub fn decide(targets: &TargetCatalog, reading: &ItemReading) -> Decision {
    match targets.find(reading.attribute(), reading.secondary(), reading.skill()) {
        Some(target) => Decision::Kept(target.clone()),
        None => Decision::Discarded,
    }
}

/// Whether the lock button has to be clicked to bring the item in line with `decision`.
///
/// An unrecognized lock state never triggers a click.
pub fn lock_toggle_needed(decision: &Decision, reading: &ItemReading) -> bool {
    let Some(lock) = reading.get(Field::Lock) else {
        return false;
    };
    match decision {
        Decision::Kept(_) => lock.is(LABEL_NOT_LOCKED),
        Decision::Discarded => lock.is(LABEL_LOCKED),
    }
}

/// Drives capture, classify, decide and act over every grid cell.
///
/// Each [`step`](ScanOrchestrator::step) handles one cell. The cancellation flag is
/// only read at the top of a step, so an item whose click went out always gets its
/// decision and lock toggle before the scan stops.
pub struct ScanOrchestrator {
    window_info: EssenceScannerWindowInfo,
    fields: Vec<FieldSpec>,
    cells: Vec<GridCell>,
    settings: ScanSettings,
    resources: ScanResources,
    backend: ScanBackend,
    cancel: Arc<AtomicBool>,
    events: Option<Sender<ScanEvent>>,
    state: ScanState,
    summary: ScanSummary,
}

impl ScanOrchestrator {
    pub fn new(
        window_info: EssenceScannerWindowInfo,
        settings: ScanSettings,
        resources: ScanResources,
        backend: ScanBackend,
        cancel: Arc<AtomicBool>,
        events: Option<Sender<ScanEvent>>,
    ) -> Self {
        ScanOrchestrator {
            fields: window_info.fields(),
            cells: window_info.cells(),
            window_info,
            settings,
            resources,
            backend,
            cancel,
            events,
            state: ScanState::Idle,
            summary: ScanSummary::default(),
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn summary(&self) -> ScanSummary {
        self.summary
    }

    pub fn report(&self) -> ScanReport {
        ScanReport {
            state: self.state,
            summary: self.summary,
        }
    }

    fn emit(&self, event: ScanEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }

    fn abort(&mut self, reason: AbortReason) -> ScanState {
        self.state = ScanState::Aborted(reason);
        info!(
            "基质扫描中止 ({})，已处理 {} 个，保留 {} 个，丢弃 {} 个",
            reason, self.summary.scanned, self.summary.kept, self.summary.discarded
        );
        self.emit(ScanEvent::Aborted {
            reason,
            summary: self.summary,
        });
        self.state
    }

    fn complete(&mut self) -> ScanState {
        self.state = ScanState::Completed;
        info!(
            "基质扫描完成，共 {} 个，保留 {} 个，丢弃 {} 个，切换锁定 {} 次",
            self.summary.scanned, self.summary.kept, self.summary.discarded, self.summary.toggled
        );
        self.emit(ScanEvent::Completed(self.summary));
        self.state
    }

    fn click_client(&self, window: &GameWindow, pos: Pos<i32>) -> anyhow::Result<()> {
        self.backend.input.click(window.to_screen(pos))
    }

    /// Run one iteration. Starting from `Idle` enters `Running` first; terminal states are returned as is.
    pub fn step(&mut self) -> ScanState {
        let cursor = match self.state {
            ScanState::Idle => {
                info!("开始基质扫描，共 {} 个位置", self.cells.len());
                self.emit(ScanEvent::Started {
                    total: self.cells.len(),
                });
                self.state = ScanState::Running { cursor: 0 };
                0
            },
            ScanState::Running { cursor } => cursor,
            terminal => return terminal,
        };

        if cursor >= self.cells.len() {
            return self.complete();
        }
        let cell = self.cells[cursor];

        let Some(window) = self.backend.focus.active_game_window() else {
            info!("终末地窗口不在前台，停止基质扫描");
            return self.abort(AbortReason::FocusLost);
        };

        if self.cancel.load(Ordering::Acquire) {
            info!("基质扫描被中断");
            return self.abort(AbortReason::Cancelled);
        }

        if let Err(e) = self.click_client(&window, self.window_info.cell_pos(cell)) {
            error!("点击{}的基质失败: {}", cell, e);
            return self.abort(AbortReason::InputFailed);
        }

        utils::sleep(self.settings.settle_delay_ms);

        let reading = match read_item(
            &self.backend,
            &self.resources,
            &self.fields,
            &window,
            self.settings.min_confidence,
        ) {
            Ok(r) => r,
            Err(e) => {
                error!("截取{}的基质失败: {}", cell, e);
                return self.abort(AbortReason::FocusLost);
            },
        };

        for r in reading.0.iter() {
            debug!("{}基质的{}识别结果: {}", cell, r.field.zh_cn(), r.result);
        }
        let deprecated = reading.get(Field::Deprecate).map_or(false, |r| r.is(LABEL_DEPRECATED));
        let locked = reading.get(Field::Lock).map_or(false, |r| r.is(LABEL_LOCKED));
        info!(
            "已识别{}的基质，属性: {}, 废弃: {}, 锁定: {}",
            cell,
            reading.stats_display(),
            deprecated,
            locked
        );
        self.emit(ScanEvent::CellRecognized {
            cell,
            reading: reading.clone(),
        });

        let decision = decide(&self.resources.targets, &reading);
        let toggle = lock_toggle_needed(&decision, &reading);
        match &decision {
            Decision::Kept(target) => info!("{}的基质完美契合武器 {}，保留", cell, target.weapon_name),
            Decision::Discarded => info!("{}的基质不匹配任何已实装武器，丢弃", cell),
        }

        let mut toggled = false;
        if toggle {
            match self.click_client(&window, self.window_info.lock_button_pos) {
                Ok(()) => {
                    toggled = true;
                    if decision.is_kept() {
                        info!("已自动上锁");
                    } else {
                        info!("已自动解锁");
                    }
                },
                Err(e) => {
                    error!("点击锁定按钮失败: {}", e);
                    self.record(&decision, false);
                    self.emit(ScanEvent::CellDecided {
                        cell,
                        decision,
                        toggled: false,
                    });
                    return self.abort(AbortReason::InputFailed);
                },
            }
        }

        self.record(&decision, toggled);
        self.emit(ScanEvent::CellDecided {
            cell,
            decision,
            toggled,
        });

        let next = cursor + 1;
        if next >= self.cells.len() {
            return self.complete();
        }
        self.state = ScanState::Running { cursor: next };
        self.state
    }

    fn record(&mut self, decision: &Decision, toggled: bool) {
        self.summary.scanned += 1;
        if decision.is_kept() {
            self.summary.kept += 1;
        } else {
            self.summary.discarded += 1;
        }
        if toggled {
            self.summary.toggled += 1;
        }
    }

    /// Step until a terminal state.
    pub fn run(mut self) -> ScanReport {
        while !self.step().is_terminal() {}
        self.report()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use essence::recognition::Label;

    fn reading(stats: [Option<&str>; 3], lock: Option<&str>) -> ItemReading {
        let result = |l: Option<&str>| MatchResult {
            label: l.map(Label::from),
            score: 0.9,
        };
        ItemReading(vec![
            FieldReading { field: Field::Attribute, result: result(stats[0]) },
            FieldReading { field: Field::Secondary, result: result(stats[1]) },
            FieldReading { field: Field::Skill, result: result(stats[2]) },
            FieldReading { field: Field::Lock, result: result(lock) },
        ])
    }

    fn targets() -> TargetCatalog {
        TargetCatalog::from_json_str(
            r#"{ "w": { "weaponId": "w", "weaponName": "测试武器",
                 "stats": { "attribute": "敏捷提升", "secondary": "攻击提升", "skill": "强攻" } } }"#,
        )
        .unwrap()
    }

    #[test]
    fn exact_triple_is_kept() {
        let r = reading([Some("敏捷提升"), Some("攻击提升"), Some("强攻")], Some("not_locked"));
        let decision = decide(&targets(), &r);
        assert!(decision.is_kept());
        assert!(lock_toggle_needed(&decision, &r));
    }

    #[test]
    fn unknown_stat_is_discarded() {
        let r = reading([Some("敏捷提升"), None, Some("强攻")], Some("locked"));
        let decision = decide(&targets(), &r);
        assert_eq!(decision, Decision::Discarded);
        assert!(lock_toggle_needed(&decision, &r));
    }

    #[test]
    fn lock_state_already_right_needs_no_click() {
        let kept = reading([Some("敏捷提升"), Some("攻击提升"), Some("强攻")], Some("locked"));
        assert!(!lock_toggle_needed(&decide(&targets(), &kept), &kept));
        let discarded = reading([Some("力量提升"), Some("攻击提升"), Some("强攻")], Some("not_locked"));
        assert!(!lock_toggle_needed(&decide(&targets(), &discarded), &discarded));
    }

    #[test]
    fn unknown_lock_state_needs_no_click() {
        let r = reading([Some("敏捷提升"), Some("攻击提升"), Some("强攻")], None);
        assert!(!lock_toggle_needed(&decide(&targets(), &r), &r));
        let r = reading([None, None, None], Some("deprecated"));
        assert!(!lock_toggle_needed(&decide(&targets(), &r), &r));
    }
}
