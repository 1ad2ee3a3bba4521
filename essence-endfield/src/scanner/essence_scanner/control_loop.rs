use std::path::PathBuf;
use std::sync::mpsc::Sender;

use anyhow::Result;
use essence::system_control::{HotKey, HotKeyPoller};
use log::{error, info, warn};

use super::essence_scanner_config::ScanSettings;
use super::essence_scanner_window_info::EssenceScannerWindowInfo;
use super::field::ItemReading;
use super::inspect::inspect_current;
use super::scan_controller::{ScanController, ToggleOutcome};
use super::scan_event::{Decision, ScanEvent, ScanReport};
use super::scan_resources::{ScanBackend, ScanResources};

/// What one tick of the control loop did.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    Started,
    /// A scan ended, on its own or because it was stopped.
    Finished(ScanReport),
    Inspected { reading: ItemReading, decision: Decision },
    GameNotFocused,
    /// Single-shot inspect is refused while a scan is live.
    Busy,
    Exit,
}

/// Hotkey dispatcher: `]` toggles a scan, `[` inspects the open item, Alt+Delete exits.
///
/// Keys are global, so the game keeps focus while the scan is stopped by hand.
pub struct ControlLoop {
    hotkeys: HotKeyPoller,
    controller: ScanController,
    window_info: EssenceScannerWindowInfo,
    settings: ScanSettings,
    resources: ScanResources,
    backend: ScanBackend,
    snapshot_dir: Option<PathBuf>,
}

impl ControlLoop {
    pub fn new(
        hotkeys: HotKeyPoller,
        window_info: EssenceScannerWindowInfo,
        settings: ScanSettings,
        resources: ScanResources,
        backend: ScanBackend,
        events: Option<Sender<ScanEvent>>,
        snapshot_dir: Option<PathBuf>,
    ) -> Self {
        let controller = ScanController::new(
            window_info.clone(),
            settings,
            resources.clone(),
            backend.clone(),
            events,
        );
        ControlLoop {
            hotkeys,
            controller,
            window_info,
            settings,
            resources,
            backend,
            snapshot_dir,
        }
    }

    pub fn is_running(&self) -> bool {
        self.controller.is_running()
    }

    /// Collect a scan that ended by itself, then act on the keys pressed since the last tick.
    pub fn tick(&mut self) -> Result<Vec<ControlEvent>> {
        let mut out = Vec::new();
        if let Some(report) = self.controller.take_finished() {
            out.push(ControlEvent::Finished(report));
        }

        for key in self.hotkeys.poll() {
            match key {
                HotKey::RightBracket => self.toggle(&mut out)?,
                HotKey::LeftBracket => self.inspect(&mut out),
                HotKey::AltDelete => {
                    info!("退出");
                    if let Some(report) = self.controller.stop()? {
                        out.push(ControlEvent::Finished(report));
                    }
                    out.push(ControlEvent::Exit);
                    return Ok(out);
                },
            }
        }
        Ok(out)
    }

    fn toggle(&mut self, out: &mut Vec<ControlEvent>) -> Result<()> {
        if !self.controller.is_running() && self.backend.focus.active_game_window().is_none() {
            warn!("终末地窗口不在前台，不开始扫描");
            out.push(ControlEvent::GameNotFocused);
            return Ok(());
        }
        match self.controller.toggle()? {
            ToggleOutcome::Started => out.push(ControlEvent::Started),
            ToggleOutcome::Stopped(report) => out.push(ControlEvent::Finished(report)),
        }
        Ok(())
    }

    fn inspect(&mut self, out: &mut Vec<ControlEvent>) {
        if self.controller.is_running() {
            warn!("扫描进行中，忽略单次识别");
            out.push(ControlEvent::Busy);
            return;
        }
        match inspect_current(
            &self.window_info,
            &self.resources,
            &self.backend,
            self.settings.min_confidence,
            self.snapshot_dir.as_deref(),
        ) {
            Ok(Some((reading, decision))) => out.push(ControlEvent::Inspected { reading, decision }),
            Ok(None) => out.push(ControlEvent::GameNotFocused),
            Err(e) => error!("单次识别失败: {:#}", e),
        }
    }
}
