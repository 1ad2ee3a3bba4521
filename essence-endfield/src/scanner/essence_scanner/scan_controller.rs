use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::JoinHandle;

use anyhow::{anyhow, Context, Result};
use log::{info, warn};

use super::essence_scanner_config::ScanSettings;
use super::essence_scanner_window_info::EssenceScannerWindowInfo;
use super::scan_event::{ScanEvent, ScanReport};
use super::scan_orchestrator::ScanOrchestrator;
use super::scan_resources::{ScanBackend, ScanResources};

struct ScanWorker {
    cancel: Arc<AtomicBool>,
    handle: JoinHandle<ScanReport>,
}

impl ScanWorker {
    fn is_alive(&self) -> bool {
        !self.handle.is_finished()
    }

    fn join(self) -> Result<ScanReport> {
        self.handle.join().map_err(|_| anyhow!("扫描线程出现错误"))
    }
}

/// What a start/toggle request ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Started,
    /// A scan was live; it was stopped and nothing new was started.
    Stopped(ScanReport),
}

/// Owns the scan worker thread. At most one worker is alive at any time.
pub struct ScanController {
    window_info: EssenceScannerWindowInfo,
    settings: ScanSettings,
    resources: ScanResources,
    backend: ScanBackend,
    events: Option<Sender<ScanEvent>>,
    worker: Option<ScanWorker>,
}

impl ScanController {
    pub fn new(
        window_info: EssenceScannerWindowInfo,
        settings: ScanSettings,
        resources: ScanResources,
        backend: ScanBackend,
        events: Option<Sender<ScanEvent>>,
    ) -> Self {
        ScanController {
            window_info,
            settings,
            resources,
            backend,
            events,
            worker: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.as_ref().map_or(false, |w| w.is_alive())
    }

    /// Collect the report of a worker that ended on its own.
    pub fn take_finished(&mut self) -> Option<ScanReport> {
        if self.worker.as_ref().map_or(false, |w| !w.is_alive()) {
            let worker = self.worker.take()?;
            return match worker.join() {
                Ok(report) => Some(report),
                Err(e) => {
                    warn!("{}", e);
                    None
                },
            };
        }
        None
    }

    /// Start a scan, or stop the live one instead if there is one.
    pub fn start(&mut self) -> Result<ToggleOutcome> {
        if self.is_running() {
            let report = self.stop()?.ok_or_else(|| anyhow!("扫描线程已退出"))?;
            return Ok(ToggleOutcome::Stopped(report));
        }
        if let Some(report) = self.take_finished() {
            info!("上一次扫描结果: {:?}", report.state);
        }

        let cancel = Arc::new(AtomicBool::new(false));
        let orchestrator = ScanOrchestrator::new(
            self.window_info.clone(),
            self.settings,
            self.resources.clone(),
            self.backend.clone(),
            Arc::clone(&cancel),
            self.events.clone(),
        );
        let handle = std::thread::Builder::new()
            .name("essence-scanner".into())
            .spawn(move || orchestrator.run())
            .context("创建扫描线程")?;

        self.worker = Some(ScanWorker { cancel, handle });
        info!("基质扫描线程已启动");
        Ok(ToggleOutcome::Started)
    }

    pub fn toggle(&mut self) -> Result<ToggleOutcome> {
        self.start()
    }

    /// Request cancellation and wait for the worker to finish its current item.
    ///
    /// Returns `None` when no worker exists.
    pub fn stop(&mut self) -> Result<Option<ScanReport>> {
        let Some(worker) = self.worker.take() else {
            return Ok(None);
        };
        info!("停止基质扫描线程...");
        worker.cancel.store(true, Ordering::Release);
        worker.join().map(Some)
    }
}

impl Drop for ScanController {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.cancel.store(true, Ordering::Release);
            let _ = worker.join();
        }
    }
}
