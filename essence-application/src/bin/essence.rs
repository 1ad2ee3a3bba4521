use std::any::Any;
use std::fmt::Write as _;
use std::panic;
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{command, ArgMatches, Args, Command, FromArgMatches};
use essence::system_control::{native_keyboard, HotKeyPoller};
use essence::utils::{self, press_any_key_to_continue};
use essence_endfield::scanner::{
    inspect_current, ControlEvent, ControlLoop, Decision, EssenceScannerConfig, EssenceScannerWindowInfo,
    ItemReading, ScanBackend, ScanEvent, ScanReport, ScanResources, ScanState,
};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use log::{error, info, warn};
use prettytable::{row, Table};

const ERROR_LOG: &str = "essence_error.log";
const TICK_MS: u32 = 30;

fn build_command() -> Command {
    let cmd = command!().subcommand(Command::new("inspect").about("识别当前选中的基质后退出"));
    EssenceScannerConfig::augment_args(cmd)
}

fn init_logger(verbose: bool) -> Result<MultiProgress> {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    let logger = builder.build();
    let level = logger.filter();

    let multi = MultiProgress::new();
    LogWrapper::new(multi.clone(), logger)
        .try_init()
        .context("初始化日志")?;
    log::set_max_level(level);
    Ok(multi)
}

fn panic_payload(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "<非文本 panic>"
    }
}

/// Record panics of any thread, the scan worker included, before the console closes.
fn install_panic_log() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let thread = thread::current();
        let report = format!(
            "线程 {} 崩溃: {}\n位置: {}\n",
            thread.name().unwrap_or("<unnamed>"),
            panic_payload(info.payload()),
            info.location().map(|l| l.to_string()).unwrap_or_default(),
        );
        let _ = std::fs::write(ERROR_LOG, report);
        default_hook(info);
    }));
}

fn error_report(e: &anyhow::Error, last_scan: Option<&ScanReport>) -> String {
    let mut s = String::new();
    for (i, cause) in e.chain().enumerate() {
        let _ = writeln!(s, "{}{}", if i == 0 { "错误: " } else { "  原因: " }, cause);
    }
    if let Some(report) = last_scan {
        let _ = writeln!(
            s,
            "最近一次扫描: {}，已处理 {}，保留 {}，丢弃 {}",
            state_name(report.state),
            report.summary.scanned,
            report.summary.kept,
            report.summary.discarded
        );
    }
    s
}

fn state_name(state: ScanState) -> String {
    match state {
        ScanState::Idle => "未开始".into(),
        ScanState::Running { cursor } => format!("进行中 ({})", cursor),
        ScanState::Completed => "完成".into(),
        ScanState::Aborted(reason) => format!("中止 ({})", reason),
    }
}

fn print_report(report: &ScanReport) {
    let mut table = Table::new();
    table.set_titles(row!["状态", "已处理", "保留", "丢弃", "切换锁定"]);
    let summary = report.summary;
    let state = state_name(report.state);
    table.add_row(row![state, summary.scanned, summary.kept, summary.discarded, summary.toggled]);
    table.printstd();
}

fn print_reading(reading: &ItemReading, decision: &Decision) {
    let mut table = Table::new();
    table.set_titles(row!["字段", "识别结果", "置信度"]);
    for r in reading.0.iter() {
        let label = r.result.label_str().unwrap_or("-");
        let score = format!("{:.3}", r.result.score);
        table.add_row(row![r.field.zh_cn(), label, score]);
    }
    table.printstd();
    match decision {
        Decision::Kept(target) => info!("完美契合武器 {}", target.weapon_name),
        Decision::Discarded => info!("不匹配任何已实装武器"),
    }
}

/// Drives a progress bar from scan events until every sender is gone.
fn spawn_progress(multi: MultiProgress, rx: Receiver<ScanEvent>) -> JoinHandle<()> {
    thread::spawn(move || {
        let style = ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        let mut bar: Option<ProgressBar> = None;

        for event in rx {
            match event {
                ScanEvent::Started { total } => {
                    let pb = multi.add(ProgressBar::new(total as u64));
                    pb.set_style(style.clone());
                    bar = Some(pb);
                },
                ScanEvent::CellDecided { cell, decision, .. } => {
                    if let Some(pb) = bar.as_ref() {
                        pb.inc(1);
                        if let Decision::Kept(target) = decision {
                            pb.set_message(format!("{}: {}", cell, target.weapon_name));
                        }
                    }
                },
                ScanEvent::Completed(_) | ScanEvent::Aborted { .. } => {
                    if let Some(pb) = bar.take() {
                        pb.finish_and_clear();
                        multi.remove(&pb);
                    }
                },
                ScanEvent::CellRecognized { .. } => {},
            }
        }
    })
}

struct EssenceApplication {
    config: EssenceScannerConfig,
    window_info: EssenceScannerWindowInfo,
    resources: ScanResources,
    backend: ScanBackend,
    last_scan: Option<ScanReport>,
}

impl EssenceApplication {
    fn new(matches: &ArgMatches) -> Result<Self> {
        let config = EssenceScannerConfig::from_arg_matches(matches)?;
        let window_info = EssenceScannerWindowInfo::default();
        let resources = ScanResources::load(&config, &window_info)?;
        let backend = ScanBackend::native(config.window_titles());
        Ok(EssenceApplication {
            config,
            window_info,
            resources,
            backend,
            last_scan: None,
        })
    }

    /// One-off inspect from the command line: give the user time to switch to the game.
    fn inspect_once(&self) -> Result<()> {
        info!("请在 {} 秒内切换到终末地窗口", self.config.focus_timeout_secs);
        let deadline = Instant::now() + Duration::from_secs(self.config.focus_timeout_secs);
        while self.backend.focus.active_game_window().is_none() {
            if Instant::now() >= deadline {
                warn!("未找到终末地窗口");
                return Ok(());
            }
            utils::sleep(100);
        }

        let result = inspect_current(
            &self.window_info,
            &self.resources,
            &self.backend,
            self.config.min_confidence,
            Some(self.config.snapshot_dir.as_path()),
        )?;
        if let Some((reading, decision)) = result {
            print_reading(&reading, &decision);
            info!("识别区域已保存到 {}", self.config.snapshot_dir.display());
        }
        Ok(())
    }

    fn run(&mut self, multi: MultiProgress) -> Result<()> {
        let (tx, rx) = mpsc::channel();
        let progress = spawn_progress(multi, rx);
        let mut control = ControlLoop::new(
            HotKeyPoller::new(native_keyboard()),
            self.window_info.clone(),
            self.config.scan_settings(),
            self.resources.clone(),
            self.backend.clone(),
            Some(tx),
            Some(self.config.snapshot_dir.clone()),
        );

        info!("在游戏中按 ] 开始/停止扫描，按 [ 识别当前基质，按 Alt+Delete 退出");
        'outer: loop {
            for event in control.tick()? {
                match event {
                    ControlEvent::Started => info!("开始扫描，再按 ] 停止"),
                    ControlEvent::Finished(report) => {
                        print_report(&report);
                        self.last_scan = Some(report);
                    },
                    ControlEvent::Inspected { reading, decision } => print_reading(&reading, &decision),
                    ControlEvent::GameNotFocused => warn!("请先切换到终末地窗口"),
                    ControlEvent::Busy => {},
                    ControlEvent::Exit => break 'outer,
                }
            }
            utils::sleep(TICK_MS);
        }

        drop(control);
        let _ = progress.join();
        Ok(())
    }
}

fn run(matches: &ArgMatches, multi: MultiProgress, last_scan: &mut Option<ScanReport>) -> Result<()> {
    let mut application = EssenceApplication::new(matches)?;
    let res = match matches.subcommand() {
        Some(("inspect", _)) => application.inspect_once(),
        _ => application.run(multi),
    };
    *last_scan = application.last_scan;
    res
}

pub fn main() {
    install_panic_log();
    let matches = build_command().get_matches();
    let verbose = matches.get_flag("verbose");

    let mut last_scan = None;
    let res = init_logger(verbose).and_then(|multi| run(&matches, multi, &mut last_scan));

    if let Err(e) = res {
        error!("{:#}", e);
        let _ = std::fs::write(ERROR_LOG, error_report(&e, last_scan.as_ref()));
        eprintln!("错误已写入 {}", ERROR_LOG);
    }
    press_any_key_to_continue();
}

#[cfg(test)]
mod tests {
    use super::*;
    use essence_endfield::scanner::{AbortReason, ScanSummary};

    #[test]
    fn error_report_lists_causes_and_last_scan() {
        let e = anyhow::anyhow!("找不到窗口").context("启动扫描");
        let report = ScanReport {
            state: ScanState::Aborted(AbortReason::Cancelled),
            summary: ScanSummary {
                scanned: 7,
                kept: 2,
                discarded: 5,
                toggled: 3,
            },
        };

        let text = error_report(&e, Some(&report));
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "错误: 启动扫描");
        assert_eq!(lines[1], "  原因: 找不到窗口");
        assert_eq!(lines[2], "最近一次扫描: 中止 (cancelled)，已处理 7，保留 2，丢弃 5");
    }

    #[test]
    fn error_report_without_scan_has_only_causes() {
        let text = error_report(&anyhow::anyhow!("配置错误"), None);
        assert_eq!(text, "错误: 配置错误\n");
    }

    #[test]
    fn panic_payload_reads_both_string_kinds() {
        let borrowed: Box<dyn Any + Send> = Box::new("boom");
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned boom"));
        let other: Box<dyn Any + Send> = Box::new(42_u32);
        assert_eq!(panic_payload(borrowed.as_ref()), "boom");
        assert_eq!(panic_payload(owned.as_ref()), "owned boom");
        assert_eq!(panic_payload(other.as_ref()), "<非文本 panic>");
    }
}
