use std::path::PathBuf;

use essence::window_info::DEFAULT_WINDOW_TITLES;

#[derive(Clone, clap::Args, Debug)]
pub struct EssenceScannerConfig {
    /// Released weapons JSON used as the keep list
    #[arg(long = "weapons", help = "武器数据 JSON", value_name = "FILE", default_value = "data/weapons.json")]
    pub weapons_path: PathBuf,

    #[arg(long = "text-templates", help = "属性文字模板目录", value_name = "DIR", default_value = "templates/generated")]
    pub text_template_dir: PathBuf,

    #[arg(long = "icon-templates", help = "按钮图标模板目录", value_name = "DIR", default_value = "templates/screenshot")]
    pub icon_template_dir: PathBuf,

    #[arg(long = "settle-delay-ms", help = "点击后等待界面刷新的毫秒数", default_value_t = 300)]
    pub settle_delay_ms: u32,

    /// Scores under this floor read as unrecognized. Unset keeps every best match.
    #[arg(long = "min-confidence", help = "最低置信度，低于该值视为未识别")]
    pub min_confidence: Option<f32>,

    #[arg(long = "window-title", help = "游戏窗口标题，可多次指定")]
    pub window_titles: Vec<String>,

    #[arg(long = "focus-timeout-secs", help = "开始扫描前等待游戏窗口置于前台的秒数", default_value_t = 5)]
    pub focus_timeout_secs: u64,

    #[arg(long = "snapshot-dir", help = "单次识别时保存预处理截图的目录", value_name = "DIR", default_value = "screenshots")]
    pub snapshot_dir: PathBuf,

    #[arg(long = "verbose", short = 'v', help = "显示详细识别信息")]
    pub verbose: bool,
}

impl Default for EssenceScannerConfig {
    fn default() -> Self {
        EssenceScannerConfig {
            weapons_path: PathBuf::from("data/weapons.json"),
            text_template_dir: PathBuf::from("templates/generated"),
            icon_template_dir: PathBuf::from("templates/screenshot"),
            settle_delay_ms: 300,
            min_confidence: None,
            window_titles: Vec::new(),
            focus_timeout_secs: 5,
            snapshot_dir: PathBuf::from("screenshots"),
            verbose: false,
        }
    }
}

impl EssenceScannerConfig {
    pub fn window_titles(&self) -> Vec<String> {
        if self.window_titles.is_empty() {
            DEFAULT_WINDOW_TITLES.iter().map(|s| s.to_string()).collect()
        } else {
            self.window_titles.clone()
        }
    }

    pub fn scan_settings(&self) -> ScanSettings {
        ScanSettings {
            settle_delay_ms: self.settle_delay_ms,
            min_confidence: self.min_confidence,
        }
    }
}

/// The part of the configuration the scan loop itself consumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanSettings {
    pub settle_delay_ms: u32,
    pub min_confidence: Option<f32>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        ScanSettings {
            settle_delay_ms: 300,
            min_confidence: None,
        }
    }
}
