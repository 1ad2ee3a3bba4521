use std::sync::Arc;

use anyhow::{Context, Result};
use essence::capture::{Capturer, NoCapture};
use essence::recognition::{ImageToLabel, LabelCatalog, Preprocess};
use essence::system_control::{InputControl, NoInput};
use essence::window_info::{FocusQuery, NoFocus};
use image::RgbImage;
use log::info;

use super::essence_scanner_config::EssenceScannerConfig;
use super::essence_scanner_window_info::EssenceScannerWindowInfo;
use super::field::CatalogKind;
use crate::game_data::{all_stat_labels, TargetCatalog, ICON_LABELS};

pub type SharedClassifier = Arc<dyn ImageToLabel<RgbImage> + Send + Sync>;

/// Preprocessing the stat text templates are generated with.
pub fn text_preprocess() -> Preprocess {
    Preprocess::binarize()
}

/// Preprocessing the icon templates are generated with.
pub fn icon_preprocess() -> Preprocess {
    Preprocess::Gray
}

/// Immutable recognition data shared by every scan.
#[derive(Clone)]
pub struct ScanResources {
    pub text: SharedClassifier,
    pub deprecate_icon: SharedClassifier,
    pub lock_icon: SharedClassifier,
    pub targets: Arc<TargetCatalog>,
}

impl ScanResources {
    pub fn new(
        text: SharedClassifier,
        deprecate_icon: SharedClassifier,
        lock_icon: SharedClassifier,
        targets: TargetCatalog,
    ) -> Self {
        ScanResources {
            text,
            deprecate_icon,
            lock_icon,
            targets: Arc::new(targets),
        }
    }

    /// One icon template set, matched in both button regions.
    pub fn icon_catalogs(
        icons: LabelCatalog,
        window_info: &EssenceScannerWindowInfo,
    ) -> Result<(LabelCatalog, LabelCatalog)> {
        let deprecate = icons
            .with_field_size(window_info.deprecate_field_size())
            .context("弃用按钮区域")?;
        let lock = icons.with_field_size(window_info.lock_field_size()).context("锁定按钮区域")?;
        Ok((deprecate, lock))
    }

    pub fn load(config: &EssenceScannerConfig, window_info: &EssenceScannerWindowInfo) -> Result<Self> {
        let text = LabelCatalog::load_dir(
            "text",
            &config.text_template_dir,
            &all_stat_labels(),
            text_preprocess(),
            window_info.text_field_size(),
        )
        .context("加载属性文字模板")?;
        let icon = LabelCatalog::load_dir(
            "icon",
            &config.icon_template_dir,
            &ICON_LABELS,
            icon_preprocess(),
            window_info.icon_field_size(),
        )
        .context("加载按钮图标模板")?;
        let (deprecate_icon, lock_icon) = Self::icon_catalogs(icon, window_info)?;
        let targets = TargetCatalog::from_json_path(&config.weapons_path)?;
        info!(
            "已加载 {} 个属性模板、{} 个图标模板、{} 把武器",
            text.len(),
            lock_icon.len(),
            targets.len()
        );
        Ok(Self::new(Arc::new(text), Arc::new(deprecate_icon), Arc::new(lock_icon), targets))
    }

    pub fn classifier(&self, kind: CatalogKind) -> &SharedClassifier {
        match kind {
            CatalogKind::Text => &self.text,
            CatalogKind::DeprecateIcon => &self.deprecate_icon,
            CatalogKind::LockIcon => &self.lock_icon,
        }
    }
}

/// Capture, input and focus collaborators of a scan.
#[derive(Clone)]
pub struct ScanBackend {
    pub capturer: Arc<dyn Capturer<RgbImage> + Send + Sync>,
    pub input: Arc<dyn InputControl + Send + Sync>,
    pub focus: Arc<dyn FocusQuery + Send + Sync>,
}

impl ScanBackend {
    #[cfg(target_os = "windows")]
    pub fn native(window_titles: Vec<String>) -> Self {
        use essence::capture::ScreenshotsCapturer;
        use essence::system_control::EnigoControl;
        use essence::window_info::ForegroundWindowQuery;

        ScanBackend {
            capturer: Arc::new(ScreenshotsCapturer::new()),
            input: Arc::new(EnigoControl::new()),
            focus: Arc::new(ForegroundWindowQuery::new(window_titles)),
        }
    }

    /// Without a platform backend the game is never focused, so scans stop right away.
    #[cfg(not(target_os = "windows"))]
    pub fn native(_window_titles: Vec<String>) -> Self {
        log::warn!("当前平台不支持截图与点击，扫描将立即停止");
        Self::unsupported()
    }

    pub fn unsupported() -> Self {
        ScanBackend {
            capturer: Arc::new(NoCapture),
            input: Arc::new(NoInput),
            focus: Arc::new(NoFocus),
        }
    }
}
