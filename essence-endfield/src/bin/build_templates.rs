//! 从原始截图裁剪生成模板。
//!
//! 输入目录中每个 `<label>.png` 是对应字段区域的原始截图（属性文字 192x32，按钮图标不超过 32x32，需同时放进弃用与锁定按钮区域），
//! 输出为经过与识别时相同预处理后的模板图片。

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use essence::recognition::{preprocess, Preprocess};
use essence_endfield::game_data::{all_stat_labels, ICON_LABELS};
use essence_endfield::scanner::{icon_preprocess, text_preprocess, EssenceScannerWindowInfo};
use log::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TemplateKind {
    Text,
    Icon,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, value_enum)]
    kind: TemplateKind,

    /// Directory of raw `<label>.png` region captures
    #[arg(long)]
    input: PathBuf,

    #[arg(long)]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let window_info = EssenceScannerWindowInfo::default();
    let (labels, mode, field): (Vec<&str>, Preprocess, _) = match args.kind {
        TemplateKind::Text => (all_stat_labels(), text_preprocess(), window_info.text_field_size()),
        TemplateKind::Icon => (ICON_LABELS.to_vec(), icon_preprocess(), window_info.icon_field_size()),
    };

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("create {}", args.output.display()))?;

    let mut written = 0;
    for label in labels.iter() {
        let src = args.input.join(format!("{}.png", label));
        if !src.is_file() {
            warn!("缺少原始截图: {}", src.display());
            continue;
        }
        let raw = image::open(&src)
            .with_context(|| format!("open {}", src.display()))?
            .to_rgb8();
        if raw.width() > field.width || raw.height() > field.height {
            bail!("{} 为 {}x{}，超出字段尺寸 {}", src.display(), raw.width(), raw.height(), field);
        }
        let dst = args.output.join(format!("{}.png", label));
        preprocess(&raw, mode)
            .save(&dst)
            .with_context(|| format!("save {}", dst.display()))?;
        info!("Saved template image: {}", dst.display());
        written += 1;
    }

    info!("共生成 {} / {} 个模板", written, labels.len());
    Ok(())
}
