//! 用一张全窗口截图测试基质识别，直接复用扫描时的字段描述与识别流程。
//!
//! 截图须为 1920x1080 的客户区截图，坐标与扫描时使用的标定常量一致。

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use essence::capture::ImageCapturer;
use essence::positioning::{Pos, Size};
use essence::system_control::NoInput;
use essence::window_info::{FixedWindow, GameWindow};
use essence_endfield::scanner::{
    decide, read_item, Decision, EssenceScannerConfig, EssenceScannerWindowInfo, ScanBackend,
    ScanResources,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long)]
    image: String,

    #[command(flatten)]
    config: EssenceScannerConfig,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    println!("Loading image: {}", args.image);
    let image = image::open(&args.image)
        .with_context(|| format!("open {}", args.image))?
        .to_rgb8();
    let (width, height) = image.dimensions();
    println!("Image dimensions: {}x{}", width, height);

    let window_info = EssenceScannerWindowInfo::default();
    let expected = window_info.resolution;
    if width as i32 != expected.width || height as i32 != expected.height {
        bail!("截图尺寸 {}x{} 与标定分辨率 {} 不一致", width, height, expected);
    }

    let resources = ScanResources::load(&args.config, &window_info)?;
    let window = GameWindow {
        id: 0,
        title: args.image.clone(),
        client_origin: Pos::new(0, 0),
        client_size: Size::new(width as i32, height as i32),
    };
    let backend = ScanBackend {
        capturer: Arc::new(ImageCapturer::new(image)),
        input: Arc::new(NoInput),
        focus: Arc::new(FixedWindow(window.clone())),
    };

    let reading = read_item(
        &backend,
        &resources,
        &window_info.fields(),
        &window,
        args.config.min_confidence,
    )?;

    println!("\n=== Recognition result ===");
    for r in reading.0.iter() {
        println!("{:<10} {}", r.field, r.result);
    }
    match decide(&resources.targets, &reading) {
        Decision::Kept(target) => println!("保留: 契合武器 {} ({})", target.weapon_name, target.weapon_id),
        Decision::Discarded => println!("丢弃: 不匹配任何已实装武器"),
    }

    Ok(())
}
