#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use essence::capture::{CaptureError, CaptureResult, Capturer};
use essence::positioning::{Pos, Rect, Size};
use essence::recognition::{LabelCatalog, Template};
use essence::system_control::InputControl;
use essence::window_info::{FocusQuery, GameWindow};
use essence_endfield::game_data::{all_stat_labels, TargetCatalog, ICON_LABELS, LABEL_LOCKED, LABEL_NOT_DEPRECATED, LABEL_NOT_LOCKED};
use essence_endfield::scanner::{
    icon_preprocess, text_preprocess, EssenceScannerWindowInfo, Field, ScanBackend, ScanEvent, ScanOrchestrator,
    ScanResources, ScanSettings,
};
use image::{Rgb, RgbImage};

pub const CLIENT_ORIGIN: Pos<i32> = Pos::new(100, 50);

/// Deterministic noise pattern, distinct per `seed`.
pub fn pattern(seed: u32, size: Size<u32>) -> RgbImage {
    RgbImage::from_fn(size.width, size.height, |x, y| {
        let v = ((x * 31 + y * 17 + seed * 7919).wrapping_mul(2654435761) >> 24) as u8;
        Rgb([v, v, v])
    })
}

fn label_seed(label: &str) -> u32 {
    if let Some(i) = all_stat_labels().iter().position(|l| *l == label) {
        return i as u32;
    }
    let i = ICON_LABELS.iter().position(|l| *l == label).expect("known label");
    100 + i as u32
}

pub fn label_image(label: &str, size: Size<u32>) -> RgbImage {
    pattern(label_seed(label), size)
}

pub fn resources(targets: TargetCatalog) -> ScanResources {
    let info = EssenceScannerWindowInfo::default();
    let text_size = info.text_field_size();
    let icon_size = info.icon_field_size();
    let text = all_stat_labels()
        .into_iter()
        .map(|l| Template::from_raw(l.into(), &label_image(l, text_size), text_preprocess()))
        .collect();
    let icon = ICON_LABELS
        .iter()
        .map(|l| Template::from_raw((*l).into(), &label_image(l, icon_size), icon_preprocess()))
        .collect();
    let text = LabelCatalog::new("text", text_preprocess(), text_size, text).unwrap();
    let icon = LabelCatalog::new("icon", icon_preprocess(), icon_size, icon).unwrap();
    let (deprecate, lock) = ScanResources::icon_catalogs(icon, &info).unwrap();
    ScanResources::new(Arc::new(text), Arc::new(deprecate), Arc::new(lock), targets)
}

pub fn targets(entries: &[(&str, [&str; 3])]) -> TargetCatalog {
    let body: Vec<String> = entries
        .iter()
        .map(|(name, [a, s, k])| {
            format!(
                r#""{name}": {{ "weaponId": "{name}", "weaponName": "{name}", "stats": {{ "attribute": "{a}", "secondary": "{s}", "skill": "{k}" }} }}"#
            )
        })
        .collect();
    TargetCatalog::from_json_str(&format!("{{ {} }}", body.join(","))).unwrap()
}

#[derive(Debug, Clone)]
pub struct FakeItem {
    /// `None` renders a region of the wrong size, which cannot be classified.
    pub stats: [Option<&'static str>; 3],
    pub locked: bool,
}

impl FakeItem {
    pub fn new(stats: [&'static str; 3], locked: bool) -> Self {
        FakeItem {
            stats: stats.map(Some),
            locked,
        }
    }
}

#[derive(Default)]
pub struct GameState {
    pub items: Vec<FakeItem>,
    pub selected: Option<usize>,
    pub cursor: Option<Pos<i32>>,
    /// Client-relative click positions, in order.
    pub clicks: Vec<Pos<i32>>,
    /// Number of focus queries that still succeed; `None` means unlimited.
    pub focus_budget: Option<usize>,
    pub focus_queries: usize,
    pub captures: usize,
    /// Set this flag when the cell with the given index gets selected.
    pub cancel_on_select: Option<(usize, Arc<AtomicBool>)>,
    pub fail_capture_on: Option<usize>,
    pub fail_click_on: Option<usize>,
}

/// A simulated essence page: clicking a cell selects it, clicking the lock button flips its lock.
#[derive(Clone)]
pub struct FakeGame {
    pub info: EssenceScannerWindowInfo,
    pub state: Arc<Mutex<GameState>>,
}

impl FakeGame {
    pub fn new(items: Vec<FakeItem>) -> Self {
        FakeGame {
            info: EssenceScannerWindowInfo::default(),
            state: Arc::new(Mutex::new(GameState {
                items,
                ..Default::default()
            })),
        }
    }

    /// 45 items that match nothing and start unlocked.
    pub fn filler() -> Vec<FakeItem> {
        (0..45).map(|_| FakeItem::new(["力量提升", "生命提升", "压制"], false)).collect()
    }

    pub fn backend(&self) -> ScanBackend {
        ScanBackend {
            capturer: Arc::new(self.clone()),
            input: Arc::new(self.clone()),
            focus: Arc::new(self.clone()),
        }
    }

    pub fn cell_clicks(&self) -> Vec<usize> {
        let state = self.state.lock().unwrap();
        let cells = self.info.cells();
        state
            .clicks
            .iter()
            .filter_map(|p| cells.iter().position(|c| self.info.cell_pos(*c) == *p))
            .collect()
    }

    pub fn lock_clicks(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.clicks.iter().filter(|p| **p == self.info.lock_button_pos).count()
    }

    pub fn locked(&self, index: usize) -> bool {
        self.state.lock().unwrap().items[index].locked
    }

    fn field_at(&self, rect: Rect<i32>) -> Option<Field> {
        self.info.fields().into_iter().find(|s| s.rect == rect).map(|s| s.field)
    }
}

impl Capturer<RgbImage> for FakeGame {
    fn capture_rect(&self, rect: Rect<i32>) -> CaptureResult<RgbImage> {
        let state = self.state.lock().unwrap();
        let selected = state.selected.ok_or(CaptureError::WindowNotFound)?;
        if state.fail_capture_on == Some(selected) {
            return Err(CaptureError::Backend("window destroyed".into()));
        }
        let rect = rect.translate(Pos::new(-CLIENT_ORIGIN.x, -CLIENT_ORIGIN.y));
        let field = self
            .field_at(rect)
            .ok_or_else(|| CaptureError::Backend(format!("unexpected region {:?}", rect)))?;
        let item = &state.items[selected];
        let size = Size::new(rect.width as u32, rect.height as u32);
        let label = match field {
            Field::Attribute => item.stats[0],
            Field::Secondary => item.stats[1],
            Field::Skill => item.stats[2],
            Field::Deprecate => Some(LABEL_NOT_DEPRECATED),
            Field::Lock => Some(if item.locked { LABEL_LOCKED } else { LABEL_NOT_LOCKED }),
        };
        Ok(match label {
            Some(l) => label_image(l, size),
            None => RgbImage::new(size.width + 1, size.height),
        })
    }
}

impl InputControl for FakeGame {
    fn mouse_move_to(&self, x: i32, y: i32) -> Result<()> {
        self.state.lock().unwrap().cursor = Some(Pos::new(x - CLIENT_ORIGIN.x, y - CLIENT_ORIGIN.y));
        Ok(())
    }

    fn mouse_click(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let Some(pos) = state.cursor else {
            bail!("click before move");
        };
        if let Some(cell) = self.info.cells().into_iter().find(|c| self.info.cell_pos(*c) == pos) {
            let index = cell.index();
            if state.fail_click_on == Some(index) {
                bail!("click rejected");
            }
            state.selected = Some(index);
            if let Some((at, flag)) = &state.cancel_on_select {
                if *at == index {
                    flag.store(true, Ordering::Release);
                }
            }
        } else if pos == self.info.lock_button_pos {
            let selected = state.selected.expect("lock click without selection");
            state.items[selected].locked = !state.items[selected].locked;
        }
        state.clicks.push(pos);
        Ok(())
    }
}

impl FocusQuery for FakeGame {
    fn active_game_window(&self) -> Option<GameWindow> {
        let mut state = self.state.lock().unwrap();
        state.focus_queries += 1;
        if let Some(budget) = state.focus_budget {
            if state.focus_queries > budget {
                return None;
            }
        }
        Some(GameWindow {
            id: 1,
            title: "明日方舟：终末地".into(),
            client_origin: CLIENT_ORIGIN,
            client_size: Size::new(1920, 1080),
        })
    }
}

pub fn settings() -> ScanSettings {
    ScanSettings {
        settle_delay_ms: 0,
        min_confidence: None,
    }
}

pub fn orchestrator(
    game: &FakeGame,
    resources: ScanResources,
    settings: ScanSettings,
    cancel: Arc<AtomicBool>,
) -> (ScanOrchestrator, Receiver<ScanEvent>) {
    let (tx, rx) = mpsc::channel();
    let orchestrator = ScanOrchestrator::new(game.info.clone(), settings, resources, game.backend(), cancel, Some(tx));
    (orchestrator, rx)
}
