use crate::positioning::{Pos, Size};

#[cfg(target_os = "windows")]
pub use foreground::ForegroundWindowQuery;

#[cfg(target_os = "windows")]
mod foreground;

/// Window titles the game is known to run under.
pub const DEFAULT_WINDOW_TITLES: [&str; 2] = ["EndfieldTBeta2", "明日方舟：终末地"];

/// The focused game window, with its client area in screen coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameWindow {
    pub id: u64,
    pub title: String,
    pub client_origin: Pos<i32>,
    pub client_size: Size<i32>,
}

impl GameWindow {
    pub fn origin(&self) -> Pos<i32> {
        self.client_origin
    }

    /// Convert a client-relative position to screen coordinates.
    pub fn to_screen(&self, pos: Pos<i32>) -> Pos<i32> {
        self.client_origin + pos
    }
}

pub trait FocusQuery {
    /// The foreground window, if and only if its title is in the allow-list.
    fn active_game_window(&self) -> Option<GameWindow>;
}

/// Focus query for platforms without a backend: the game is never focused.
pub struct NoFocus;

impl FocusQuery for NoFocus {
    fn active_game_window(&self) -> Option<GameWindow> {
        None
    }
}

/// Focus query that always reports the same window, e.g. a screenshot on disk.
pub struct FixedWindow(pub GameWindow);

impl FocusQuery for FixedWindow {
    fn active_game_window(&self) -> Option<GameWindow> {
        Some(self.0.clone())
    }
}

/// Check a title against the allow-list.
pub fn is_supported_title<S: AsRef<str>>(title: &str, allow_list: &[S]) -> bool {
    allow_list.iter().any(|t| t.as_ref() == title)
}
