use anyhow::{bail, Result};

use crate::positioning::Pos;

#[cfg(target_os = "windows")]
pub use async_keyboard::AsyncKeyboard;
#[cfg(target_os = "windows")]
pub use enigo_control::EnigoControl;
pub use hotkey::{native_keyboard, HotKey, HotKeyPoller, KeyboardState, NoKeyboard, ALL_HOTKEYS};

#[cfg(target_os = "windows")]
mod async_keyboard;
#[cfg(target_os = "windows")]
mod enigo_control;
mod hotkey;

/// Mouse input in screen coordinates.
pub trait InputControl {
    fn mouse_move_to(&self, x: i32, y: i32) -> Result<()>;

    fn mouse_click(&self) -> Result<()>;

    /// Move to `pos` and click once.
    fn click(&self, pos: Pos<i32>) -> Result<()> {
        self.mouse_move_to(pos.x, pos.y)?;
        self.mouse_click()
    }
}

/// Input for platforms without a backend; every call fails.
pub struct NoInput;

impl InputControl for NoInput {
    fn mouse_move_to(&self, _x: i32, _y: i32) -> Result<()> {
        bail!("mouse input is not supported on this platform")
    }

    fn mouse_click(&self) -> Result<()> {
        bail!("mouse input is not supported on this platform")
    }
}
