use std::collections::HashSet;

/// Keys the scanner reacts to whichever window is focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HotKey {
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    AltDelete,
}

pub const ALL_HOTKEYS: [HotKey; 3] = [HotKey::LeftBracket, HotKey::RightBracket, HotKey::AltDelete];

/// Current level of the watched keys.
pub trait KeyboardState {
    fn is_down(&self, key: HotKey) -> bool;
}

/// Keyboard for platforms without a backend; nothing is ever pressed.
pub struct NoKeyboard;

impl KeyboardState for NoKeyboard {
    fn is_down(&self, _key: HotKey) -> bool {
        false
    }
}

#[cfg(target_os = "windows")]
pub fn native_keyboard() -> Box<dyn KeyboardState + Send> {
    Box::new(super::AsyncKeyboard)
}

#[cfg(not(target_os = "windows"))]
pub fn native_keyboard() -> Box<dyn KeyboardState + Send> {
    log::warn!("当前平台不支持全局热键");
    Box::new(NoKeyboard)
}

/// Turns key levels into presses: a key held across polls is reported once.
pub struct HotKeyPoller {
    keyboard: Box<dyn KeyboardState + Send>,
    held: HashSet<HotKey>,
}

impl HotKeyPoller {
    pub fn new(keyboard: Box<dyn KeyboardState + Send>) -> Self {
        HotKeyPoller {
            keyboard,
            held: HashSet::new(),
        }
    }

    /// Keys that went down since the previous poll.
    pub fn poll(&mut self) -> Vec<HotKey> {
        let mut pressed = Vec::new();
        for key in ALL_HOTKEYS {
            if self.keyboard.is_down(key) {
                if self.held.insert(key) {
                    pressed.push(key);
                }
            } else {
                self.held.remove(&key);
            }
        }
        pressed
    }
}
