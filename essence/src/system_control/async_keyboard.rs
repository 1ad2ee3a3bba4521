use windows_sys::Win32::UI::Input::KeyboardAndMouse::{GetAsyncKeyState, VK_DELETE, VK_MENU, VK_OEM_4, VK_OEM_6};

use super::hotkey::{HotKey, KeyboardState};

/// Global key levels via `GetAsyncKeyState`.
pub struct AsyncKeyboard;

fn key_down(vk: u16) -> bool {
    let state = unsafe { GetAsyncKeyState(vk as i32) };
    (state as u16) & 0x8000 != 0
}

impl KeyboardState for AsyncKeyboard {
    fn is_down(&self, key: HotKey) -> bool {
        match key {
            HotKey::LeftBracket => key_down(VK_OEM_4),
            HotKey::RightBracket => key_down(VK_OEM_6),
            HotKey::AltDelete => key_down(VK_MENU) && key_down(VK_DELETE),
        }
    }
}
