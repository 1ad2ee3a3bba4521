use windows_sys::Win32::Foundation::{POINT, RECT};
use windows_sys::Win32::Graphics::Gdi::ClientToScreen;
use windows_sys::Win32::UI::WindowsAndMessaging::{
    GetClientRect, GetForegroundWindow, GetWindowTextW,
};

use super::{is_supported_title, FocusQuery, GameWindow};
use crate::positioning::{Pos, Size};

pub struct ForegroundWindowQuery {
    titles: Vec<String>,
}

impl ForegroundWindowQuery {
    pub fn new(titles: Vec<String>) -> Self {
        ForegroundWindowQuery { titles }
    }
}

impl FocusQuery for ForegroundWindowQuery {
    fn active_game_window(&self) -> Option<GameWindow> {
        unsafe {
            let hwnd = GetForegroundWindow();
            if hwnd.is_null() {
                return None;
            }

            let mut buf = [0u16; 256];
            let len = GetWindowTextW(hwnd, buf.as_mut_ptr(), buf.len() as i32);
            if len <= 0 {
                return None;
            }
            let title = String::from_utf16_lossy(&buf[..len as usize]);
            if !is_supported_title(&title, &self.titles) {
                return None;
            }

            let mut rect: RECT = std::mem::zeroed();
            if GetClientRect(hwnd, &mut rect) == 0 {
                return None;
            }
            let mut origin = POINT { x: 0, y: 0 };
            if ClientToScreen(hwnd, &mut origin) == 0 {
                return None;
            }

            Some(GameWindow {
                id: hwnd as usize as u64,
                title,
                client_origin: Pos::new(origin.x, origin.y),
                client_size: Size::new(rect.right - rect.left, rect.bottom - rect.top),
            })
        }
    }
}
