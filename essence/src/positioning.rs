use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pos<T> {
    pub x: T,
    pub y: T,
}

impl<T> Pos<T> {
    pub const fn new(x: T, y: T) -> Self {
        Pos { x, y }
    }
}

impl<T: Add<Output = T>> Add for Pos<T> {
    type Output = Pos<T>;

    fn add(self, rhs: Self) -> Self::Output {
        Pos {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Pos<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size<T> {
    pub width: T,
    pub height: T,
}

impl<T> Size<T> {
    pub const fn new(width: T, height: T) -> Self {
        Size { width, height }
    }
}

impl<T: fmt::Display> fmt::Display for Size<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A rectangle in window-client pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect<T> {
    pub left: T,
    pub top: T,
    pub width: T,
    pub height: T,
}

impl<T: Copy + Add<Output = T> + Sub<Output = T>> Rect<T> {
    /// Build a rect from `(left, top, right, bottom)` calibration constants.
    pub fn from_ltrb(left: T, top: T, right: T, bottom: T) -> Self {
        Rect {
            left,
            top,
            width: right - left,
            height: bottom - top,
        }
    }

    pub fn right(&self) -> T {
        self.left + self.width
    }

    pub fn bottom(&self) -> T {
        self.top + self.height
    }

    pub fn origin(&self) -> Pos<T> {
        Pos {
            x: self.left,
            y: self.top,
        }
    }

    pub fn size(&self) -> Size<T> {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    pub fn translate(&self, offset: Pos<T>) -> Self {
        Rect {
            left: self.left + offset.x,
            top: self.top + offset.y,
            width: self.width,
            height: self.height,
        }
    }
}

impl Rect<i32> {
    pub fn to_rect_u32(&self) -> Option<Rect<u32>> {
        Some(Rect {
            left: u32::try_from(self.left).ok()?,
            top: u32::try_from(self.top).ok()?,
            width: u32::try_from(self.width).ok()?,
            height: u32::try_from(self.height).ok()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ltrb_converts_to_width_and_height() {
        let rect = Rect::from_ltrb(1508, 358, 1700, 390);
        assert_eq!(rect.width, 192);
        assert_eq!(rect.height, 32);
        assert_eq!(rect.right(), 1700);
        assert_eq!(rect.bottom(), 390);
    }

    #[test]
    fn translate_keeps_size() {
        let rect = Rect::from_ltrb(10, 20, 30, 60).translate(Pos::new(-10, 5));
        assert_eq!(rect, Rect { left: 0, top: 25, width: 20, height: 40 });
    }

    #[test]
    fn negative_rect_has_no_unsigned_form() {
        assert!(Rect { left: -1, top: 0, width: 4, height: 4 }.to_rect_u32().is_none());
    }
}
